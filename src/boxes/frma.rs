use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{Header, Mp4Box, Mp4BoxError};

/// Original Format Box: the 4CC of the un-transformed sample description.
pub struct OriginalFormatBox {
    pub header: Header,
    pub data_format: FourCC,
}

impl Default for OriginalFormatBox {
    fn default() -> Self {
        OriginalFormatBox {
            header: Header::default(),
            data_format: FourCC([0; 4]),
        }
    }
}

impl Mp4Box for OriginalFormatBox {
    fn box_type(&self) -> FourCC {
        types::FRMA
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
        self.header.size = self.header.header_size() + 4;
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        let mut data_format = [0u8; 4];
        r.read_exact(&mut data_format)?;
        self.data_format = FourCC(data_format);
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_all(&self.data_format.0)?;
        Ok(())
    }
}
