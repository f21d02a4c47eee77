use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{CodecConfigRecord, Header, Mp4Box, Mp4BoxError};

/// Dolby Vision Configuration Box. One implementation serves the `dvcC`,
/// `dvvC` and `dvwC` spellings, so the dispatch tag is kept rather than
/// normalized.
pub struct DoviConfigurationBox {
    pub header: Header,
    pub config: CodecConfigRecord,
}

impl Default for DoviConfigurationBox {
    fn default() -> Self {
        DoviConfigurationBox {
            header: Header {
                box_type: types::DVCC,
                ..Default::default()
            },
            config: CodecConfigRecord::default(),
        }
    }
}

impl Mp4Box for DoviConfigurationBox {
    fn box_type(&self) -> FourCC {
        self.header.box_type
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.size = self.header.header_size() + self.config.record_size();
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        let record_size = self.header.body_size()?;
        self.config.record_read(r, record_size)
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        self.config.record_write(w)
    }
}
