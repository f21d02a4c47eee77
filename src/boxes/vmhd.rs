use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Video Media Header Box. The flags word is always 1 for this box, so
/// `update` pins it.
#[derive(Default)]
pub struct VideoMediaHeaderBox {
    pub full_header: FullHeader,
    pub graphics_mode: u16,
    pub op_color: [u16; 3],
}

impl Mp4Box for VideoMediaHeaderBox {
    fn box_type(&self) -> FourCC {
        types::VMHD
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.flags = 1;
        self.full_header.header.size = self.full_header.header_size() + 2 + 2 * 3;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        self.graphics_mode = r.read_u16::<BigEndian>()?;
        for value in &mut self.op_color {
            *value = r.read_u16::<BigEndian>()?;
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u16::<BigEndian>(self.graphics_mode)?;
        for value in &self.op_color {
            w.write_u16::<BigEndian>(*value)?;
        }
        Ok(())
    }
}
