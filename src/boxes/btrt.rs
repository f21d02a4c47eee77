use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Header, Mp4Box, Mp4BoxError};

/// Bit Rate Box.
#[derive(Default)]
pub struct BitRateBox {
    pub header: Header,
    pub buffer_size_db: u32,
    pub max_bitrate: u32,
    pub avg_bitrate: u32,
}

impl Mp4Box for BitRateBox {
    fn box_type(&self) -> FourCC {
        types::BTRT
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
        self.header.size = self.header.header_size() + 4 + 4 + 4;
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        self.buffer_size_db = r.read_u32::<BigEndian>()?;
        self.max_bitrate = r.read_u32::<BigEndian>()?;
        self.avg_bitrate = r.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_u32::<BigEndian>(self.buffer_size_db)?;
        w.write_u32::<BigEndian>(self.max_bitrate)?;
        w.write_u32::<BigEndian>(self.avg_bitrate)?;
        Ok(())
    }
}
