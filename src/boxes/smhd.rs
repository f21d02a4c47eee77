use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Sound Media Header Box.
#[derive(Default)]
pub struct SoundMediaHeaderBox {
    pub full_header: FullHeader,
    /// Fixed-point 8.8 stereo placement; 0 is centre.
    pub balance: i16,
}

impl Mp4Box for SoundMediaHeaderBox {
    fn box_type(&self) -> FourCC {
        types::SMHD
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.header.size = self.full_header.header_size() + 2 + 2;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        self.balance = r.read_i16::<BigEndian>()?;
        let _reserved = r.read_u16::<BigEndian>()?;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_i16::<BigEndian>(self.balance)?;
        w.write_u16::<BigEndian>(0)?;
        Ok(())
    }
}
