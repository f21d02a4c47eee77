use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Movie Extends Header Box: overall duration including fragments. Version 1
/// widens the duration to 64 bits.
#[derive(Default)]
pub struct MovieExtendsHeaderBox {
    pub full_header: FullHeader,
    pub fragment_duration: u64,
}

impl Mp4Box for MovieExtendsHeaderBox {
    fn box_type(&self) -> FourCC {
        types::MEHD
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        let field = if self.full_header.version == 1 { 8 } else { 4 };
        self.full_header.header.size = self.full_header.header_size() + field;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        self.fragment_duration = if self.full_header.version == 1 {
            r.read_u64::<BigEndian>()?
        } else {
            r.read_u32::<BigEndian>()?.into()
        };
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        if self.full_header.version == 1 {
            w.write_u64::<BigEndian>(self.fragment_duration)?;
        } else {
            w.write_u32::<BigEndian>(self.fragment_duration as u32)?;
        }
        Ok(())
    }
}
