use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Track Extends Box: per-track defaults used by track fragments.
#[derive(Default)]
pub struct TrackExtendsBox {
    pub full_header: FullHeader,
    pub track_id: u32,
    pub default_sample_description_index: u32,
    pub default_sample_duration: u32,
    pub default_sample_size: u32,
    pub default_sample_flags: u32,
}

impl Mp4Box for TrackExtendsBox {
    fn box_type(&self) -> FourCC {
        types::TREX
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.header.size = self.full_header.header_size() + 4 * 5;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        self.track_id = r.read_u32::<BigEndian>()?;
        self.default_sample_description_index = r.read_u32::<BigEndian>()?;
        self.default_sample_duration = r.read_u32::<BigEndian>()?;
        self.default_sample_size = r.read_u32::<BigEndian>()?;
        self.default_sample_flags = r.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.track_id)?;
        w.write_u32::<BigEndian>(self.default_sample_description_index)?;
        w.write_u32::<BigEndian>(self.default_sample_duration)?;
        w.write_u32::<BigEndian>(self.default_sample_size)?;
        w.write_u32::<BigEndian>(self.default_sample_flags)?;
        Ok(())
    }
}
