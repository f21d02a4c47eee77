use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Null Media Header Box: used by streams with no specialized media header.
#[derive(Default)]
pub struct NullMediaHeaderBox {
    pub full_header: FullHeader,
}

impl Mp4Box for NullMediaHeaderBox {
    fn box_type(&self) -> FourCC {
        types::NMHD
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.header.size = self.full_header.header_size();
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)
    }
}
