use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Header, Mp4Box, Mp4BoxError};

/// Pixel Aspect Ratio Box: relative width and height of a pixel.
#[derive(Default)]
pub struct PixelAspectRatioBox {
    pub header: Header,
    pub h_spacing: u32,
    pub v_spacing: u32,
}

impl Mp4Box for PixelAspectRatioBox {
    fn box_type(&self) -> FourCC {
        types::PASP
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
        self.header.size = self.header.header_size() + 4 + 4;
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        self.h_spacing = r.read_u32::<BigEndian>()?;
        self.v_spacing = r.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_u32::<BigEndian>(self.h_spacing)?;
        w.write_u32::<BigEndian>(self.v_spacing)?;
        Ok(())
    }
}
