use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Header, Mp4Box, Mp4BoxError};

/// Clean Aperture Box: the exact displayable region of the video, as three
/// fractional values (width, height, centre offsets).
#[derive(Default)]
pub struct CleanApertureBox {
    pub header: Header,
    pub clean_aperture_width_n: u32,
    pub clean_aperture_width_d: u32,
    pub clean_aperture_height_n: u32,
    pub clean_aperture_height_d: u32,
    pub horiz_off_n: u32,
    pub horiz_off_d: u32,
    pub vert_off_n: u32,
    pub vert_off_d: u32,
}

impl Mp4Box for CleanApertureBox {
    fn box_type(&self) -> FourCC {
        types::CLAP
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
        self.header.size = self.header.header_size() + 4 * 8;
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        self.clean_aperture_width_n = r.read_u32::<BigEndian>()?;
        self.clean_aperture_width_d = r.read_u32::<BigEndian>()?;
        self.clean_aperture_height_n = r.read_u32::<BigEndian>()?;
        self.clean_aperture_height_d = r.read_u32::<BigEndian>()?;
        self.horiz_off_n = r.read_u32::<BigEndian>()?;
        self.horiz_off_d = r.read_u32::<BigEndian>()?;
        self.vert_off_n = r.read_u32::<BigEndian>()?;
        self.vert_off_d = r.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_u32::<BigEndian>(self.clean_aperture_width_n)?;
        w.write_u32::<BigEndian>(self.clean_aperture_width_d)?;
        w.write_u32::<BigEndian>(self.clean_aperture_height_n)?;
        w.write_u32::<BigEndian>(self.clean_aperture_height_d)?;
        w.write_u32::<BigEndian>(self.horiz_off_n)?;
        w.write_u32::<BigEndian>(self.horiz_off_d)?;
        w.write_u32::<BigEndian>(self.vert_off_n)?;
        w.write_u32::<BigEndian>(self.vert_off_d)?;
        Ok(())
    }
}
