use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{CodecConfigRecord, Header, Mp4Box, Mp4BoxError};

/// HEVC Configuration Box: carries the HEVCDecoderConfigurationRecord as an
/// opaque record.
#[derive(Default)]
pub struct HevcConfigurationBox {
    pub header: Header,
    pub config: CodecConfigRecord,
}

impl Mp4Box for HevcConfigurationBox {
    fn box_type(&self) -> FourCC {
        types::HVCC
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
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

/// Dolby Vision enhancement-layer HEVC configuration (`hvcE`).
#[derive(Default)]
pub struct DolbyVisionHevcConfigurationBox {
    pub header: Header,
    pub config: CodecConfigRecord,
}

impl Mp4Box for DolbyVisionHevcConfigurationBox {
    fn box_type(&self) -> FourCC {
        types::HVCE
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
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
