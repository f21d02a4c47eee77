use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{CodecConfigRecord, Header, Mp4Box, Mp4BoxError};

/// AVC Configuration Box: carries the AVCDecoderConfigurationRecord as an
/// opaque record sized by the remaining declared box length.
#[derive(Default)]
pub struct AvcConfigurationBox {
    pub header: Header,
    pub config: CodecConfigRecord,
}

impl Mp4Box for AvcConfigurationBox {
    fn box_type(&self) -> FourCC {
        types::AVCC
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

/// Dolby Vision enhancement-layer AVC configuration (`avcE`); same record
/// layout as `avcC`.
#[derive(Default)]
pub struct DolbyVisionAvcConfigurationBox {
    pub header: Header,
    pub config: CodecConfigRecord,
}

impl Mp4Box for DolbyVisionAvcConfigurationBox {
    fn box_type(&self) -> FourCC {
        types::AVCE
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
