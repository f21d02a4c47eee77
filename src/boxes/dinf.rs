use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{Container, Header, Mp4Box, Mp4BoxError};

/// Data Information Box: container for objects locating the media data.
#[derive(Default)]
pub struct DataInformationBox {
    pub header: Header,
    pub container: Container,
}

impl Mp4Box for DataInformationBox {
    fn box_type(&self) -> FourCC {
        types::DINF
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn container(&self) -> Option<&Container> {
        Some(&self.container)
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        Some(&mut self.container)
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
        self.header.size = self.header.header_size() + self.container.update_children();
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        let body_size = self.header.body_size()?;
        self.container.read_children(r, body_size)
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        self.container.write_children(w)
    }
}
