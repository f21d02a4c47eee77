use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Container, FullHeader, Header, Mp4Box, Mp4BoxError};

/// Data Reference Box: a counted table of `url `/`urn ` entries locating the
/// media data. The entry count on the wire is derived from the children on
/// write.
#[derive(Default)]
pub struct DataReferenceBox {
    pub full_header: FullHeader,
    pub container: Container,
}

impl Mp4Box for DataReferenceBox {
    fn box_type(&self) -> FourCC {
        types::DREF
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn container(&self) -> Option<&Container> {
        Some(&self.container)
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        Some(&mut self.container)
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.header.size =
            self.full_header.header_size() + 4 + self.container.update_children();
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let _entry_count = r.read_u32::<BigEndian>()?;
        let budget = self
            .full_header
            .body_size()?
            .checked_sub(4)
            .ok_or(Mp4BoxError::InvalidFormat("dref box too small"))?;
        self.container.read_children(r, budget)
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.container.children().len() as u32)?;
        self.container.write_children(w)
    }
}
