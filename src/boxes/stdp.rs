use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Degradation Priority Box: one priority value per sample. The count is not
/// stored in the box; it is derived from the declared size.
#[derive(Default)]
pub struct DegradationPriorityBox {
    pub full_header: FullHeader,
    pub sample_priorities: Vec<u16>,
}

impl Mp4Box for DegradationPriorityBox {
    fn box_type(&self) -> FourCC {
        types::STDP
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.header.size =
            self.full_header.header_size() + 2 * self.sample_priorities.len() as u32;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let remaining = self.full_header.body_size()?;
        self.sample_priorities = Vec::with_capacity((remaining / 2).min(u16::MAX.into()) as usize);
        for _ in 0..remaining / 2 {
            self.sample_priorities.push(r.read_u16::<BigEndian>()?);
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        for &priority in &self.sample_priorities {
            w.write_u16::<BigEndian>(priority)?;
        }
        Ok(())
    }
}
