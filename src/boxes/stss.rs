use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Sync Sample Box: 1-based numbers of the samples that are sync samples.
#[derive(Default)]
pub struct SyncSampleBox {
    pub full_header: FullHeader,
    pub sample_numbers: Vec<u32>,
}

impl Mp4Box for SyncSampleBox {
    fn box_type(&self) -> FourCC {
        types::STSS
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
            self.full_header.header_size() + 4 + 4 * self.sample_numbers.len() as u32;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let _entry_count = r.read_u32::<BigEndian>()?;
        // trust the declared box size for the element count, like the other
        // trailing arrays
        let remaining = self
            .full_header
            .body_size()?
            .checked_sub(4)
            .ok_or(Mp4BoxError::InvalidFormat("stss box too small"))?;
        self.sample_numbers = Vec::with_capacity((remaining / 4).min(u16::MAX.into()) as usize);
        for _ in 0..remaining / 4 {
            self.sample_numbers.push(r.read_u32::<BigEndian>()?);
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.sample_numbers.len() as u32)?;
        for &sample_number in &self.sample_numbers {
            w.write_u32::<BigEndian>(sample_number)?;
        }
        Ok(())
    }
}
