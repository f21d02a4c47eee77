use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Decoding Time to Sample Box: run-length table of sample durations.
#[derive(Default)]
pub struct TimeToSampleBox {
    pub full_header: FullHeader,
    pub entries: Vec<TimeToSampleEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeToSampleEntry {
    /// Number of consecutive samples sharing this delta.
    pub sample_count: u32,
    /// Decode-time delta of those samples, in the media timescale.
    pub sample_delta: u32,
}

impl Mp4Box for TimeToSampleBox {
    fn box_type(&self) -> FourCC {
        types::STTS
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
            self.full_header.header_size() + 4 + 8 * self.entries.len() as u32;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let entry_count = r.read_u32::<BigEndian>()?;
        self.entries = Vec::with_capacity(entry_count.min(u16::MAX.into()) as usize);
        for _ in 0..entry_count {
            self.entries.push(TimeToSampleEntry {
                sample_count: r.read_u32::<BigEndian>()?,
                sample_delta: r.read_u32::<BigEndian>()?,
            });
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for entry in &self.entries {
            w.write_u32::<BigEndian>(entry.sample_count)?;
            w.write_u32::<BigEndian>(entry.sample_delta)?;
        }
        Ok(())
    }
}
