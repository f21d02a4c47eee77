use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Sample To Chunk Box: maps runs of chunks to their samples-per-chunk and
/// sample description.
#[derive(Default)]
pub struct SampleToChunkBox {
    pub full_header: FullHeader,
    pub entries: Vec<SampleToChunkEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleToChunkEntry {
    /// 1-based index of the first chunk in this run.
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    /// 1-based index into the Sample Description Box.
    pub sample_description_index: u32,
}

impl Mp4Box for SampleToChunkBox {
    fn box_type(&self) -> FourCC {
        types::STSC
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
            self.full_header.header_size() + 4 + 12 * self.entries.len() as u32;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let entry_count = r.read_u32::<BigEndian>()?;
        self.entries = Vec::with_capacity(entry_count.min(u16::MAX.into()) as usize);
        for _ in 0..entry_count {
            self.entries.push(SampleToChunkEntry {
                first_chunk: r.read_u32::<BigEndian>()?,
                samples_per_chunk: r.read_u32::<BigEndian>()?,
                sample_description_index: r.read_u32::<BigEndian>()?,
            });
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for entry in &self.entries {
            w.write_u32::<BigEndian>(entry.first_chunk)?;
            w.write_u32::<BigEndian>(entry.samples_per_chunk)?;
            w.write_u32::<BigEndian>(entry.sample_description_index)?;
        }
        Ok(())
    }
}
