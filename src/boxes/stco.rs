use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Chunk Offset Box: absolute file offsets of each chunk of media data.
#[derive(Default)]
pub struct ChunkOffsetBox {
    pub full_header: FullHeader,
    pub chunk_offsets: Vec<u32>,
}

impl Mp4Box for ChunkOffsetBox {
    fn box_type(&self) -> FourCC {
        types::STCO
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
            self.full_header.header_size() + 4 + 4 * self.chunk_offsets.len() as u32;
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let entry_count = r.read_u32::<BigEndian>()?;
        self.chunk_offsets = Vec::with_capacity(entry_count.min(u16::MAX.into()) as usize);
        for _ in 0..entry_count {
            self.chunk_offsets.push(r.read_u32::<BigEndian>()?);
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.chunk_offsets.len() as u32)?;
        for &chunk_offset in &self.chunk_offsets {
            w.write_u32::<BigEndian>(chunk_offset)?;
        }
        Ok(())
    }
}
