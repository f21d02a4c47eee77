use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Composition Time to Sample Box: offsets between decode and composition
/// time. The wire width of the offset is 32 bits in both versions; version 0
/// zero-extends it, version 1 sign-extends it.
#[derive(Default)]
pub struct CompositionOffsetBox {
    pub full_header: FullHeader,
    pub entries: Vec<CompositionOffsetEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionOffsetEntry {
    pub sample_count: u32,
    /// CT(n) = DT(n) + offset. Negative values only occur under version 1.
    pub sample_offset: i64,
}

impl Mp4Box for CompositionOffsetBox {
    fn box_type(&self) -> FourCC {
        types::CTTS
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
            let sample_count = r.read_u32::<BigEndian>()?;
            let sample_offset = if self.full_header.version == 0 {
                i64::from(r.read_u32::<BigEndian>()?)
            } else {
                i64::from(r.read_i32::<BigEndian>()?)
            };
            self.entries.push(CompositionOffsetEntry {
                sample_count,
                sample_offset,
            });
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for entry in &self.entries {
            w.write_u32::<BigEndian>(entry.sample_count)?;
            if self.full_header.version == 0 {
                w.write_u32::<BigEndian>(entry.sample_offset as u32)?;
            } else {
                w.write_i32::<BigEndian>(entry.sample_offset as i32)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(version: u8, raw_offset: u32) -> CompositionOffsetEntry {
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&24u32.to_be_bytes());
        encoded.extend_from_slice(b"ctts");
        encoded.extend_from_slice(&[version, 0, 0, 0]);
        encoded.extend_from_slice(&1u32.to_be_bytes());
        encoded.extend_from_slice(&1u32.to_be_bytes());
        encoded.extend_from_slice(&raw_offset.to_be_bytes());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        boks.downcast_ref::<CompositionOffsetBox>().unwrap().entries[0]
    }

    #[test]
    fn version_selects_offset_signedness() {
        assert_eq!(decode(0, 0xFFFF_FFFF).sample_offset, 4_294_967_295);
        assert_eq!(decode(1, 0xFFFF_FFFF).sample_offset, -1);
    }

    #[test]
    fn version_1_round_trips_negative_offsets() {
        let mut ctts = CompositionOffsetBox {
            full_header: FullHeader {
                version: 1,
                ..Default::default()
            },
            entries: vec![CompositionOffsetEntry {
                sample_count: 3,
                sample_offset: -1800,
            }],
        };
        let encoded = ctts.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, ctts.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<CompositionOffsetBox>().unwrap();
        assert_eq!(read_back.entries, ctts.entries);
    }
}
