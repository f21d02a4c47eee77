use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

bitflags::bitflags! {
    pub struct TrackFragmentHeaderFlags: u32 {
        const BASE_DATA_OFFSET_PRESENT = 0x000001;
        const SAMPLE_DESCRIPTION_INDEX_PRESENT = 0x000002;
        const DEFAULT_SAMPLE_DURATION_PRESENT = 0x000008;
        const DEFAULT_SAMPLE_SIZE_PRESENT = 0x000010;
        const DEFAULT_SAMPLE_FLAGS_PRESENT = 0x000020;
        /// No samples exist for this time interval. Changes semantics only;
        /// no field is added.
        const DURATION_IS_EMPTY = 0x010000;
        /// Data offsets are relative to the enclosing moof. Semantics only.
        const DEFAULT_BASE_IS_MOOF = 0x020000;
    }
}

/// Track Fragment Header Box: per-fragment defaults for the runs that follow.
/// Five of the flag bits each gate one optional scalar field; the remaining
/// two change interpretation without adding fields.
#[derive(Default)]
pub struct TrackFragmentHeaderBox {
    pub full_header: FullHeader,
    pub track_id: u32,
    pub base_data_offset: u64,
    pub sample_description_index: u32,
    pub default_sample_duration: u32,
    pub default_sample_size: u32,
    pub default_sample_flags: u32,
}

impl TrackFragmentHeaderBox {
    pub fn flags(&self) -> TrackFragmentHeaderFlags {
        TrackFragmentHeaderFlags::from_bits_truncate(self.full_header.flags)
    }
}

impl Mp4Box for TrackFragmentHeaderBox {
    fn box_type(&self) -> FourCC {
        types::TFHD
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        let flags = self.flags();
        let mut size = self.full_header.header_size();
        size += 4; // track_ID
        if flags.contains(TrackFragmentHeaderFlags::BASE_DATA_OFFSET_PRESENT) {
            size += 8;
        }
        if flags.contains(TrackFragmentHeaderFlags::SAMPLE_DESCRIPTION_INDEX_PRESENT) {
            size += 4;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_DURATION_PRESENT) {
            size += 4;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_SIZE_PRESENT) {
            size += 4;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_FLAGS_PRESENT) {
            size += 4;
        }
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        self.track_id = r.read_u32::<BigEndian>()?;
        let flags = self.flags();
        if flags.contains(TrackFragmentHeaderFlags::BASE_DATA_OFFSET_PRESENT) {
            self.base_data_offset = r.read_u64::<BigEndian>()?;
        }
        if flags.contains(TrackFragmentHeaderFlags::SAMPLE_DESCRIPTION_INDEX_PRESENT) {
            self.sample_description_index = r.read_u32::<BigEndian>()?;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_DURATION_PRESENT) {
            self.default_sample_duration = r.read_u32::<BigEndian>()?;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_SIZE_PRESENT) {
            self.default_sample_size = r.read_u32::<BigEndian>()?;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_FLAGS_PRESENT) {
            self.default_sample_flags = r.read_u32::<BigEndian>()?;
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.track_id)?;
        let flags = self.flags();
        if flags.contains(TrackFragmentHeaderFlags::BASE_DATA_OFFSET_PRESENT) {
            w.write_u64::<BigEndian>(self.base_data_offset)?;
        }
        if flags.contains(TrackFragmentHeaderFlags::SAMPLE_DESCRIPTION_INDEX_PRESENT) {
            w.write_u32::<BigEndian>(self.sample_description_index)?;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_DURATION_PRESENT) {
            w.write_u32::<BigEndian>(self.default_sample_duration)?;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_SIZE_PRESENT) {
            w.write_u32::<BigEndian>(self.default_sample_size)?;
        }
        if flags.contains(TrackFragmentHeaderFlags::DEFAULT_SAMPLE_FLAGS_PRESENT) {
            w.write_u32::<BigEndian>(self.default_sample_flags)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn optional_fields_follow_their_flags() {
        let mut tfhd = TrackFragmentHeaderBox {
            full_header: FullHeader {
                flags: (TrackFragmentHeaderFlags::BASE_DATA_OFFSET_PRESENT
                    | TrackFragmentHeaderFlags::DEFAULT_SAMPLE_SIZE_PRESENT
                    | TrackFragmentHeaderFlags::DEFAULT_BASE_IS_MOOF)
                    .bits(),
                ..Default::default()
            },
            track_id: 7,
            base_data_offset: 1 << 40,
            default_sample_size: 4096,
            ..Default::default()
        };
        let encoded = tfhd.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, tfhd.size());
        // header + track_id + u64 offset + u32 size
        assert_eq!(encoded.len(), 12 + 4 + 8 + 4);

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<TrackFragmentHeaderBox>().unwrap();
        assert_eq!(read_back.track_id, 7);
        assert_eq!(read_back.base_data_offset, 1 << 40);
        assert_eq!(read_back.default_sample_size, 4096);
        assert_eq!(read_back.default_sample_duration, 0);
        assert!(read_back
            .flags()
            .contains(TrackFragmentHeaderFlags::DEFAULT_BASE_IS_MOOF));
    }

    #[test]
    fn semantic_only_flags_add_no_fields() {
        let mut tfhd = TrackFragmentHeaderBox {
            full_header: FullHeader {
                flags: (TrackFragmentHeaderFlags::DURATION_IS_EMPTY
                    | TrackFragmentHeaderFlags::DEFAULT_BASE_IS_MOOF)
                    .bits(),
                ..Default::default()
            },
            track_id: 1,
            ..Default::default()
        };
        assert_eq!(tfhd.to_bytes().unwrap().len(), 16);
    }
}
