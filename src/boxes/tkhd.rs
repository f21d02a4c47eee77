use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

bitflags::bitflags! {
    pub struct TrackHeaderFlags: u32 {
        const TRACK_ENABLED = 0x000001;
        const TRACK_IN_MOVIE = 0x000002;
        const TRACK_IN_PREVIEW = 0x000004;
        /// Width and height are an aspect-ratio indication, not pixel counts.
        const TRACK_SIZE_IS_ASPECT_RATIO = 0x000008;
    }
}

/// Track Header Box: identity and presentation parameters of one track.
/// Version 1 widens the time and duration fields to 64 bits.
#[derive(Default)]
pub struct TrackHeaderBox {
    pub full_header: FullHeader,
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    /// Fixed-point 8.8 relative audio volume.
    pub volume: i16,
    pub matrix: [i32; 9],
    /// Fixed-point 16.16 presentation width and height.
    pub width: u32,
    pub height: u32,
}

impl TrackHeaderBox {
    pub fn flags(&self) -> TrackHeaderFlags {
        TrackHeaderFlags::from_bits_truncate(self.full_header.flags)
    }
}

impl Mp4Box for TrackHeaderBox {
    fn box_type(&self) -> FourCC {
        types::TKHD
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        let mut size = self.full_header.header_size();
        size += if self.full_header.version == 1 {
            8 + 8 + 4 + 4 + 8
        } else {
            4 + 4 + 4 + 4 + 4
        };
        size += 4 * 2; // reserved
        size += 2; // layer
        size += 2; // alternate_group
        size += 2; // volume
        size += 2; // reserved
        size += 4 * 9; // matrix
        size += 4; // width
        size += 4; // height
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        if self.full_header.version == 1 {
            self.creation_time = r.read_u64::<BigEndian>()?;
            self.modification_time = r.read_u64::<BigEndian>()?;
            self.track_id = r.read_u32::<BigEndian>()?;
            let _reserved = r.read_u32::<BigEndian>()?;
            self.duration = r.read_u64::<BigEndian>()?;
        } else {
            self.creation_time = r.read_u32::<BigEndian>()?.into();
            self.modification_time = r.read_u32::<BigEndian>()?.into();
            self.track_id = r.read_u32::<BigEndian>()?;
            let _reserved = r.read_u32::<BigEndian>()?;
            self.duration = r.read_u32::<BigEndian>()?.into();
        }
        let mut reserved = [0u8; 8];
        r.read_exact(&mut reserved)?;
        self.layer = r.read_i16::<BigEndian>()?;
        self.alternate_group = r.read_i16::<BigEndian>()?;
        self.volume = r.read_i16::<BigEndian>()?;
        let _reserved = r.read_u16::<BigEndian>()?;
        for value in &mut self.matrix {
            *value = r.read_i32::<BigEndian>()?;
        }
        self.width = r.read_u32::<BigEndian>()?;
        self.height = r.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        if self.full_header.version == 1 {
            w.write_u64::<BigEndian>(self.creation_time)?;
            w.write_u64::<BigEndian>(self.modification_time)?;
            w.write_u32::<BigEndian>(self.track_id)?;
            w.write_u32::<BigEndian>(0)?;
            w.write_u64::<BigEndian>(self.duration)?;
        } else {
            w.write_u32::<BigEndian>(self.creation_time as u32)?;
            w.write_u32::<BigEndian>(self.modification_time as u32)?;
            w.write_u32::<BigEndian>(self.track_id)?;
            w.write_u32::<BigEndian>(0)?;
            w.write_u32::<BigEndian>(self.duration as u32)?;
        }
        w.write_all(&[0u8; 8])?;
        w.write_i16::<BigEndian>(self.layer)?;
        w.write_i16::<BigEndian>(self.alternate_group)?;
        w.write_i16::<BigEndian>(self.volume)?;
        w.write_u16::<BigEndian>(0)?;
        for value in &self.matrix {
            w.write_i32::<BigEndian>(*value)?;
        }
        w.write_u32::<BigEndian>(self.width)?;
        w.write_u32::<BigEndian>(self.height)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trip_keeps_flags_and_geometry() {
        let mut tkhd = TrackHeaderBox {
            full_header: FullHeader {
                version: 1,
                flags: (TrackHeaderFlags::TRACK_ENABLED | TrackHeaderFlags::TRACK_IN_MOVIE).bits(),
                ..Default::default()
            },
            track_id: 1,
            duration: u64::from(u32::MAX) + 1,
            width: 1920 << 16,
            height: 1080 << 16,
            ..Default::default()
        };
        let encoded = tkhd.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, tkhd.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<TrackHeaderBox>().unwrap();
        assert!(read_back.flags().contains(TrackHeaderFlags::TRACK_ENABLED));
        assert_eq!(read_back.duration, u64::from(u32::MAX) + 1);
        assert_eq!(read_back.width >> 16, 1920);
    }
}
