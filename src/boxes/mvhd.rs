use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Movie Header Box: presentation-wide timing and playback defaults. Version
/// 1 widens the time and duration fields to 64 bits.
#[derive(Default)]
pub struct MovieHeaderBox {
    pub full_header: FullHeader,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    /// Preferred playback rate as fixed-point 16.16; 0x00010000 is 1.0.
    pub rate: i32,
    /// Preferred playback volume as fixed-point 8.8; 0x0100 is full volume.
    pub volume: i16,
    pub matrix: [i32; 9],
    pub next_track_id: u32,
}

impl Mp4Box for MovieHeaderBox {
    fn box_type(&self) -> FourCC {
        types::MVHD
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
            8 + 8 + 4 + 8
        } else {
            4 + 4 + 4 + 4
        };
        size += 4; // rate
        size += 2; // volume
        size += 2 + 4 * 2; // reserved
        size += 4 * 9; // matrix
        size += 4 * 6; // pre_defined
        size += 4; // next_track_ID
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        if self.full_header.version == 1 {
            self.creation_time = r.read_u64::<BigEndian>()?;
            self.modification_time = r.read_u64::<BigEndian>()?;
            self.timescale = r.read_u32::<BigEndian>()?;
            self.duration = r.read_u64::<BigEndian>()?;
        } else {
            self.creation_time = r.read_u32::<BigEndian>()?.into();
            self.modification_time = r.read_u32::<BigEndian>()?.into();
            self.timescale = r.read_u32::<BigEndian>()?;
            self.duration = r.read_u32::<BigEndian>()?.into();
        }
        self.rate = r.read_i32::<BigEndian>()?;
        self.volume = r.read_i16::<BigEndian>()?;
        let mut reserved = [0u8; 10];
        r.read_exact(&mut reserved)?;
        for value in &mut self.matrix {
            *value = r.read_i32::<BigEndian>()?;
        }
        let mut pre_defined = [0u8; 24];
        r.read_exact(&mut pre_defined)?;
        self.next_track_id = r.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        if self.full_header.version == 1 {
            w.write_u64::<BigEndian>(self.creation_time)?;
            w.write_u64::<BigEndian>(self.modification_time)?;
            w.write_u32::<BigEndian>(self.timescale)?;
            w.write_u64::<BigEndian>(self.duration)?;
        } else {
            w.write_u32::<BigEndian>(self.creation_time as u32)?;
            w.write_u32::<BigEndian>(self.modification_time as u32)?;
            w.write_u32::<BigEndian>(self.timescale)?;
            w.write_u32::<BigEndian>(self.duration as u32)?;
        }
        w.write_i32::<BigEndian>(self.rate)?;
        w.write_i16::<BigEndian>(self.volume)?;
        w.write_all(&[0u8; 10])?;
        for value in &self.matrix {
            w.write_i32::<BigEndian>(*value)?;
        }
        w.write_all(&[0u8; 24])?;
        w.write_u32::<BigEndian>(self.next_track_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn both_versions_round_trip() {
        for version in [0u8, 1] {
            let mut mvhd = MovieHeaderBox {
                full_header: FullHeader {
                    version,
                    ..Default::default()
                },
                creation_time: 3_600_000_000,
                modification_time: 3_600_000_001,
                timescale: 90_000,
                duration: 180_000,
                rate: 0x0001_0000,
                volume: 0x0100,
                matrix: [0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000],
                next_track_id: 2,
            };
            let encoded = mvhd.to_bytes().unwrap();
            assert_eq!(encoded.len() as u32, mvhd.size());

            let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
            let read_back = boks.downcast_ref::<MovieHeaderBox>().unwrap();
            assert_eq!(read_back.timescale, 90_000);
            assert_eq!(read_back.duration, 180_000);
            assert_eq!(read_back.matrix, mvhd.matrix);
            assert_eq!(read_back.next_track_id, 2);
        }
    }
}
