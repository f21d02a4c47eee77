use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Media Header Box: media-wide timing plus the ISO 639-2/T language code.
/// The three lowercase letters are packed on the wire as 5-bit values offset
/// from 0x60.
#[derive(Default)]
pub struct MediaHeaderBox {
    pub full_header: FullHeader,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub language: [u8; 3],
}

impl Mp4Box for MediaHeaderBox {
    fn box_type(&self) -> FourCC {
        types::MDHD
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
        size += 2; // pad + language
        size += 2; // pre_defined
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
        let packed = r.read_u16::<BigEndian>()?;
        self.language = [
            ((packed >> 10) as u8 & 0x1F) + 0x60,
            ((packed >> 5) as u8 & 0x1F) + 0x60,
            (packed as u8 & 0x1F) + 0x60,
        ];
        let _pre_defined = r.read_u16::<BigEndian>()?;
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
        let [first, second, third] = self.language;
        let packed = (u16::from(first.saturating_sub(0x60) & 0x1F) << 10)
            | (u16::from(second.saturating_sub(0x60) & 0x1F) << 5)
            | u16::from(third.saturating_sub(0x60) & 0x1F);
        w.write_u16::<BigEndian>(packed)?;
        w.write_u16::<BigEndian>(0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn language_packs_and_unpacks() {
        let mut mdhd = MediaHeaderBox {
            timescale: 48_000,
            duration: 96_000,
            language: *b"und",
            ..Default::default()
        };
        let encoded = mdhd.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, mdhd.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<MediaHeaderBox>().unwrap();
        assert_eq!(&read_back.language, b"und");
        assert_eq!(read_back.timescale, 48_000);
    }
}
