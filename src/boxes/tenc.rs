use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Track Encryption Box: track-wide defaults for sample protection. Version 1
/// adds the crypt/skip pattern nibbles inside the otherwise reserved bytes. A
/// constant IV block is present exactly when the track is protected but
/// per-sample IVs are absent.
#[derive(Default)]
pub struct TrackEncryptionBox {
    pub full_header: FullHeader,
    pub default_crypt_byte_block: u8,
    pub default_skip_byte_block: u8,
    pub default_is_protected: u8,
    pub default_per_sample_iv_size: u8,
    pub default_kid: [u8; 16],
    pub default_constant_iv: Vec<u8>,
}

impl TrackEncryptionBox {
    fn has_constant_iv(&self) -> bool {
        self.default_is_protected == 1 && self.default_per_sample_iv_size == 0
    }
}

impl Mp4Box for TrackEncryptionBox {
    fn box_type(&self) -> FourCC {
        types::TENC
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
        size += 4; // reserved/pattern + is_protected + iv_size
        size += 16; // default_KID
        if self.has_constant_iv() {
            size += 1 + self.default_constant_iv.len() as u32;
        }
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let packed = r.read_u32::<BigEndian>()?;
        if self.full_header.version != 0 {
            self.default_crypt_byte_block = (packed >> 20) as u8 & 0x0F;
            self.default_skip_byte_block = (packed >> 16) as u8 & 0x0F;
        }
        self.default_is_protected = (packed >> 8) as u8;
        self.default_per_sample_iv_size = packed as u8;
        r.read_exact(&mut self.default_kid)?;
        if self.has_constant_iv() {
            let constant_iv_size = r.read_u8()?;
            let mut constant_iv = vec![0u8; constant_iv_size as usize];
            r.read_exact(&mut constant_iv)?;
            self.default_constant_iv = constant_iv;
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        let mut packed = 0u32;
        if self.full_header.version != 0 {
            packed |= u32::from(self.default_crypt_byte_block & 0x0F) << 20;
            packed |= u32::from(self.default_skip_byte_block & 0x0F) << 16;
        }
        packed |= u32::from(self.default_is_protected) << 8;
        packed |= u32::from(self.default_per_sample_iv_size);
        w.write_u32::<BigEndian>(packed)?;
        w.write_all(&self.default_kid)?;
        if self.has_constant_iv() {
            w.write_u8(self.default_constant_iv.len() as u8)?;
            w.write_all(&self.default_constant_iv)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn constant_iv_appears_only_without_per_sample_ivs() {
        let mut tenc = TrackEncryptionBox {
            default_is_protected: 1,
            default_per_sample_iv_size: 8,
            default_kid: [7; 16],
            ..Default::default()
        };
        assert_eq!(tenc.to_bytes().unwrap().len(), 32);

        tenc.default_per_sample_iv_size = 0;
        tenc.default_constant_iv = vec![0xAA; 16];
        let encoded = tenc.to_bytes().unwrap();
        assert_eq!(encoded.len(), 32 + 1 + 16);

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<TrackEncryptionBox>().unwrap();
        assert_eq!(read_back.default_kid, [7; 16]);
        assert_eq!(read_back.default_constant_iv, vec![0xAA; 16]);
    }

    #[test]
    fn version_1_carries_the_pattern_nibbles() {
        let mut tenc = TrackEncryptionBox {
            full_header: FullHeader {
                version: 1,
                ..Default::default()
            },
            default_crypt_byte_block: 1,
            default_skip_byte_block: 9,
            default_is_protected: 1,
            default_per_sample_iv_size: 16,
            ..Default::default()
        };
        let encoded = tenc.to_bytes().unwrap();

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<TrackEncryptionBox>().unwrap();
        assert_eq!(read_back.default_crypt_byte_block, 1);
        assert_eq!(read_back.default_skip_byte_block, 9);
        assert_eq!(read_back.default_per_sample_iv_size, 16);
    }
}
