use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;
use uuid::Uuid;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Protection System Specific Header Box: opaque initialization data for one
/// DRM system. Version 1 and up adds the list of key ids the data applies to.
#[derive(Default)]
pub struct ProtectionSystemSpecificHeaderBox {
    pub full_header: FullHeader,
    pub system_id: Uuid,
    pub kid_list: Vec<[u8; 16]>,
    pub data: Vec<u8>,
}

impl Mp4Box for ProtectionSystemSpecificHeaderBox {
    fn box_type(&self) -> FourCC {
        types::PSSH
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
        size += 16; // SystemID
        if self.full_header.version > 0 {
            size += 4 + 16 * self.kid_list.len() as u32;
        }
        size += 4 + self.data.len() as u32;
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let mut system_id = [0u8; 16];
        r.read_exact(&mut system_id)?;
        self.system_id = Uuid::from_bytes(system_id);
        if self.full_header.version > 0 {
            let kid_count = r.read_u32::<BigEndian>()?;
            self.kid_list = Vec::with_capacity(kid_count.min(u16::MAX.into()) as usize);
            for _ in 0..kid_count {
                let mut kid = [0u8; 16];
                r.read_exact(&mut kid)?;
                self.kid_list.push(kid);
            }
        }
        let data_size = r.read_u32::<BigEndian>()?;
        let mut data = vec![0u8; data_size as usize];
        r.read_exact(&mut data)?;
        self.data = data;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_all(self.system_id.as_bytes())?;
        if self.full_header.version > 0 {
            w.write_u32::<BigEndian>(self.kid_list.len() as u32)?;
            for kid in &self.kid_list {
                w.write_all(kid)?;
            }
        }
        w.write_u32::<BigEndian>(self.data.len() as u32)?;
        w.write_all(&self.data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const WIDEVINE: Uuid = Uuid::from_bytes([
        0xED, 0xEF, 0x8B, 0xA9, 0x79, 0xD6, 0x4A, 0xCE, 0xA3, 0xC8, 0x27, 0xDC, 0xD5, 0x1D, 0x21,
        0xED,
    ]);

    #[test]
    fn version_1_carries_the_kid_list() {
        let mut pssh = ProtectionSystemSpecificHeaderBox {
            full_header: FullHeader {
                version: 1,
                ..Default::default()
            },
            system_id: WIDEVINE,
            kid_list: vec![[1; 16], [2; 16]],
            data: vec![0xDE, 0xAD],
        };
        let encoded = pssh.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, pssh.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks
            .downcast_ref::<ProtectionSystemSpecificHeaderBox>()
            .unwrap();
        assert_eq!(read_back.system_id, WIDEVINE);
        assert_eq!(read_back.kid_list, vec![[1; 16], [2; 16]]);
        assert_eq!(read_back.data, [0xDE, 0xAD]);
    }

    #[test]
    fn version_0_omits_the_kid_list() {
        let mut pssh = ProtectionSystemSpecificHeaderBox {
            system_id: WIDEVINE,
            kid_list: vec![[1; 16]],
            data: vec![1, 2, 3],
            ..Default::default()
        };
        // 12 header + 16 system id + 4 data size + 3 data
        assert_eq!(pssh.to_bytes().unwrap().len(), 35);
    }
}
