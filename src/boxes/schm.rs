use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError, NullTerminatedString};

bitflags::bitflags! {
    pub struct SchemeTypeFlags: u32 {
        /// A scheme URI string follows the fixed fields.
        const SCHEME_URI_PRESENT = 0x000001;
    }
}

/// Scheme Type Box: identifies the protection or restriction scheme.
pub struct SchemeTypeBox {
    pub full_header: FullHeader,
    pub scheme_type: FourCC,
    pub scheme_version: u32,
    pub scheme_uri: NullTerminatedString,
}

impl Default for SchemeTypeBox {
    fn default() -> Self {
        SchemeTypeBox {
            full_header: FullHeader::default(),
            scheme_type: FourCC([0; 4]),
            scheme_version: 0,
            scheme_uri: NullTerminatedString::default(),
        }
    }
}

impl SchemeTypeBox {
    fn flags(&self) -> SchemeTypeFlags {
        SchemeTypeFlags::from_bits_truncate(self.full_header.flags)
    }
}

impl Mp4Box for SchemeTypeBox {
    fn box_type(&self) -> FourCC {
        types::SCHM
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
        size += 4; // scheme_type
        size += 4; // scheme_version
        if self.flags().contains(SchemeTypeFlags::SCHEME_URI_PRESENT) {
            size += self.scheme_uri.byte_size();
        }
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let mut scheme_type = [0u8; 4];
        r.read_exact(&mut scheme_type)?;
        self.scheme_type = FourCC(scheme_type);
        self.scheme_version = r.read_u32::<BigEndian>()?;
        if self.flags().contains(SchemeTypeFlags::SCHEME_URI_PRESENT) {
            let uri_size = self
                .full_header
                .body_size()?
                .checked_sub(8)
                .ok_or(Mp4BoxError::InvalidFormat("schm box too small"))?;
            self.scheme_uri.read_of_size(r, uri_size)?;
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_all(&self.scheme_type.0)?;
        w.write_u32::<BigEndian>(self.scheme_version)?;
        if self.flags().contains(SchemeTypeFlags::SCHEME_URI_PRESENT) {
            self.scheme_uri.write(w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn uri_is_gated_by_its_flag() {
        let mut schm = SchemeTypeBox {
            scheme_type: types::CENC,
            scheme_version: 0x0001_0000,
            ..Default::default()
        };
        assert_eq!(schm.to_bytes().unwrap().len(), 20);

        schm.full_header.flags = SchemeTypeFlags::SCHEME_URI_PRESENT.bits();
        schm.scheme_uri = NullTerminatedString::from("https://drm.example");
        let encoded = schm.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, schm.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<SchemeTypeBox>().unwrap();
        assert_eq!(read_back.scheme_type, types::CENC);
        assert_eq!(
            read_back.scheme_uri,
            NullTerminatedString::from("https://drm.example")
        );
    }
}
