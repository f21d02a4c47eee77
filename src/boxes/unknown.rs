use std::io::{Read, Write};

use four_cc::FourCC;

use crate::{Header, Mp4Box, Mp4BoxError};

/// Fallback for any tag the registry does not know: the body is stored raw
/// and replayed unchanged, so unrecognized boxes survive a decode/encode pass
/// byte-identical. Unknown is deliberately not an error — only malformed
/// boxes are rejected.
#[derive(Default)]
pub struct UnknownBox {
    pub header: Header,
    pub data: Vec<u8>,
}

impl Mp4Box for UnknownBox {
    fn box_type(&self) -> FourCC {
        self.header.box_type
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.size = self.header.header_size() + self.data.len() as u32;
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        let body_size = self.header.body_size()?;
        let mut data = vec![0u8; body_size as usize];
        r.read_exact(&mut data)?;
        self.data = data;
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_all(&self.data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn unregistered_tag_round_trips_byte_identical() {
        let mut original = Vec::new();
        original.extend_from_slice(&13u32.to_be_bytes());
        original.extend_from_slice(b"wxyz");
        original.extend_from_slice(&[1, 2, 3, 4, 5]);

        let mut boks = crate::read_box(&mut Cursor::new(original.clone())).unwrap();
        assert_eq!(boks.box_type(), FourCC(*b"wxyz"));
        assert_eq!(boks.to_bytes().unwrap(), original);
    }

    #[test]
    fn unregistered_uuid_user_type_keeps_its_extended_header() {
        let mut original = Vec::new();
        original.extend_from_slice(&26u32.to_be_bytes());
        original.extend_from_slice(b"uuid");
        original.extend_from_slice(&[0x42; 16]);
        original.extend_from_slice(&[9, 9]);

        let mut boks = crate::read_box(&mut Cursor::new(original.clone())).unwrap();
        assert!(boks.downcast_ref::<UnknownBox>().is_some());
        assert_eq!(boks.header().header_size(), 24);
        assert_eq!(boks.user_type().as_bytes(), &[0x42; 16]);
        assert_eq!(boks.to_bytes().unwrap(), original);
    }

    #[test]
    fn declared_size_below_the_header_is_invalid() {
        let mut original = Vec::new();
        original.extend_from_slice(&7u32.to_be_bytes());
        original.extend_from_slice(b"wxyz");

        let err = match crate::read_box(&mut Cursor::new(original)) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(matches!(err, Mp4BoxError::InvalidFormat(_)));
    }
}
