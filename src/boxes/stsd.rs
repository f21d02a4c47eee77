use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Container, FullHeader, Header, Mp4Box, Mp4BoxError};

/// Sample Description Box: a counted table of sample entries describing the
/// coding type and initialization data of the track's samples.
#[derive(Default)]
pub struct SampleDescriptionBox {
    pub full_header: FullHeader,
    pub container: Container,
}

impl Mp4Box for SampleDescriptionBox {
    fn box_type(&self) -> FourCC {
        types::STSD
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn container(&self) -> Option<&Container> {
        Some(&self.container)
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        Some(&mut self.container)
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.header.size =
            self.full_header.header_size() + 4 + self.container.update_children();
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let entry_count = r.read_u32::<BigEndian>()?;
        let budget = self
            .full_header
            .body_size()?
            .checked_sub(4)
            .ok_or(Mp4BoxError::InvalidFormat("stsd box too small"))?;
        self.container.read_children(r, budget)?;
        if self.container.children().len() as u32 != entry_count {
            return Err(Mp4BoxError::InvalidFormat("stsd entry count mismatch"));
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.container.children().len() as u32)?;
        self.container.write_children(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::UnknownBox;
    use std::io::Cursor;

    #[test]
    fn entry_count_mismatch_is_invalid() {
        let mut entry = UnknownBox::default();
        entry.set_box_type(FourCC(*b"mp4v"));
        entry.data = vec![0; 4];
        let entry_bytes = entry.to_bytes().unwrap();

        let mut encoded = Vec::new();
        encoded.extend_from_slice(&(16 + entry_bytes.len() as u32).to_be_bytes());
        encoded.extend_from_slice(b"stsd");
        encoded.extend_from_slice(&[0, 0, 0, 0]);
        encoded.extend_from_slice(&2u32.to_be_bytes()); // claims two entries
        encoded.extend_from_slice(&entry_bytes);

        let err = match crate::read_box(&mut Cursor::new(encoded)) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(matches!(err, Mp4BoxError::InvalidFormat(_)));
    }
}
