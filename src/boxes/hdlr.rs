use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError, NullTerminatedString};

/// Handler Reference Box: declares how the media in the track should be
/// interpreted (`vide`, `soun`, ...), plus a human-readable name.
pub struct HandlerBox {
    pub full_header: FullHeader,
    pub handler_type: FourCC,
    pub name: NullTerminatedString,
}

impl Default for HandlerBox {
    fn default() -> Self {
        HandlerBox {
            full_header: FullHeader::default(),
            handler_type: FourCC([0; 4]),
            name: NullTerminatedString::default(),
        }
    }
}

impl Mp4Box for HandlerBox {
    fn box_type(&self) -> FourCC {
        types::HDLR
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
        size += 4; // pre_defined
        size += 4; // handler_type
        size += 4 * 3; // reserved
        size += self.name.byte_size();
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let mut fixed = [0u8; 20];
        r.read_exact(&mut fixed)?;
        self.handler_type = FourCC([fixed[4], fixed[5], fixed[6], fixed[7]]);
        let name_size = self
            .full_header
            .body_size()?
            .checked_sub(20)
            .ok_or(Mp4BoxError::InvalidFormat("hdlr box too small"))?;
        self.name.read_of_size(r, name_size)
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        let mut fixed = [0u8; 20];
        fixed[4..8].copy_from_slice(&self.handler_type.0);
        w.write_all(&fixed)?;
        self.name.write(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trip() {
        let mut hdlr = HandlerBox {
            handler_type: types::VIDE,
            name: NullTerminatedString::from("Video Handler"),
            ..Default::default()
        };
        let encoded = hdlr.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, hdlr.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<HandlerBox>().unwrap();
        assert_eq!(read_back.handler_type, types::VIDE);
        assert_eq!(read_back.name, NullTerminatedString::from("Video Handler"));
    }
}
