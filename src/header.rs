use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;
use uuid::Uuid;

use crate::types::{self, UserType};
use crate::Mp4BoxError;

/// Common box prologue: declared total size and the dispatch tag. Boxes with
/// the `uuid` tag carry their real discriminant in the 16-byte user type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Total encoded length of the box, header included. This is the
    /// authoritative boundary for the container engine; it is recomputed by
    /// `update` and never derived from the actual stream length.
    pub size: u32,
    pub box_type: FourCC,
    pub user_type: UserType,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            size: 0,
            box_type: FourCC([0; 4]),
            user_type: Uuid::nil(),
        }
    }
}

impl Header {
    pub fn header_size(&self) -> u32 {
        if self.box_type == types::UUID {
            24
        } else {
            8
        }
    }

    /// Bytes declared to follow the header. The declared size may not undercut
    /// the header itself.
    pub fn body_size(&self) -> Result<u32, Mp4BoxError> {
        self.size.checked_sub(self.header_size()).ok_or(
            Mp4BoxError::InvalidFormat("declared box size smaller than its own header"),
        )
    }

    pub fn user_type(&self) -> UserType {
        if self.box_type == types::UUID {
            self.user_type
        } else {
            types::user_type_for(self.box_type)
        }
    }

    /// Reads the prologue, or copies a header the caller already peeked
    /// without consuming any bytes.
    pub fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        if let Some(header) = header {
            *self = *header;
            return Ok(());
        }
        self.size = r.read_u32::<BigEndian>()?;
        let mut tag = [0u8; 4];
        r.read_exact(&mut tag)?;
        self.box_type = FourCC(tag);
        if self.box_type == types::UUID {
            let mut user_type = [0u8; 16];
            r.read_exact(&mut user_type)?;
            self.user_type = Uuid::from_bytes(user_type);
        }
        Ok(())
    }

    pub fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        w.write_u32::<BigEndian>(self.size)?;
        w.write_all(&self.box_type.0)?;
        if self.box_type == types::UUID {
            w.write_all(self.user_type.as_bytes())?;
        }
        Ok(())
    }
}

/// Extended prologue: version plus a 24-bit flags word. Individual flag bits
/// gate the presence of optional fields in the box body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullHeader {
    pub header: Header,
    pub version: u8,
    pub flags: u32,
}

impl FullHeader {
    pub fn header_size(&self) -> u32 {
        self.header.header_size() + 4
    }

    pub fn body_size(&self) -> Result<u32, Mp4BoxError> {
        self.header.size.checked_sub(self.header_size()).ok_or(
            Mp4BoxError::InvalidFormat("declared box size smaller than its own header"),
        )
    }

    /// Reads the base prologue (or copies a peeked one), then always consumes
    /// version and flags from the stream.
    pub fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        self.version = r.read_u8()?;
        self.flags = r.read_u24::<BigEndian>()?;
        Ok(())
    }

    pub fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_u8(self.version)?;
        w.write_u24::<BigEndian>(self.flags & 0x00ff_ffff)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_round_trip() {
        let header = Header {
            size: 4096,
            box_type: types::MOOV,
            ..Default::default()
        };

        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf, [0, 0, 0x10, 0, b'm', b'o', b'o', b'v']);

        let mut read_back = Header::default();
        read_back.read(&mut Cursor::new(buf), None).unwrap();
        assert_eq!(read_back, header);
        assert_eq!(read_back.header_size(), 8);
    }

    #[test]
    fn uuid_header_reads_extended_type() {
        let header = Header {
            size: 32,
            box_type: types::UUID,
            user_type: types::SAMPLE_ENCRYPTION_USER_TYPE,
        };

        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf.len(), 24);

        let mut read_back = Header::default();
        read_back.read(&mut Cursor::new(buf), None).unwrap();
        assert_eq!(read_back.user_type(), types::SAMPLE_ENCRYPTION_USER_TYPE);
        assert_eq!(read_back.header_size(), 24);
    }

    #[test]
    fn supplied_header_consumes_no_bytes() {
        let peeked = Header {
            size: 16,
            box_type: types::FTYP,
            ..Default::default()
        };

        let mut stream = Cursor::new(vec![0xAA; 8]);
        let mut header = Header::default();
        header.read(&mut stream, Some(&peeked)).unwrap();
        assert_eq!(header, peeked);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn full_header_flags_pack_into_three_bytes() {
        let full = FullHeader {
            header: Header {
                size: 16,
                box_type: types::TRUN,
                ..Default::default()
            },
            version: 1,
            flags: 0x000905,
        };

        let mut buf = Vec::new();
        full.write(&mut buf).unwrap();
        assert_eq!(&buf[8..], [1, 0x00, 0x09, 0x05]);

        let mut read_back = FullHeader::default();
        read_back.read(&mut Cursor::new(buf), None).unwrap();
        assert_eq!(read_back, full);
    }

    #[test]
    fn undersized_box_is_rejected() {
        let header = Header {
            size: 4,
            box_type: types::FREE,
            ..Default::default()
        };
        assert!(matches!(
            header.body_size(),
            Err(Mp4BoxError::InvalidFormat(_))
        ));
    }
}
