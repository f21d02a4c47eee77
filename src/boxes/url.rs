use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError, NullTerminatedString};

bitflags::bitflags! {
    pub struct DataEntryFlags: u32 {
        /// Media data lives in the same file as this box; no string payload
        /// follows, not even an empty one.
        const SAME_FILE = 0x000001;
    }
}

/// Data reference entry, either `url ` or `urn `. One decoder serves both
/// tags: the kind is decided by the decoded content (an entry with a name is
/// a URN), not by the tag it was dispatched on.
#[derive(Default)]
pub struct DataEntryBox {
    pub full_header: FullHeader,

    /// URN of the resource; required for (and implies) a `urn ` entry.
    pub name: NullTerminatedString,

    /// URL of the resource; required in a `url ` entry, optional in a `urn `
    /// entry.
    pub location: NullTerminatedString,
}

impl DataEntryBox {
    fn flags(&self) -> DataEntryFlags {
        DataEntryFlags::from_bits_truncate(self.full_header.flags)
    }
}

impl Mp4Box for DataEntryBox {
    fn box_type(&self) -> FourCC {
        if !self.name.is_empty() {
            types::URN
        } else {
            types::URL
        }
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
        if !self.flags().contains(DataEntryFlags::SAME_FILE) {
            if self.full_header.header.box_type == types::URN {
                size += self.name.byte_size();
            }
            size += self.location.byte_size();
        }
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        if self.flags().contains(DataEntryFlags::SAME_FILE) {
            return Ok(());
        }
        let body_size = self.full_header.body_size()?;
        let mut body = vec![0u8; body_size as usize];
        r.read_exact(&mut body)?;

        // The body is one or two NUL-terminated strings; splitting on NUL
        // leaves a trailing empty part when the terminator is in place.
        let parts: Vec<&[u8]> = body.split(|&byte| byte == 0).collect();
        let into_string = |part: &[u8]| -> Result<NullTerminatedString, Mp4BoxError> {
            let value = std::str::from_utf8(part)
                .map_err(|_| Mp4BoxError::InvalidFormat("data entry string is not valid utf-8"))?;
            Ok(NullTerminatedString(value.to_owned()))
        };
        if parts.len() == 2 && parts[1].is_empty() {
            self.full_header.header.box_type = types::URL;
            self.location = into_string(parts[0])?;
        } else if parts.len() == 3 && parts[2].is_empty() {
            self.full_header.header.box_type = types::URN;
            self.name = into_string(parts[0])?;
            self.location = into_string(parts[1])?;
        } else {
            return Err(Mp4BoxError::InvalidFormat(
                "data entry body is not one or two null-terminated strings",
            ));
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        if !self.flags().contains(DataEntryFlags::SAME_FILE) {
            if self.box_type() == types::URN {
                self.name.write(w)?;
            }
            self.location.write(w)?;
        }
        Ok(())
    }
}
