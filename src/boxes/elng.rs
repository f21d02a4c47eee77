use std::io::{Read, Write};

use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError, NullTerminatedString};

/// Extended Language Box: a BCP 47 language tag such as "en-US" that refines
/// the packed mdhd language code.
#[derive(Default)]
pub struct ExtendedLanguageBox {
    pub full_header: FullHeader,
    pub extended_language: NullTerminatedString,
}

impl Mp4Box for ExtendedLanguageBox {
    fn box_type(&self) -> FourCC {
        types::ELNG
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        self.full_header.header.size =
            self.full_header.header_size() + self.extended_language.byte_size();
        self.full_header.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let size = self.full_header.body_size()?;
        self.extended_language.read_of_size(r, size)
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        self.extended_language.write(w)
    }
}
