use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Header, Mp4Box, Mp4BoxError};

/// File Type Box: identifies the brand the file claims conformance to, plus a
/// list of compatible brands.
pub struct FileTypeBox {
    pub header: Header,
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl Default for FileTypeBox {
    fn default() -> Self {
        FileTypeBox::new(types::ISOM, 0, Vec::new())
    }
}

impl FileTypeBox {
    pub fn new(major_brand: FourCC, minor_version: u32, compatible_brands: Vec<FourCC>) -> Self {
        FileTypeBox {
            header: Header::default(),
            major_brand,
            minor_version,
            compatible_brands,
        }
    }
}

impl Mp4Box for FileTypeBox {
    fn box_type(&self) -> FourCC {
        types::FTYP
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
        self.header.size = self.header.header_size();
        self.header.size += 4; // major_brand
        self.header.size += 4; // minor_version
        self.header.size += 4 * self.compatible_brands.len() as u32;
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        let mut brand = [0u8; 4];
        r.read_exact(&mut brand)?;
        self.major_brand = FourCC(brand);
        self.minor_version = r.read_u32::<BigEndian>()?;
        let remaining = self
            .header
            .body_size()?
            .checked_sub(8)
            .ok_or(Mp4BoxError::InvalidFormat("ftyp box too small"))?;
        self.compatible_brands = Vec::with_capacity((remaining / 4) as usize);
        for _ in 0..remaining / 4 {
            r.read_exact(&mut brand)?;
            self.compatible_brands.push(FourCC(brand));
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_all(&self.major_brand.0)?;
        w.write_u32::<BigEndian>(self.minor_version)?;
        for brand in &self.compatible_brands {
            w.write_all(&brand.0)?;
        }
        Ok(())
    }
}
