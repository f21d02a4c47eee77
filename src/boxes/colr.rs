use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Header, Mp4Box, Mp4BoxError};

/// Colour Information Box. The body layout is chosen by the `colour_type`
/// sub-tag rather than version or flags: `nclx`/`nclc` carry fixed
/// colorimetry fields (with a full-range bit only for `nclx`), `rICC`/`prof`
/// carry a raw ICC profile sized by the remaining declared length, and any
/// other sub-tag is preserved as an opaque blob so the box still round-trips.
#[derive(Clone)]
pub struct ColourInformationBox {
    pub header: Header,
    pub colour_type: FourCC,
    pub colour_primaries: u16,
    pub transfer_characteristics: u16,
    pub matrix_coefficients: u16,
    pub full_range: bool,
    pub icc_profile: Vec<u8>,
    pub unknown_data: Vec<u8>,
}

impl Default for ColourInformationBox {
    fn default() -> Self {
        ColourInformationBox {
            header: Header::default(),
            colour_type: types::NCLX,
            colour_primaries: 0,
            transfer_characteristics: 0,
            matrix_coefficients: 0,
            full_range: false,
            icc_profile: Vec::new(),
            unknown_data: Vec::new(),
        }
    }
}

impl Mp4Box for ColourInformationBox {
    fn box_type(&self) -> FourCC {
        types::COLR
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn update(&mut self) -> u32 {
        self.header.box_type = self.box_type();
        let mut size = self.header.header_size();
        size += 4; // colour_type
        if self.colour_type == types::NCLX {
            size += 2 + 2 + 2 + 1;
        } else if self.colour_type == types::NCLC {
            size += 2 + 2 + 2;
        } else if self.colour_type == types::RICC || self.colour_type == types::PROF {
            size += self.icc_profile.len() as u32;
        } else {
            size += self.unknown_data.len() as u32;
        }
        self.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        let mut colour_type = [0u8; 4];
        r.read_exact(&mut colour_type)?;
        self.colour_type = FourCC(colour_type);
        if self.colour_type == types::NCLX || self.colour_type == types::NCLC {
            self.colour_primaries = r.read_u16::<BigEndian>()?;
            self.transfer_characteristics = r.read_u16::<BigEndian>()?;
            self.matrix_coefficients = r.read_u16::<BigEndian>()?;
            if self.colour_type == types::NCLX {
                self.full_range = r.read_u8()? >> 7 > 0;
            }
        } else {
            let remaining = self
                .header
                .body_size()?
                .checked_sub(4)
                .ok_or(Mp4BoxError::InvalidFormat("colr box too small"))?;
            let mut data = vec![0u8; remaining as usize];
            r.read_exact(&mut data)?;
            if self.colour_type == types::RICC || self.colour_type == types::PROF {
                self.icc_profile = data;
            } else {
                self.unknown_data = data;
            }
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_all(&self.colour_type.0)?;
        if self.colour_type == types::NCLX || self.colour_type == types::NCLC {
            w.write_u16::<BigEndian>(self.colour_primaries)?;
            w.write_u16::<BigEndian>(self.transfer_characteristics)?;
            w.write_u16::<BigEndian>(self.matrix_coefficients)?;
            if self.colour_type == types::NCLX {
                w.write_u8(if self.full_range { 1 << 7 } else { 0 })?;
            }
        } else if self.colour_type == types::RICC || self.colour_type == types::PROF {
            w.write_all(&self.icc_profile)?;
        } else {
            w.write_all(&self.unknown_data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn round_trip(colr: &mut ColourInformationBox) -> ColourInformationBox {
        let encoded = colr.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, colr.size());
        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        boks.downcast_ref::<ColourInformationBox>().unwrap().clone()
    }

    #[test]
    fn nclx_carries_the_full_range_bit() {
        let mut colr = ColourInformationBox {
            colour_type: types::NCLX,
            colour_primaries: 9,
            transfer_characteristics: 16,
            matrix_coefficients: 9,
            full_range: true,
            ..Default::default()
        };
        let read_back = round_trip(&mut colr);
        assert!(read_back.full_range);
        assert_eq!(read_back.colour_primaries, 9);
    }

    #[test]
    fn nclc_has_no_full_range_bit() {
        let mut colr = ColourInformationBox {
            colour_type: types::NCLC,
            colour_primaries: 1,
            transfer_characteristics: 1,
            matrix_coefficients: 1,
            ..Default::default()
        };
        let read_back = round_trip(&mut colr);
        assert!(!read_back.full_range);
    }

    #[test]
    fn profile_blobs_round_trip_even_when_empty() {
        let mut colr = ColourInformationBox {
            colour_type: types::PROF,
            icc_profile: Vec::new(),
            ..Default::default()
        };
        assert_eq!(round_trip(&mut colr).icc_profile, Vec::<u8>::new());

        colr.icc_profile = vec![1, 2, 3, 4];
        assert_eq!(round_trip(&mut colr).icc_profile, [1, 2, 3, 4]);
    }

    #[test]
    fn unknown_colour_type_is_preserved() {
        let mut colr = ColourInformationBox {
            colour_type: FourCC(*b"xyzw"),
            unknown_data: vec![7, 8, 9],
            ..Default::default()
        };
        let read_back = round_trip(&mut colr);
        assert_eq!(read_back.colour_type, FourCC(*b"xyzw"));
        assert_eq!(read_back.unknown_data, [7, 8, 9]);
    }
}
