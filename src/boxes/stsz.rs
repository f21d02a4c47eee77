use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

/// Sample Size Box. A nonzero `sample_size` declares one constant size for
/// every sample and the per-sample array is omitted; the array is present
/// exactly when `sample_size` is zero. Presence is signaled by that sentinel,
/// not by a flag bit.
#[derive(Default)]
pub struct SampleSizeBox {
    pub full_header: FullHeader,
    pub sample_size: u32,
    /// Sample count for the constant-size variant; ignored (and rederived
    /// from the array) when `sample_size` is 0.
    pub sample_count: u32,
    /// Per-sample sizes; only meaningful (and only encoded) when
    /// `sample_size` is 0.
    pub sample_sizes: Vec<u32>,
}

impl SampleSizeBox {
    /// Number of samples described, whichever variant is in use.
    pub fn sample_count(&self) -> u32 {
        if self.sample_size == 0 {
            self.sample_sizes.len() as u32
        } else {
            self.sample_count
        }
    }
}

impl Mp4Box for SampleSizeBox {
    fn box_type(&self) -> FourCC {
        types::STSZ
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
        size += 4; // sample_size
        size += 4; // sample_count
        if self.sample_size == 0 {
            size += 4 * self.sample_sizes.len() as u32;
        }
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        self.sample_size = r.read_u32::<BigEndian>()?;
        self.sample_count = r.read_u32::<BigEndian>()?;
        if self.sample_size == 0 {
            self.sample_sizes = Vec::with_capacity(self.sample_count.min(u16::MAX.into()) as usize);
            for _ in 0..self.sample_count {
                self.sample_sizes.push(r.read_u32::<BigEndian>()?);
            }
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.sample_size)?;
        w.write_u32::<BigEndian>(self.sample_count())?;
        if self.sample_size == 0 {
            for &sample_size in &self.sample_sizes {
                w.write_u32::<BigEndian>(sample_size)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn zero_sentinel_carries_the_per_sample_array() {
        let mut stsz = SampleSizeBox {
            sample_sizes: vec![100, 200, 300],
            ..Default::default()
        };
        let encoded = stsz.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, stsz.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<SampleSizeBox>().unwrap();
        assert_eq!(read_back.sample_size, 0);
        assert_eq!(read_back.sample_sizes, [100, 200, 300]);
        assert_eq!(read_back.sample_count(), 3);
    }

    #[test]
    fn constant_size_omits_the_array() {
        let mut stsz = SampleSizeBox {
            sample_size: 512,
            sample_count: 1000,
            ..Default::default()
        };
        let encoded = stsz.to_bytes().unwrap();
        assert_eq!(encoded.len(), 20);

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<SampleSizeBox>().unwrap();
        assert_eq!(read_back.sample_size, 512);
        assert_eq!(read_back.sample_count(), 1000);
        assert!(read_back.sample_sizes.is_empty());
    }
}
