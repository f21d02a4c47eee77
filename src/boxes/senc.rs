use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types::{self, UserType};
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

bitflags::bitflags! {
    pub struct SampleEncryptionFlags: u32 {
        /// The box carries its own AlgorithmID / IV size / KID block,
        /// overriding the track encryption defaults for this fragment.
        const OVERRIDE_TRACK_ENCRYPTION_PARAMS = 0x000001;
        /// Subsample mapping data follows each initialization vector.
        const USE_SUBSAMPLE_ENCRYPTION = 0x000002;
    }
}

pub const ALGORITHM_NOT_ENCRYPTED: u32 = 0x00;
pub const ALGORITHM_AES_128_CTR: u32 = 0x01;
pub const ALGORITHM_AES_128_CBC: u32 = 0x02;

pub const IV_SIZE_64_BIT: u8 = 8;
pub const IV_SIZE_128_BIT: u8 = 16;

/// Sample Encryption Box: per-sample initialization vectors and optional
/// subsample clear/encrypted split for protected tracks.
///
/// The box exists under two spellings, the `senc` 4CC and the PIFF `uuid`
/// user type; whichever spelling was read is kept, so the tree re-encodes the
/// way it arrived. The IV width is fixed for the whole box: the override
/// block's IV size when the override flag is set, 8 bytes otherwise.
#[derive(Default)]
pub struct SampleEncryptionBox {
    pub full_header: FullHeader,

    /// 24-bit encryption algorithm identifier; only meaningful with the
    /// override flag.
    pub algorithm_id: u32,
    pub iv_size: u8,
    pub kid: [u8; 16],

    pub samples: Vec<SampleEncryptionSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleEncryptionSample {
    pub initialization_vector: Vec<u8>,
    pub subsamples: Vec<SampleEncryptionSubsample>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleEncryptionSubsample {
    /// Clear bytes at the start of the subsample; may be zero.
    pub clear_bytes: u16,
    /// Encrypted bytes following the clear run; may be zero.
    pub protected_bytes: u32,
}

impl SampleEncryptionBox {
    pub fn flags(&self) -> SampleEncryptionFlags {
        SampleEncryptionFlags::from_bits_truncate(self.full_header.flags)
    }

    fn effective_iv_size(&self) -> u8 {
        if self
            .flags()
            .contains(SampleEncryptionFlags::OVERRIDE_TRACK_ENCRYPTION_PARAMS)
        {
            self.iv_size
        } else {
            IV_SIZE_64_BIT
        }
    }
}

impl Mp4Box for SampleEncryptionBox {
    fn box_type(&self) -> FourCC {
        if self.full_header.header.box_type == types::UUID
            || self.full_header.header.box_type == types::SENC
        {
            self.full_header.header.box_type
        } else {
            types::SENC
        }
    }

    fn user_type(&self) -> UserType {
        if self.full_header.header.box_type == types::UUID
            || self.full_header.header.user_type == types::SAMPLE_ENCRYPTION_USER_TYPE
        {
            types::SAMPLE_ENCRYPTION_USER_TYPE
        } else {
            self.full_header.header.user_type()
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
        self.full_header.header.user_type = self.user_type();
        let flags = self.flags();
        let mut size = self.full_header.header_size();
        if flags.contains(SampleEncryptionFlags::OVERRIDE_TRACK_ENCRYPTION_PARAMS) {
            size += 3 + 1 + 16; // AlgorithmID + IV_size + KID
        }
        size += 4; // sample_count
        size += u32::from(self.effective_iv_size()) * self.samples.len() as u32;
        if flags.contains(SampleEncryptionFlags::USE_SUBSAMPLE_ENCRYPTION) {
            size += 2 * self.samples.len() as u32;
            let subsample_total: u32 = self
                .samples
                .iter()
                .map(|sample| sample.subsamples.len() as u32)
                .sum();
            size += 6 * subsample_total;
        }
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        let flags = self.flags();
        let mut iv_size = IV_SIZE_64_BIT;
        if flags.contains(SampleEncryptionFlags::OVERRIDE_TRACK_ENCRYPTION_PARAMS) {
            let packed = r.read_u32::<BigEndian>()?;
            self.algorithm_id = packed >> 8;
            self.iv_size = packed as u8;
            r.read_exact(&mut self.kid)?;
            iv_size = self.iv_size;
        }
        let sample_count = r.read_u32::<BigEndian>()?;
        self.samples = Vec::with_capacity(sample_count.min(u16::MAX.into()) as usize);
        for _ in 0..sample_count {
            let mut initialization_vector = vec![0u8; iv_size as usize];
            r.read_exact(&mut initialization_vector)?;
            let mut sample = SampleEncryptionSample {
                initialization_vector,
                subsamples: Vec::new(),
            };
            if flags.contains(SampleEncryptionFlags::USE_SUBSAMPLE_ENCRYPTION) {
                let subsample_count = r.read_u16::<BigEndian>()?;
                sample.subsamples = Vec::with_capacity(subsample_count.into());
                for _ in 0..subsample_count {
                    sample.subsamples.push(SampleEncryptionSubsample {
                        clear_bytes: r.read_u16::<BigEndian>()?,
                        protected_bytes: r.read_u32::<BigEndian>()?,
                    });
                }
            }
            self.samples.push(sample);
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        let flags = self.flags();
        if flags.contains(SampleEncryptionFlags::OVERRIDE_TRACK_ENCRYPTION_PARAMS) {
            w.write_u32::<BigEndian>(self.algorithm_id << 8 | u32::from(self.iv_size))?;
            w.write_all(&self.kid)?;
        }
        w.write_u32::<BigEndian>(self.samples.len() as u32)?;
        for sample in &self.samples {
            w.write_all(&sample.initialization_vector)?;
            if flags.contains(SampleEncryptionFlags::USE_SUBSAMPLE_ENCRYPTION) {
                w.write_u16::<BigEndian>(sample.subsamples.len() as u16)?;
                for subsample in &sample.subsamples {
                    w.write_u16::<BigEndian>(subsample.clear_bytes)?;
                    w.write_u32::<BigEndian>(subsample.protected_bytes)?;
                }
            }
        }
        Ok(())
    }
}
