use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{FullHeader, Header, Mp4Box, Mp4BoxError};

bitflags::bitflags! {
    pub struct TrackFragmentRunFlags: u32 {
        /// A leading signed data offset, relative to the base established by
        /// the track fragment header.
        const DATA_OFFSET_PRESENT = 0x000001;
        /// A flags override for sample zero only; must not be combined with
        /// per-sample flags.
        const FIRST_SAMPLE_FLAGS_PRESENT = 0x000004;
        const SAMPLE_DURATION_PRESENT = 0x000100;
        const SAMPLE_SIZE_PRESENT = 0x000200;
        const SAMPLE_FLAGS_PRESENT = 0x000400;
        const SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT = 0x000800;
    }
}

/// Track Fragment Run Box: a contiguous batch of samples within a movie
/// fragment. Which per-sample columns exist is decided once for the whole run
/// by the flag bits; the record shape never varies between rows. The
/// composition time offset column is unsigned under version 0 and signed
/// under version 1, at the same 32-bit wire width.
#[derive(Default)]
pub struct TrackFragmentRunBox {
    pub full_header: FullHeader,

    /// Row count of the table below; also encoded even when every column is
    /// absent.
    pub sample_count: u32,

    pub data_offset: i32,
    pub first_sample_flags: u32,
    pub samples: Vec<TrackFragmentRunSample>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackFragmentRunSample {
    pub duration: u32,
    pub size: u32,
    pub flags: u32,
    pub composition_time_offset: i64,
}

impl TrackFragmentRunBox {
    pub fn flags(&self) -> TrackFragmentRunFlags {
        TrackFragmentRunFlags::from_bits_truncate(self.full_header.flags)
    }

    fn sample_entry_size(flags: TrackFragmentRunFlags) -> u32 {
        let mut entry_size = 0;
        if flags.contains(TrackFragmentRunFlags::SAMPLE_DURATION_PRESENT) {
            entry_size += 4;
        }
        if flags.contains(TrackFragmentRunFlags::SAMPLE_SIZE_PRESENT) {
            entry_size += 4;
        }
        if flags.contains(TrackFragmentRunFlags::SAMPLE_FLAGS_PRESENT) {
            entry_size += 4;
        }
        if flags.contains(TrackFragmentRunFlags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT) {
            entry_size += 4;
        }
        entry_size
    }
}

impl Mp4Box for TrackFragmentRunBox {
    fn box_type(&self) -> FourCC {
        types::TRUN
    }

    fn header(&self) -> &Header {
        &self.full_header.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.full_header.header
    }

    fn update(&mut self) -> u32 {
        self.full_header.header.box_type = self.box_type();
        let flags = self.flags();
        let mut size = self.full_header.header_size();
        size += 4; // sample_count
        if flags.contains(TrackFragmentRunFlags::DATA_OFFSET_PRESENT) {
            size += 4;
        }
        if flags.contains(TrackFragmentRunFlags::FIRST_SAMPLE_FLAGS_PRESENT) {
            size += 4;
        }
        size += Self::sample_entry_size(flags) * self.samples.len() as u32;
        self.full_header.header.size = size;
        size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.full_header.read(r, header)?;
        self.sample_count = r.read_u32::<BigEndian>()?;
        let flags = self.flags();
        if flags.contains(TrackFragmentRunFlags::DATA_OFFSET_PRESENT) {
            self.data_offset = r.read_i32::<BigEndian>()?;
        }
        if flags.contains(TrackFragmentRunFlags::FIRST_SAMPLE_FLAGS_PRESENT) {
            self.first_sample_flags = r.read_u32::<BigEndian>()?;
        }
        self.samples = Vec::with_capacity(self.sample_count.min(u16::MAX.into()) as usize);
        for _ in 0..self.sample_count {
            let mut sample = TrackFragmentRunSample::default();
            if flags.contains(TrackFragmentRunFlags::SAMPLE_DURATION_PRESENT) {
                sample.duration = r.read_u32::<BigEndian>()?;
            }
            if flags.contains(TrackFragmentRunFlags::SAMPLE_SIZE_PRESENT) {
                sample.size = r.read_u32::<BigEndian>()?;
            }
            if flags.contains(TrackFragmentRunFlags::SAMPLE_FLAGS_PRESENT) {
                sample.flags = r.read_u32::<BigEndian>()?;
            }
            if flags.contains(TrackFragmentRunFlags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT) {
                sample.composition_time_offset = if self.full_header.version == 0 {
                    i64::from(r.read_u32::<BigEndian>()?)
                } else {
                    i64::from(r.read_i32::<BigEndian>()?)
                };
            }
            self.samples.push(sample);
        }
        Ok(())
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.full_header.write(w)?;
        w.write_u32::<BigEndian>(self.sample_count)?;
        let flags = self.flags();
        if flags.contains(TrackFragmentRunFlags::DATA_OFFSET_PRESENT) {
            w.write_i32::<BigEndian>(self.data_offset)?;
        }
        if flags.contains(TrackFragmentRunFlags::FIRST_SAMPLE_FLAGS_PRESENT) {
            w.write_u32::<BigEndian>(self.first_sample_flags)?;
        }
        for sample in &self.samples {
            if flags.contains(TrackFragmentRunFlags::SAMPLE_DURATION_PRESENT) {
                w.write_u32::<BigEndian>(sample.duration)?;
            }
            if flags.contains(TrackFragmentRunFlags::SAMPLE_SIZE_PRESENT) {
                w.write_u32::<BigEndian>(sample.size)?;
            }
            if flags.contains(TrackFragmentRunFlags::SAMPLE_FLAGS_PRESENT) {
                w.write_u32::<BigEndian>(sample.flags)?;
            }
            if flags.contains(TrackFragmentRunFlags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT) {
                if self.full_header.version == 0 {
                    w.write_u32::<BigEndian>(sample.composition_time_offset as u32)?;
                } else {
                    w.write_i32::<BigEndian>(sample.composition_time_offset as i32)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_with_flags(flags: TrackFragmentRunFlags) -> TrackFragmentRunBox {
        let samples = vec![
            TrackFragmentRunSample {
                duration: 1800,
                size: 4096,
                flags: 0x0101_0000,
                composition_time_offset: 900,
            },
            TrackFragmentRunSample {
                duration: 1801,
                size: 4097,
                flags: 0x0001_0000,
                composition_time_offset: -900,
            },
        ];
        TrackFragmentRunBox {
            full_header: FullHeader {
                version: 1,
                flags: flags.bits(),
                ..Default::default()
            },
            sample_count: samples.len() as u32,
            data_offset: -64,
            first_sample_flags: 0x0200_0000,
            samples,
        }
    }

    fn round_trip(trun: &mut TrackFragmentRunBox) -> TrackFragmentRunBox {
        let encoded = trun.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, trun.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<TrackFragmentRunBox>().unwrap();
        TrackFragmentRunBox {
            full_header: read_back.full_header,
            sample_count: read_back.sample_count,
            data_offset: read_back.data_offset,
            first_sample_flags: read_back.first_sample_flags,
            samples: read_back.samples.clone(),
        }
    }

    #[test]
    fn every_per_sample_flag_combination_round_trips() {
        let per_sample = [
            TrackFragmentRunFlags::SAMPLE_DURATION_PRESENT,
            TrackFragmentRunFlags::SAMPLE_SIZE_PRESENT,
            TrackFragmentRunFlags::SAMPLE_FLAGS_PRESENT,
            TrackFragmentRunFlags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT,
        ];
        for subset in 0u32..16 {
            let mut flags = TrackFragmentRunFlags::empty();
            for (bit, &flag) in per_sample.iter().enumerate() {
                if subset & (1 << bit) != 0 {
                    flags |= flag;
                }
            }

            let mut trun = run_with_flags(flags);
            let expected_entry_size = 4 * subset.count_ones();
            assert_eq!(
                trun.update(),
                12 + 4 + expected_entry_size * 2,
                "flags {:?}",
                flags
            );

            let read_back = round_trip(&mut trun);
            for (sample, original) in read_back.samples.iter().zip(&trun.samples) {
                let zeroed_unless = |present: TrackFragmentRunFlags, value: u32| {
                    if flags.contains(present) {
                        value
                    } else {
                        0
                    }
                };
                assert_eq!(
                    sample.duration,
                    zeroed_unless(TrackFragmentRunFlags::SAMPLE_DURATION_PRESENT, original.duration)
                );
                assert_eq!(
                    sample.size,
                    zeroed_unless(TrackFragmentRunFlags::SAMPLE_SIZE_PRESENT, original.size)
                );
                assert_eq!(
                    sample.flags,
                    zeroed_unless(TrackFragmentRunFlags::SAMPLE_FLAGS_PRESENT, original.flags)
                );
                let expected_offset = if flags
                    .contains(TrackFragmentRunFlags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT)
                {
                    original.composition_time_offset
                } else {
                    0
                };
                assert_eq!(sample.composition_time_offset, expected_offset);
            }
        }
    }

    #[test]
    fn leading_fields_are_gated_independently() {
        let mut trun = run_with_flags(
            TrackFragmentRunFlags::DATA_OFFSET_PRESENT
                | TrackFragmentRunFlags::FIRST_SAMPLE_FLAGS_PRESENT,
        );
        let read_back = round_trip(&mut trun);
        assert_eq!(read_back.data_offset, -64);
        assert_eq!(read_back.first_sample_flags, 0x0200_0000);
        assert_eq!(read_back.sample_count, 2);
        // no per-sample columns were written
        assert_eq!(trun.size(), 12 + 4 + 4 + 4);
    }

    #[test]
    fn version_0_reads_composition_offsets_unsigned() {
        let mut trun = run_with_flags(
            TrackFragmentRunFlags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT,
        );
        trun.full_header.version = 0;
        trun.samples.truncate(1);
        trun.sample_count = 1;
        trun.samples[0].composition_time_offset = i64::from(u32::MAX);

        let read_back = round_trip(&mut trun);
        assert_eq!(read_back.samples[0].composition_time_offset, 4_294_967_295);

        trun.full_header.version = 1;
        trun.samples[0].composition_time_offset = -1;
        let read_back = round_trip(&mut trun);
        assert_eq!(read_back.samples[0].composition_time_offset, -1);
    }
}
