use std::io::{self, Write};

const FOUR_BYTE_STARTCODE: [u8; 4] = [0, 0, 0, 1];

/// Rewrites a length-prefixed elementary stream into Annex-B framing as it is
/// written through.
///
/// Sample payloads in MP4 tracks carry NAL units behind a 1-4 byte big-endian
/// length prefix (the width comes from the codec configuration record's
/// `length_size_minus_one`). Players that want start codes can wrap their sink
/// in this writer and feed sample bytes in chunks of any size, including one
/// byte at a time; unit boundaries need not align with call boundaries. For
/// every completed prefix it emits one `00 00 00 01` start code followed by
/// that unit's payload. The prefix bytes are consumed, never forwarded.
///
/// A sink error aborts the call immediately; the transducer state is left
/// where the failed write happened.
pub struct SampleToNalWriter<W> {
    inner: W,
    length_size_minus_one: u32,
    nal_length: u32,
    nal_bytes_read: u32,
}

impl<W: Write> SampleToNalWriter<W> {
    pub fn new(inner: W, length_size_minus_one: u32) -> Self {
        debug_assert!(length_size_minus_one <= 3);
        SampleToNalWriter {
            inner,
            length_size_minus_one,
            nal_length: 0,
            nal_bytes_read: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for SampleToNalWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let prefix_size = self.length_size_minus_one + 1;
        let mut consumed = 0;
        while consumed < buf.len() {
            while self.nal_bytes_read < prefix_size && consumed < buf.len() {
                self.nal_length |=
                    u32::from(buf[consumed]) << (8 * (self.length_size_minus_one - self.nal_bytes_read));
                consumed += 1;
                self.nal_bytes_read += 1;
                if self.nal_bytes_read == prefix_size {
                    // count the prefix itself so one pair of counters covers
                    // the whole unit
                    self.nal_length += prefix_size;
                    self.inner.write_all(&FOUR_BYTE_STARTCODE)?;
                }
            }
            if self.nal_bytes_read < prefix_size {
                break;
            }
            let pending = (self.nal_length - self.nal_bytes_read) as usize;
            let length = pending.min(buf.len() - consumed);
            if length > 0 {
                self.inner.write_all(&buf[consumed..consumed + length])?;
                self.nal_bytes_read += length as u32;
                consumed += length;
            }
            if self.nal_length == self.nal_bytes_read {
                // unit complete, arm for the next prefix
                self.nal_length = 0;
                self.nal_bytes_read = 0;
            }
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
