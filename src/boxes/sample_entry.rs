use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use four_cc::FourCC;

use crate::types;
use crate::{Container, Header, Mp4Box, Mp4BoxError};

/// Visual sample entry: the common shape of all video sample descriptions
/// (`avc1`, `hvc1`, the Dolby Vision spellings, ...). The dispatch tag is the
/// coding name and is kept as stored; codec-specific configuration follows as
/// child boxes within the declared boundary.
pub struct VisualSampleEntryBox {
    pub header: Header,
    pub container: Container,

    /// 1-based index into the Data Reference Box.
    pub data_reference_index: u16,

    pub width: u16,
    pub height: u16,
    /// Fixed-point 16.16 pixels-per-inch; 0x00480000 is 72 dpi.
    pub horiz_resolution: u32,
    pub vert_resolution: u32,
    pub frame_count: u16,
    /// Informative coder name, at most 31 bytes on the wire.
    pub compressor_name: String,
    pub depth: u16,
}

impl Default for VisualSampleEntryBox {
    fn default() -> Self {
        VisualSampleEntryBox {
            header: Header {
                box_type: types::AVC1,
                ..Default::default()
            },
            container: Container::default(),
            data_reference_index: 1,
            width: 0,
            height: 0,
            horiz_resolution: 0x0048_0000,
            vert_resolution: 0x0048_0000,
            frame_count: 1,
            compressor_name: String::new(),
            depth: 0x0018,
        }
    }
}

impl VisualSampleEntryBox {
    /// Size of the fixed fields, children excluded.
    fn visual_entry_size(&self) -> u32 {
        self.header.header_size() + 8 + 16 + 4 + 8 + 4 + 2 + 32 + 2 + 2
    }
}

impl Mp4Box for VisualSampleEntryBox {
    fn box_type(&self) -> FourCC {
        self.header.box_type
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn container(&self) -> Option<&Container> {
        Some(&self.container)
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        Some(&mut self.container)
    }

    fn update(&mut self) -> u32 {
        self.header.size = self.visual_entry_size() + self.container.update_children();
        self.header.size
    }

    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError> {
        self.header.read(r, header)?;
        let mut reserved = [0u8; 6];
        r.read_exact(&mut reserved)?;
        self.data_reference_index = r.read_u16::<BigEndian>()?;

        let mut pre_defined = [0u8; 16];
        r.read_exact(&mut pre_defined)?;
        self.width = r.read_u16::<BigEndian>()?;
        self.height = r.read_u16::<BigEndian>()?;
        self.horiz_resolution = r.read_u32::<BigEndian>()?;
        self.vert_resolution = r.read_u32::<BigEndian>()?;
        let _reserved = r.read_u32::<BigEndian>()?;
        self.frame_count = r.read_u16::<BigEndian>()?;

        let mut compressor_name = [0u8; 32];
        r.read_exact(&mut compressor_name)?;
        let name_len = compressor_name[0] as usize;
        if name_len > 31 {
            return Err(Mp4BoxError::InvalidFormat(
                "compressor name length exceeds its 31-byte field",
            ));
        }
        self.compressor_name = String::from_utf8(compressor_name[1..=name_len].to_vec())
            .map_err(|_| Mp4BoxError::InvalidFormat("compressor name is not valid utf-8"))?;

        self.depth = r.read_u16::<BigEndian>()?;
        let _pre_defined = r.read_i16::<BigEndian>()?;

        let budget = self
            .header
            .size
            .checked_sub(self.visual_entry_size())
            .ok_or(Mp4BoxError::InvalidFormat("visual sample entry too small"))?;
        self.container.read_children(r, budget)
    }

    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        self.header.write(w)?;
        w.write_all(&[0u8; 6])?;
        w.write_u16::<BigEndian>(self.data_reference_index)?;

        w.write_all(&[0u8; 16])?;
        w.write_u16::<BigEndian>(self.width)?;
        w.write_u16::<BigEndian>(self.height)?;
        w.write_u32::<BigEndian>(self.horiz_resolution)?;
        w.write_u32::<BigEndian>(self.vert_resolution)?;
        w.write_u32::<BigEndian>(0)?;
        w.write_u16::<BigEndian>(self.frame_count)?;

        if self.compressor_name.len() > 31 {
            return Err(Mp4BoxError::InvalidFormat(
                "compressor name length exceeds its 31-byte field",
            ));
        }
        let mut compressor_name = [0u8; 32];
        compressor_name[0] = self.compressor_name.len() as u8;
        compressor_name[1..=self.compressor_name.len()]
            .copy_from_slice(self.compressor_name.as_bytes());
        w.write_all(&compressor_name)?;

        w.write_u16::<BigEndian>(self.depth)?;
        w.write_i16::<BigEndian>(-1)?;
        self.container.write_children(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::AvcConfigurationBox;
    use crate::CodecConfigRecord;
    use std::io::Cursor;

    #[test]
    fn round_trips_with_a_codec_config_child() {
        let mut entry = VisualSampleEntryBox {
            width: 1280,
            height: 720,
            compressor_name: "x264".to_owned(),
            ..Default::default()
        };
        entry.header.box_type = types::AVC1;
        entry
            .append(Box::new(AvcConfigurationBox {
                config: CodecConfigRecord {
                    data: vec![1, 0x64, 0, 0x1F, 0xFF],
                },
                ..Default::default()
            }))
            .unwrap();

        let encoded = entry.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, entry.size());

        let boks = crate::read_box(&mut Cursor::new(encoded)).unwrap();
        let read_back = boks.downcast_ref::<VisualSampleEntryBox>().unwrap();
        assert_eq!(read_back.box_type(), types::AVC1);
        assert_eq!(read_back.width, 1280);
        assert_eq!(read_back.compressor_name, "x264");

        let avcc = read_back.find_first(types::AVCC).unwrap();
        let avcc = avcc.downcast_ref::<AvcConfigurationBox>().unwrap();
        assert_eq!(avcc.config.data, [1, 0x64, 0, 0x1F, 0xFF]);
    }

    #[test]
    fn empty_compressor_name_still_occupies_32_bytes() {
        let mut entry = VisualSampleEntryBox::default();
        let encoded = entry.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, entry.size());
        assert_eq!(encoded.len(), 86);
    }

    #[test]
    fn oversized_compressor_name_is_invalid() {
        let mut entry = VisualSampleEntryBox {
            compressor_name: "x".repeat(32),
            ..Default::default()
        };
        assert!(matches!(
            entry.to_bytes(),
            Err(Mp4BoxError::InvalidFormat(_))
        ));
    }
}
