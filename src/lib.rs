//! Structural codec for the ISO base media file format box tree.
//!
//! This crate reads and writes the typed, length-prefixed records ("boxes")
//! that make up MP4 and fragmented-MP4 containers. It is not a media decoder:
//! sample payloads are never interpreted, only the metadata that describes
//! them. Parsed boxes form an owned tree; after mutating a subtree, call
//! [`Mp4Box::update`] bottom-up to recompute sizes, then [`Mp4Box::write`].
//!
//! Unknown tags are not an error: they decode into [`UnknownBox`], which
//! replays its bytes unchanged on write.

use std::any::Any;
use std::io::{self, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};
use four_cc::FourCC;
use tracing::trace;

mod codec_config;
mod container;
mod header;
mod nal;
mod nul_string;
mod registry;
pub mod types;

mod boxes;

pub use boxes::*;
pub use codec_config::CodecConfigRecord;
pub use container::Container;
pub use header::{FullHeader, Header};
pub use nal::SampleToNalWriter;
pub use nul_string::NullTerminatedString;
pub use registry::{new_box, new_uuid_box, register_box, register_uuid_box};
pub use types::{user_type_for, UserType};

#[derive(Debug, thiserror::Error)]
pub enum Mp4BoxError {
    #[error("failed to read or write box: {0}")]
    IoError(#[from] io::Error),
    #[error("mp4 format error: {0}")]
    InvalidFormat(&'static str),
    #[error("this box cannot have child boxes")]
    ChildBoxNotSupported,
    #[error("serialization not supported")]
    UnsupportedSerialization,
}

/// A trait interface for a MP4 box.
///
/// Concrete boxes hold a [`Header`] or [`FullHeader`] by value and, when they
/// can own children, a [`Container`]. The container surface below defaults to
/// the leaf behavior: no children, and appends fail with
/// [`Mp4BoxError::ChildBoxNotSupported`]. Composite boxes override
/// [`Mp4Box::container`]/[`Mp4Box::container_mut`] and inherit the rest.
pub trait Mp4Box: Any {
    /// The tag this box encodes under. Most boxes return a constant; boxes
    /// that keep their dispatch tag (unknown boxes, sample entries) or derive
    /// it from content (data-reference entries) return a computed value.
    fn box_type(&self) -> FourCC;

    fn header(&self) -> &Header;

    fn header_mut(&mut self) -> &mut Header;

    fn size(&self) -> u32 {
        self.header().size
    }

    fn user_type(&self) -> UserType {
        self.header().user_type()
    }

    fn set_box_type(&mut self, box_type: FourCC) {
        self.header_mut().box_type = box_type;
    }

    fn set_user_type(&mut self, user_type: UserType) {
        self.header_mut().user_type = user_type;
    }

    /// Recomputes the stored size (and normalizes the stored tag) from the
    /// current field values, bottom-up through any children. Idempotent; must
    /// run after any subtree mutation and before [`Mp4Box::write`].
    fn update(&mut self) -> u32;

    /// Decodes the box from the stream. When the caller already peeked the
    /// header it is passed in and no header bytes are consumed.
    fn read(&mut self, r: &mut dyn Read, header: Option<&Header>) -> Result<(), Mp4BoxError>;

    /// Encodes the box. Assumes [`Mp4Box::update`] ran on the current state.
    fn write(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError>;

    /// Updates, then encodes into a freshly allocated buffer.
    fn to_bytes(&mut self) -> Result<Bytes, Mp4BoxError> {
        let size = self.update();
        let mut buf = BytesMut::with_capacity(size as usize).writer();
        self.write(&mut buf)?;
        Ok(buf.into_inner().freeze())
    }

    fn container(&self) -> Option<&Container> {
        None
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        None
    }

    fn is_container(&self) -> bool {
        self.container().is_some()
    }

    fn append(&mut self, child: Box<dyn Mp4Box>) -> Result<(), Mp4BoxError> {
        match self.container_mut() {
            Some(container) => {
                container.append(child);
                Ok(())
            }
            None => Err(Mp4BoxError::ChildBoxNotSupported),
        }
    }

    fn replace_children(&mut self, children: Vec<Box<dyn Mp4Box>>) -> Result<(), Mp4BoxError> {
        match self.container_mut() {
            Some(container) => {
                container.replace_children(children);
                Ok(())
            }
            None => Err(Mp4BoxError::ChildBoxNotSupported),
        }
    }

    fn children(&self) -> &[Box<dyn Mp4Box>] {
        self.container().map(Container::children).unwrap_or(&[])
    }

    fn first_child(&self) -> Option<&dyn Mp4Box> {
        self.children().first().map(|child| &**child)
    }

    fn last_child(&self) -> Option<&dyn Mp4Box> {
        self.children().last().map(|child| &**child)
    }

    /// Direct children of the given type, in stored order.
    fn find_all(&self, box_type: FourCC) -> Vec<&dyn Mp4Box> {
        self.container()
            .map(|container| container.find_all(box_type))
            .unwrap_or_default()
    }

    fn find_first(&self, box_type: FourCC) -> Option<&dyn Mp4Box> {
        self.container()
            .and_then(|container| container.find_first(box_type))
    }

    fn find_last(&self, box_type: FourCC) -> Option<&dyn Mp4Box> {
        self.container()
            .and_then(|container| container.find_last(box_type))
    }

    /// Depth-first preorder: a node's own direct matches come before any match
    /// found inside its children, and children are visited in stored order.
    /// Box order can carry meaning, so this ordering is part of the contract.
    fn recursive_find_all(&self, box_type: FourCC) -> Vec<&dyn Mp4Box> {
        let mut found = self.find_all(box_type);
        for child in self.children() {
            found.extend(child.recursive_find_all(box_type));
        }
        found
    }

    fn recursive_find_first(&self, box_type: FourCC) -> Option<&dyn Mp4Box> {
        if let Some(found) = self.find_first(box_type) {
            return Some(found);
        }
        self.children()
            .iter()
            .find_map(|child| child.recursive_find_first(box_type))
    }
}

impl dyn Mp4Box {
    pub fn downcast_ref<T: Mp4Box>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref()
    }

    pub fn downcast_mut<T: Mp4Box>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut()
    }
}

/// Reads just the box prologue, leaving the body unread. Use with
/// [`read_box_after_header`] to skip or special-case boxes before committing
/// to a full decode.
pub fn read_header(r: &mut dyn Read) -> Result<Header, Mp4BoxError> {
    let mut header = Header::default();
    header.read(r, None)?;
    Ok(header)
}

/// Reads one complete box, dispatching on its tag through the registry.
pub fn read_box(r: &mut dyn Read) -> Result<Box<dyn Mp4Box>, Mp4BoxError> {
    let header = read_header(r)?;
    read_box_after_header(r, &header)
}

/// Resumes dispatch after the caller inspected a peeked header.
pub fn read_box_after_header(
    r: &mut dyn Read,
    header: &Header,
) -> Result<Box<dyn Mp4Box>, Mp4BoxError> {
    let mut boks = if header.box_type == types::UUID {
        registry::new_uuid_box(header.user_type)
    } else {
        registry::new_box(header.box_type)
    };
    trace!("reading '{}' box of {} bytes", header.box_type, header.size);
    boks.read(r, Some(header))?;
    Ok(boks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_movie() -> MovieBox {
        let mut moov = MovieBox::default();
        moov.append(Box::new(MovieHeaderBox {
            timescale: 1000,
            duration: 60_000,
            rate: 0x0001_0000,
            volume: 0x0100,
            next_track_id: 2,
            ..Default::default()
        }))
        .unwrap();

        let mut trak = TrackBox::default();
        trak.append(Box::new(TrackHeaderBox {
            track_id: 1,
            duration: 60_000,
            width: 640 << 16,
            height: 480 << 16,
            ..Default::default()
        }))
        .unwrap();

        let mut mdia = MediaBox::default();
        mdia.append(Box::new(MediaHeaderBox {
            timescale: 90_000,
            duration: 5_400_000,
            language: *b"und",
            ..Default::default()
        }))
        .unwrap();
        mdia.append(Box::new(HandlerBox {
            handler_type: types::VIDE,
            name: NullTerminatedString::from("Video Handler"),
            ..Default::default()
        }))
        .unwrap();

        let mut minf = MediaInformationBox::default();
        minf.append(Box::<VideoMediaHeaderBox>::default()).unwrap();

        let mut dinf = DataInformationBox::default();
        let mut dref = DataReferenceBox::default();
        dref.append(Box::new(DataEntryBox {
            full_header: FullHeader {
                flags: DataEntryFlags::SAME_FILE.bits(),
                ..Default::default()
            },
            ..Default::default()
        }))
        .unwrap();
        dinf.append(Box::new(dref)).unwrap();
        minf.append(Box::new(dinf)).unwrap();

        let mut stbl = SampleTableBox::default();
        let mut stsd = SampleDescriptionBox::default();
        let mut avc1 = VisualSampleEntryBox {
            width: 640,
            height: 480,
            ..Default::default()
        };
        avc1.append(Box::new(AvcConfigurationBox {
            config: CodecConfigRecord {
                data: vec![1, 0x42, 0xC0, 0x1E, 0xFF],
            },
            ..Default::default()
        }))
        .unwrap();
        stsd.append(Box::new(avc1)).unwrap();
        stbl.append(Box::new(stsd)).unwrap();
        stbl.append(Box::new(TimeToSampleBox {
            entries: vec![TimeToSampleEntry {
                sample_count: 150,
                sample_delta: 3600,
            }],
            ..Default::default()
        }))
        .unwrap();
        stbl.append(Box::new(SampleToChunkBox {
            entries: vec![SampleToChunkEntry {
                first_chunk: 1,
                samples_per_chunk: 150,
                sample_description_index: 1,
            }],
            ..Default::default()
        }))
        .unwrap();
        stbl.append(Box::new(SampleSizeBox {
            sample_sizes: vec![100; 150],
            ..Default::default()
        }))
        .unwrap();
        stbl.append(Box::new(ChunkOffsetBox {
            chunk_offsets: vec![48],
            ..Default::default()
        }))
        .unwrap();
        minf.append(Box::new(stbl)).unwrap();

        mdia.append(Box::new(minf)).unwrap();
        trak.append(Box::new(mdia)).unwrap();
        moov.append(Box::new(trak)).unwrap();
        moov
    }

    #[test]
    fn movie_tree_round_trips_through_bytes() {
        let mut moov = sample_movie();
        let encoded = moov.to_bytes().unwrap();
        assert_eq!(encoded.len() as u32, moov.size());

        let boks = read_box(&mut Cursor::new(encoded.clone())).unwrap();
        assert_eq!(boks.box_type(), types::MOOV);
        let read_back = boks.downcast_ref::<MovieBox>().unwrap();

        let mvhd = read_back.find_first(types::MVHD).unwrap();
        assert_eq!(mvhd.downcast_ref::<MovieHeaderBox>().unwrap().timescale, 1000);

        // second encode of the parsed tree is byte-identical
        let mut reparsed = read_box(&mut Cursor::new(encoded.clone())).unwrap();
        assert_eq!(reparsed.to_bytes().unwrap(), encoded);
    }

    #[test]
    fn update_is_idempotent() {
        let mut moov = sample_movie();
        let first = moov.update();
        assert_eq!(moov.update(), first);
        assert_eq!(moov.update(), first);
    }

    #[test]
    fn recursive_find_is_depth_first_preorder() {
        let mut moov = sample_movie();
        let encoded = moov.to_bytes().unwrap();
        let boks = read_box(&mut Cursor::new(encoded)).unwrap();

        let headers = boks.recursive_find_all(types::TKHD);
        assert_eq!(headers.len(), 1);

        let stsz = boks.recursive_find_first(types::STSZ).unwrap();
        assert_eq!(
            stsz.downcast_ref::<SampleSizeBox>().unwrap().sample_count(),
            150
        );

        assert!(boks.recursive_find_first(types::SENC).is_none());

        // direct find does not descend
        assert!(boks.find_first(types::TKHD).is_none());
        assert!(boks.find_first(types::TRAK).is_some());
    }

    #[test]
    fn leaf_boxes_refuse_children() {
        let mut mvhd = MovieHeaderBox::default();
        assert!(!mvhd.is_container());
        let err = mvhd.append(Box::<MovieBox>::default()).unwrap_err();
        assert!(matches!(err, Mp4BoxError::ChildBoxNotSupported));
        let err = mvhd.replace_children(Vec::new()).unwrap_err();
        assert!(matches!(err, Mp4BoxError::ChildBoxNotSupported));
    }

    #[test]
    fn peeked_header_resumes_dispatch() {
        let mut moov = sample_movie();
        let mut ftyp = FileTypeBox::new(types::ISOM, 0, vec![types::ISOM]);

        let mut stream = Vec::new();
        stream.extend_from_slice(&ftyp.to_bytes().unwrap());
        stream.extend_from_slice(&moov.to_bytes().unwrap());

        let mut cursor = Cursor::new(stream);
        let header = read_header(&mut cursor).unwrap();
        assert_eq!(header.box_type, types::FTYP);
        let boks = read_box_after_header(&mut cursor, &header).unwrap();
        assert_eq!(boks.box_type(), types::FTYP);

        let moov_header = read_header(&mut cursor).unwrap();
        assert_eq!(moov_header.box_type, types::MOOV);
        let boks = read_box_after_header(&mut cursor, &moov_header).unwrap();
        assert!(boks.downcast_ref::<MovieBox>().is_some());
    }

    #[test]
    fn stored_child_order_is_preserved_on_write() {
        let mut moov = MovieBox::default();
        for box_type in [types::FREE, types::MVHD, types::FREE] {
            let mut child = UnknownBox::default();
            child.set_box_type(box_type);
            child.data = vec![0; 4];
            moov.append(Box::new(child)).unwrap();
        }
        let encoded = moov.to_bytes().unwrap();

        let tags: Vec<&[u8]> = encoded[8..]
            .chunks(12)
            .map(|chunk| &chunk[4..8])
            .collect();
        assert_eq!(tags, [b"free", b"mvhd", b"free"]);

        assert_eq!(moov.find_all(types::FREE).len(), 2);
        assert_eq!(
            moov.find_last(types::FREE).unwrap() as *const dyn Mp4Box,
            moov.children()[2].as_ref() as *const dyn Mp4Box
        );
    }
}
