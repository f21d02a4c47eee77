use std::collections::HashMap;
use std::io::{Read, Write};

use four_cc::FourCC;
use tracing::trace;

use crate::{read_box, Mp4Box, Mp4BoxError};

/// Child storage for composite boxes: one ordered list that owns the children,
/// plus a type-keyed view over the same objects. The view holds positions into
/// the list, is allocated lazily on the first append and rebuilt wholesale on
/// replace.
#[derive(Default)]
pub struct Container {
    children: Vec<Box<dyn Mp4Box>>,
    by_type: Option<HashMap<FourCC, Vec<usize>>>,
}

impl Container {
    /// Bottom-up size pass over the children; returns the summed child sizes.
    pub fn update_children(&mut self) -> u32 {
        self.children.iter_mut().map(|child| child.update()).sum()
    }

    /// Reads children until the byte budget declared by the parent is used up
    /// exactly. A child claiming to extend past the parent boundary, or a
    /// trailing remainder too small to hold another box header, is a format
    /// error.
    pub fn read_children(&mut self, r: &mut dyn Read, size: u32) -> Result<(), Mp4BoxError> {
        let mut remaining = size;
        while remaining > 0 {
            if remaining < 8 {
                trace!("{} trailing container bytes cannot hold a box header", remaining);
                return Err(Mp4BoxError::InvalidFormat(
                    "trailing container bytes too small for a box header",
                ));
            }
            let child = read_box(r)?;
            let child_size = child.size();
            if child_size < 8 {
                return Err(Mp4BoxError::InvalidFormat(
                    "child box declares an impossible size",
                ));
            }
            if child_size > remaining {
                return Err(Mp4BoxError::InvalidFormat(
                    "child box exceeds parent boundary",
                ));
            }
            remaining -= child_size;
            self.append(child);
        }
        Ok(())
    }

    /// Writes the children in exactly their stored order.
    pub fn write_children(&self, w: &mut dyn Write) -> Result<(), Mp4BoxError> {
        for child in &self.children {
            child.write(w)?;
        }
        Ok(())
    }

    pub fn append(&mut self, child: Box<dyn Mp4Box>) {
        let box_type = child.box_type();
        self.children.push(child);
        self.by_type
            .get_or_insert_with(HashMap::new)
            .entry(box_type)
            .or_default()
            .push(self.children.len() - 1);
    }

    pub fn replace_children(&mut self, children: Vec<Box<dyn Mp4Box>>) {
        self.children = children;
        let mut by_type: HashMap<FourCC, Vec<usize>> = HashMap::new();
        for (position, child) in self.children.iter().enumerate() {
            by_type.entry(child.box_type()).or_default().push(position);
        }
        self.by_type = Some(by_type);
    }

    pub fn children(&self) -> &[Box<dyn Mp4Box>] {
        &self.children
    }

    pub fn find_all(&self, box_type: FourCC) -> Vec<&dyn Mp4Box> {
        self.positions(box_type)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| self.children[position].as_ref())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn find_first(&self, box_type: FourCC) -> Option<&dyn Mp4Box> {
        self.positions(box_type)
            .and_then(|positions| positions.first())
            .map(|&position| self.children[position].as_ref())
    }

    pub fn find_last(&self, box_type: FourCC) -> Option<&dyn Mp4Box> {
        self.positions(box_type)
            .and_then(|positions| positions.last())
            .map(|&position| self.children[position].as_ref())
    }

    fn positions(&self, box_type: FourCC) -> Option<&Vec<usize>> {
        self.by_type.as_ref().and_then(|map| map.get(&box_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{MovieBox, TrackBox, UnknownBox};
    use crate::types;
    use std::io::Cursor;

    fn track() -> Box<dyn Mp4Box> {
        Box::<TrackBox>::default()
    }

    #[test]
    fn append_keeps_order_and_index_in_sync() {
        let mut container = Container::default();
        container.append(track());
        container.append(Box::<MovieBox>::default());
        container.append(track());

        assert_eq!(container.children().len(), 3);
        assert_eq!(container.find_all(types::TRAK).len(), 2);
        assert_eq!(
            container.find_first(types::TRAK).unwrap().box_type(),
            types::TRAK
        );
        assert!(container.find_first(types::MDIA).is_none());
    }

    #[test]
    fn replace_children_rebuilds_the_index() {
        let mut container = Container::default();
        container.append(track());
        container.replace_children(vec![Box::<MovieBox>::default()]);

        assert!(container.find_all(types::TRAK).is_empty());
        assert_eq!(container.find_all(types::MOOV).len(), 1);
    }

    #[test]
    fn child_past_parent_boundary_is_invalid() {
        // an 8-byte unknown child inside a parent that only budgets 8 bytes,
        // but the child claims 16
        let mut body = Vec::new();
        body.extend_from_slice(&16u32.to_be_bytes());
        body.extend_from_slice(b"wide");
        body.extend_from_slice(&[0u8; 8]);

        let mut container = Container::default();
        let err = container
            .read_children(&mut Cursor::new(body), 8)
            .unwrap_err();
        assert!(matches!(err, Mp4BoxError::InvalidFormat(_)));
    }

    #[test]
    fn truncated_stream_is_an_io_error_not_a_hang() {
        let mut body = Vec::new();
        body.extend_from_slice(&32u32.to_be_bytes());
        body.extend_from_slice(b"blob");
        body.extend_from_slice(&[0u8; 4]); // 20 bytes short

        let mut container = Container::default();
        let err = container
            .read_children(&mut Cursor::new(body), 32)
            .unwrap_err();
        assert!(matches!(err, Mp4BoxError::IoError(_)));
    }

    #[test]
    fn trailing_remainder_too_small_for_a_header_is_invalid() {
        let mut unknown = UnknownBox::default();
        unknown.set_box_type(types::FREE);
        unknown.data = vec![0xAB; 4];
        let encoded = unknown.to_bytes().unwrap();

        // parent budget claims 3 bytes beyond the only child
        let mut container = Container::default();
        let mut stream = Cursor::new([encoded.as_ref(), &[0u8, 0, 0][..]].concat());
        let err = container
            .read_children(&mut stream, encoded.len() as u32 + 3)
            .unwrap_err();
        assert!(matches!(err, Mp4BoxError::InvalidFormat(_)));
    }
}
