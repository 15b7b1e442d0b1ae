use bytemuck::{Pod, Zeroable};
use std::mem;

/// On-page offset value of a deleted slot.
const DELETED_OFFSET: i32 = -1;

/// Raw slot directory entry as laid out on the page.
#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Slot {
    offset: i32,
    length: i32,
}

pub const SLOT_SIZE: usize = mem::size_of::<Slot>();

/// Decoded view of a slot. The page only ever hands out this form, so a
/// deleted slot can't be mistaken for a record at offset `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEntry {
    Occupied { offset: usize, length: usize },
    Deleted,
}

impl SlotEntry {
    pub fn is_deleted(&self) -> bool {
        matches!(self, SlotEntry::Deleted)
    }
}

impl Slot {
    pub(crate) fn occupied(offset: usize, length: usize) -> Self {
        Self {
            offset: offset as i32,
            length: length as i32,
        }
    }

    pub(crate) fn deleted() -> Self {
        Self {
            offset: DELETED_OFFSET,
            length: 0,
        }
    }

    pub(crate) fn is_deleted(&self) -> bool {
        self.offset == DELETED_OFFSET
    }

    pub(crate) fn add_offset(&mut self, delta: usize) {
        self.offset += delta as i32;
    }

    /// Decodes the raw entry. Negative values other than the deleted marker
    /// yield `None`, which the page reports as corruption.
    pub(crate) fn entry(&self) -> Option<SlotEntry> {
        if self.offset == DELETED_OFFSET {
            return Some(SlotEntry::Deleted);
        }
        if self.offset < 0 || self.length < 0 {
            return None;
        }
        Some(SlotEntry::Occupied {
            offset: self.offset as usize,
            length: self.length as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_layout() {
        assert_eq!(SLOT_SIZE, 8);
        let slot = Slot::occupied(4000, 96);
        let bytes = bytemuck::bytes_of(&slot);
        assert_eq!(&bytes[..4], &4000i32.to_ne_bytes());
        assert_eq!(&bytes[4..], &96i32.to_ne_bytes());
    }

    #[test]
    fn test_deleted_marker() {
        let slot = Slot::deleted();
        assert_eq!(bytemuck::bytes_of(&slot)[..4], (-1i32).to_ne_bytes());
        assert_eq!(slot.entry(), Some(SlotEntry::Deleted));
        assert!(slot.entry().unwrap().is_deleted());
    }

    #[test]
    fn test_entry_decoding() {
        assert_eq!(
            Slot::occupied(12, 0).entry(),
            Some(SlotEntry::Occupied {
                offset: 12,
                length: 0
            })
        );
        let garbage: Slot = bytemuck::cast([-7i32, 3i32]);
        assert_eq!(garbage.entry(), None);
    }
}
