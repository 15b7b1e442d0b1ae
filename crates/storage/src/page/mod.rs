use crate::typedef::PageId;

pub(crate) mod heap_page;
pub(crate) mod record_iterator;
pub(crate) mod slot;

/// Size of every page buffer handed out by the buffer manager.
pub const PAGE_SIZE: usize = 4096;

/// Marks an absent neighbour in the page chain. Stored on the page it has the
/// bit pattern of `-1` as an `int32`.
pub const INVALID_PAGE_ID: PageId = PageId::MAX;

/// Page type tag stored in the heap page header.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// Never initialised.
    Unknown = 0,
    /// Slotted heap page.
    Heap = 1,
}

impl PageType {
    pub(crate) fn from_i32(tag: i32) -> Self {
        match tag {
            1 => PageType::Heap,
            _ => PageType::Unknown,
        }
    }
}
