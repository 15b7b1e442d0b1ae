//! Slotted heap page.
//!
//! ```text
//! +-------------------+ 0
//! |  HeapPageHeader   |
//! +-------------------+ HEAP_PAGE_HEADER_SIZE  (data region offset 0)
//! |  slot 0, slot 1.. |  grows forward
//! +-------------------+ num_slots * SLOT_SIZE
//! |    free space     |
//! +-------------------+ HEAP_PAGE_DATA_SIZE - fill_ptr
//! |  ..rec 1, rec 0   |  grows backward
//! +-------------------+ PAGE_SIZE
//! ```
//!
//! Slot offsets are relative to the start of the data region. Free space is
//! always the single gap between the directory and the records.

use crate::frame::PageFrame;
use crate::page::record_iterator::RecordIterator;
use crate::page::slot::{Slot, SlotEntry, SLOT_SIZE};
use crate::page::{PageType, INVALID_PAGE_ID, PAGE_SIZE};
use crate::record::{Record, RecordRef};
use crate::record_id::RecordId;
use crate::typedef::{PageId, SlotId};
use crate::Result;
use bytemuck::{Pod, Zeroable};
use heapdb_error::{errdata, Error};
use std::mem;
use tracing::{debug, trace, warn};

#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug)]
pub(crate) struct HeapPageHeader {
    page_id: PageId,
    next_page_id: PageId,
    prev_page_id: PageId,
    num_slots: i32,
    fill_ptr: i32,
    free_space: i32,
    page_type: i32,
}

pub const HEAP_PAGE_HEADER_SIZE: usize = mem::size_of::<HeapPageHeader>();

/// Bytes shared by the slot directory and the record data.
pub const HEAP_PAGE_DATA_SIZE: usize = PAGE_SIZE - HEAP_PAGE_HEADER_SIZE;

/// A slotted heap page over a frame handle. Reads need `T: AsRef<PageFrame>`,
/// mutations additionally `T: AsMut<PageFrame>`.
///
/// The page trusts its own header: it must have been produced by [`init`]
/// or loaded from an image that was.
///
/// [`init`]: HeapPage::init
pub struct HeapPage<T> {
    frame: T,
}

impl<T> HeapPage<T> {
    pub fn new(frame: T) -> Self {
        HeapPage { frame }
    }

    pub fn into_inner(self) -> T {
        self.frame
    }
}

impl<T: AsRef<PageFrame>> HeapPage<T> {
    pub(crate) fn header(&self) -> &HeapPageHeader {
        bytemuck::from_bytes(&self.frame.as_ref().data()[..HEAP_PAGE_HEADER_SIZE])
    }

    pub(crate) fn slot_array(&self) -> &[Slot] {
        let slots_end = HEAP_PAGE_HEADER_SIZE + self.num_slots() * SLOT_SIZE;
        bytemuck::cast_slice(&self.frame.as_ref().data()[HEAP_PAGE_HEADER_SIZE..slots_end])
    }

    fn data_region(&self) -> &[u8] {
        &self.frame.as_ref().data()[HEAP_PAGE_HEADER_SIZE..]
    }

    pub fn page_id(&self) -> PageId {
        self.header().page_id
    }

    pub fn next_page(&self) -> PageId {
        self.header().next_page_id
    }

    pub fn prev_page(&self) -> PageId {
        self.header().prev_page_id
    }

    pub fn page_type(&self) -> PageType {
        PageType::from_i32(self.header().page_type)
    }

    /// Number of directory entries, deleted ones included.
    pub fn num_slots(&self) -> usize {
        self.header().num_slots.max(0) as usize
    }

    fn fill_ptr(&self) -> usize {
        self.header().fill_ptr.max(0) as usize
    }

    /// Data region offset of the most recently placed record.
    fn data_start(&self) -> usize {
        HEAP_PAGE_DATA_SIZE.saturating_sub(self.fill_ptr())
    }

    /// Free bytes between the slot directory and the record data.
    pub fn available_space(&self) -> usize {
        self.header().free_space.max(0) as usize
    }

    pub fn slot_entry(&self, slot_id: SlotId) -> Option<SlotEntry> {
        self.slot_array()
            .get(slot_id as usize)
            .and_then(|slot| slot.entry())
    }

    pub fn num_records(&self) -> usize {
        self.slot_array()
            .iter()
            .filter(|slot| !slot.is_deleted())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.num_records() == 0
    }

    /// First live record in slot order, or `None` if the page holds none.
    pub fn first_record(&self) -> Option<RecordId> {
        self.live_slot_from(0)
    }

    /// Next live record after `cur` in slot order. Returns `None` at the end of
    /// the directory or when `cur` belongs to another page.
    pub fn next_record(&self, cur: &RecordId) -> Option<RecordId> {
        if cur.page_id() != self.page_id() {
            return None;
        }
        self.live_slot_from(cur.slot_id() as usize + 1)
    }

    fn live_slot_from(&self, start: usize) -> Option<RecordId> {
        self.slot_array()
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, slot)| !slot.is_deleted())
            .map(|(slot_id, _)| RecordId::new(self.page_id(), slot_id as SlotId))
    }

    /// Copies the record out of the page.
    pub fn get_record(&self, rid: &RecordId) -> Result<Record> {
        Ok(self.return_record(rid)?.to_record())
    }

    /// Returns a view of the record inside the page buffer.
    pub fn return_record(&self, rid: &RecordId) -> Result<RecordRef<'_>> {
        let (offset, length) = self.locate(rid)?;
        Ok(RecordRef::new(&self.data_region()[offset..offset + length]))
    }

    /// Iterates over live records in slot order.
    pub fn records(&self) -> RecordIterator<'_, T> {
        RecordIterator::new(self)
    }

    /// Resolves a record id to its `(offset, length)` in the data region.
    fn locate(&self, rid: &RecordId) -> Result<(usize, usize)> {
        let slot_id = rid.slot_id() as usize;
        if rid.page_id() != self.page_id() || slot_id >= self.num_slots() {
            return Err(Error::RecordNotFound(rid.to_string()));
        }

        match self.slot_array()[slot_id].entry() {
            Some(SlotEntry::Occupied { offset, length }) => {
                let end = offset + length;
                if offset < self.data_start() || end > HEAP_PAGE_DATA_SIZE {
                    warn!(%rid, offset, length, "slot points outside the record area");
                    return errdata!(
                        "slot {} spans [{}, {}) outside the record area [{}, {})",
                        rid,
                        offset,
                        end,
                        self.data_start(),
                        HEAP_PAGE_DATA_SIZE
                    );
                }
                Ok((offset, length))
            }
            Some(SlotEntry::Deleted) => Err(Error::RecordNotFound(rid.to_string())),
            None => errdata!("slot {} is malformed", rid),
        }
    }
}

impl<T: AsRef<PageFrame> + AsMut<PageFrame>> HeapPage<T> {
    pub(crate) fn header_mut(&mut self) -> &mut HeapPageHeader {
        bytemuck::from_bytes_mut(&mut self.frame.as_mut().data_mut()[..HEAP_PAGE_HEADER_SIZE])
    }

    pub(crate) fn slot_array_mut(&mut self) -> &mut [Slot] {
        let slots_end = HEAP_PAGE_HEADER_SIZE + self.num_slots() * SLOT_SIZE;
        bytemuck::cast_slice_mut(
            &mut self.frame.as_mut().data_mut()[HEAP_PAGE_HEADER_SIZE..slots_end],
        )
    }

    fn data_region_mut(&mut self) -> &mut [u8] {
        &mut self.frame.as_mut().data_mut()[HEAP_PAGE_HEADER_SIZE..]
    }

    /// Resets the page to empty: no slots, no data, no neighbours.
    pub fn init(&mut self, page_id: PageId) {
        *self.header_mut() = HeapPageHeader {
            page_id,
            next_page_id: INVALID_PAGE_ID,
            prev_page_id: INVALID_PAGE_ID,
            num_slots: 0,
            fill_ptr: 0,
            free_space: HEAP_PAGE_DATA_SIZE as i32,
            page_type: PageType::Heap as i32,
        };
        debug!(page_id, "initialized heap page");
    }

    pub fn set_next_page(&mut self, page_id: PageId) {
        self.header_mut().next_page_id = page_id;
    }

    pub fn set_prev_page(&mut self, page_id: PageId) {
        self.header_mut().prev_page_id = page_id;
    }

    /// Appends a record and a new slot for it.
    ///
    /// Fails with [`Error::InsufficientSpace`] without touching the page when
    /// the record and its slot don't fit.
    pub fn insert_record(&mut self, record: &[u8]) -> Result<RecordId> {
        let length = record.len();
        let needed = length.saturating_add(SLOT_SIZE);
        let available = self.available_space();
        if needed > available {
            return Err(Error::InsufficientSpace { needed, available });
        }

        let slot_id = self.num_slots();
        let fill_ptr = self.fill_ptr() + length;
        let offset = HEAP_PAGE_DATA_SIZE - fill_ptr;
        let slot_start = slot_id * SLOT_SIZE;

        let region = self.data_region_mut();
        region[offset..offset + length].copy_from_slice(record);
        region[slot_start..slot_start + SLOT_SIZE]
            .copy_from_slice(bytemuck::bytes_of(&Slot::occupied(offset, length)));

        let header = self.header_mut();
        header.num_slots += 1;
        header.fill_ptr = fill_ptr as i32;
        header.free_space -= needed as i32;

        let rid = RecordId::new(self.page_id(), slot_id as SlotId);
        trace!(%rid, length, "inserted record");
        Ok(rid)
    }

    /// Removes a record and closes the gap it leaves in the record area.
    ///
    /// Records placed after the deleted one move toward the end of the page
    /// and their slots are updated; slot indices stay as they are. The slot
    /// itself stays in the directory, marked deleted, until
    /// [`compact_slot_dir`](HeapPage::compact_slot_dir).
    pub fn delete_record(&mut self, rid: &RecordId) -> Result<()> {
        let (offset, length) = self.locate(rid)?;
        let data_start = self.data_start();
        let deleted = rid.slot_id() as usize;

        // The records that move must tile [data_start, offset) exactly.
        let mut shifted_bytes = 0;
        for (slot_id, slot) in self.slot_array().iter().enumerate() {
            if slot_id == deleted {
                continue;
            }
            match slot.entry() {
                Some(SlotEntry::Occupied {
                    offset: other,
                    length: other_len,
                }) if other + other_len <= offset => {
                    if other < data_start {
                        warn!(%rid, slot_id, other, data_start, "record below the fill pointer");
                        return errdata!(
                            "slot {} of page {} starts at {} below the record area at {}",
                            slot_id,
                            self.page_id(),
                            other,
                            data_start
                        );
                    }
                    shifted_bytes += other_len;
                }
                Some(_) => {}
                None => return errdata!("slot {} of page {} is malformed", slot_id, self.page_id()),
            }
        }
        if shifted_bytes != offset - data_start {
            warn!(%rid, shifted_bytes, gap = offset - data_start, "shift range mismatch");
            return errdata!(
                "records placed after {} cover {} bytes, expected {}",
                rid,
                shifted_bytes,
                offset - data_start
            );
        }

        let region = self.data_region_mut();
        region.copy_within(data_start..offset, data_start + length);
        region[data_start..data_start + length].fill(0);

        for (slot_id, slot) in self.slot_array_mut().iter_mut().enumerate() {
            if slot_id == deleted {
                *slot = Slot::deleted();
                continue;
            }
            if let Some(SlotEntry::Occupied {
                offset: other,
                length: other_len,
            }) = slot.entry()
            {
                if other + other_len <= offset {
                    slot.add_offset(length);
                }
            }
        }

        let header = self.header_mut();
        header.fill_ptr -= length as i32;
        header.free_space += length as i32;

        trace!(%rid, length, shifted_bytes, "deleted record");
        Ok(())
    }

    /// Reclaims directory entries of deleted slots by moving live slots from
    /// the back of the directory into holes at the front. Returns the number
    /// of entries reclaimed.
    ///
    /// Relocated records get new slot indices, so record ids taken before this
    /// call must be refreshed with a new scan.
    pub fn compact_slot_dir(&mut self) -> usize {
        let num_slots = self.num_slots();
        let slots = self.slot_array_mut();

        // [0, low) is live; [high, num_slots) is deleted or already moved.
        let (mut low, mut high) = (0, num_slots);
        while low < high {
            if !slots[low].is_deleted() {
                low += 1;
            } else if slots[high - 1].is_deleted() {
                high -= 1;
            } else {
                slots[low] = slots[high - 1];
                slots[high - 1] = Slot::deleted();
                low += 1;
                high -= 1;
            }
        }

        let reclaimed = num_slots - low;
        let header = self.header_mut();
        header.num_slots = low as i32;
        header.free_space += (reclaimed * SLOT_SIZE) as i32;

        debug!(page_id = header.page_id, live = low, reclaimed, "compacted slot directory");
        reclaimed
    }
}

/// Type alias for immutable HeapPage
pub type HeapPageRef<'a> = HeapPage<&'a PageFrame>;
/// Type alias for mutable HeapPage
pub type HeapPageMut<'a> = HeapPage<&'a mut PageFrame>;

impl<'a> From<&'a PageFrame> for HeapPageRef<'a> {
    fn from(frame: &'a PageFrame) -> Self {
        HeapPage { frame }
    }
}

impl<'a> From<&'a mut PageFrame> for HeapPageMut<'a> {
    fn from(frame: &'a mut PageFrame) -> Self {
        HeapPage { frame }
    }
}
