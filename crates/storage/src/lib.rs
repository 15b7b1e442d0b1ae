mod frame;
mod page;
mod record;
mod record_id;
mod typedef;

pub use frame::PageFrame;
pub use heapdb_error::Error;
pub use page::heap_page::{
    HeapPage, HeapPageMut, HeapPageRef, HEAP_PAGE_DATA_SIZE, HEAP_PAGE_HEADER_SIZE,
};
pub use page::record_iterator::RecordIterator;
pub use page::slot::{SlotEntry, SLOT_SIZE};
pub use page::{PageType, INVALID_PAGE_ID, PAGE_SIZE};
pub use record::{Record, RecordRef};
pub use record_id::{RecordId, INVALID_RECORD_ID};
pub use typedef::{PageId, SlotId};

pub type Result<T> = std::result::Result<T, heapdb_error::Error>;
