//! Slotted-page record manager for a heap-file storage layer.

pub use heapdb_storage::*;
