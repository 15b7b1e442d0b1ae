use std::fmt;

use crate::{
    page::INVALID_PAGE_ID,
    typedef::{PageId, SlotId},
};

/// The only external handle to a record: the page it lives on and its slot
/// index in that page's directory.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordId {
    page_id: PageId,
    slot_id: SlotId,
}

pub const INVALID_RECORD_ID: RecordId = RecordId {
    page_id: INVALID_PAGE_ID,
    slot_id: 0,
};

impl RecordId {
    pub fn new(page_id: PageId, slot_id: SlotId) -> RecordId {
        RecordId { page_id, slot_id }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page_id, self.slot_id)
    }
}

#[cfg(test)]
mod record_id_tests {
    use super::*;

    fn setup() -> RecordId {
        RecordId::new(1, 1)
    }

    #[test]
    fn test_accessors() {
        let rid = setup();
        assert_eq!(1, rid.page_id());
        assert_eq!(1, rid.slot_id());
    }

    #[test]
    fn test_to_string() {
        let rid = setup();
        assert_eq!("1:1", rid.to_string());
        assert_eq!(format!("{}:0", PageId::MAX), INVALID_RECORD_ID.to_string());
    }

    #[test]
    fn test_equals() {
        let rid1 = RecordId::new(1, 1);
        let rid1_copy = RecordId::new(1, 1);
        let rid2 = RecordId::new(2, 2);

        assert_eq!(rid1, rid1_copy);
        assert_ne!(rid1, rid2);
        assert_ne!(rid1, RecordId::new(1, 2));
        assert_ne!(rid1, RecordId::new(2, 1));
    }

    #[test]
    fn test_comparison() {
        assert!(RecordId::new(1, 1) < RecordId::new(1, 2));
        assert!(RecordId::new(1, 9) < RecordId::new(2, 0));
        assert!(RecordId::new(3, 1) < RecordId::new(4, 1));
        assert!(RecordId::new(5, 2) > RecordId::new(5, 1));
    }
}
