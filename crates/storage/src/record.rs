use bytes::Bytes;

/// An owned copy of a record's bytes, detached from the page it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    data: Bytes,
}

impl Record {
    pub(crate) fn new(data: Bytes) -> Record {
        Record { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// A record view aliasing the page buffer. It borrows the page, so the page
/// can't be mutated while the view is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordRef<'a> {
    data: &'a [u8],
}

impl<'a> RecordRef<'a> {
    pub(crate) fn new(data: &'a [u8]) -> RecordRef<'a> {
        RecordRef { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Copies the viewed bytes out of the page.
    pub fn to_record(&self) -> Record {
        Record::new(Bytes::copy_from_slice(self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ref_copy_out() {
        let page_bytes = [9u8, 8, 7, 6];
        let view = RecordRef::new(&page_bytes[1..3]);
        assert_eq!(view.len(), 2);

        let record = view.to_record();
        assert_eq!(record.data(), &[8, 7]);
        assert_eq!(record.into_bytes(), Bytes::from_static(&[8, 7]));
        assert!(RecordRef::new(&[]).is_empty());
    }
}
