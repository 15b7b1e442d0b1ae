use crate::frame::PageFrame;
use crate::page::heap_page::HeapPage;
use crate::record::RecordRef;
use crate::record_id::RecordId;
use crate::Result;

/// An iterator over the live records of one heap page in slot order,
/// returning zero-copy RecordRef values.
pub struct RecordIterator<'a, T> {
    page: &'a HeapPage<T>,
    next: Option<RecordId>,
}

impl<'a, T: AsRef<PageFrame>> RecordIterator<'a, T> {
    pub(crate) fn new(page: &'a HeapPage<T>) -> Self {
        Self {
            page,
            next: page.first_record(),
        }
    }
}

impl<'a, T: AsRef<PageFrame>> Iterator for RecordIterator<'a, T> {
    type Item = Result<(RecordId, RecordRef<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let rid = self.next?;
        self.next = self.page.next_record(&rid);
        Some(self.page.return_record(&rid).map(|record| (rid, record)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{frame::PageFrame, page::heap_page::HeapPageMut, page::heap_page::HeapPageRef};
    use crate::{record_id::RecordId, Result};

    #[test]
    fn test_record_iterator() -> Result<()> {
        let mut frame = PageFrame::new();
        let rid2 = {
            let mut page = HeapPageMut::from(&mut frame);
            page.init(3);
            page.insert_record(&[10, 20, 30])?;
            let rid2 = page.insert_record(&[40, 50])?;
            page.insert_record(&[60, 70, 80, 90])?;
            page.insert_record(&[])?;
            rid2
        };
        {
            let mut page = HeapPageMut::from(&mut frame);
            page.delete_record(&rid2)?;
        }

        let page = HeapPageRef::from(&frame);
        let collected = page
            .records()
            .map(|item| item.map(|(rid, record)| (rid, record.data().to_vec())))
            .collect::<Result<Vec<_>>>()?;

        assert_eq!(
            collected,
            vec![
                (RecordId::new(3, 0), vec![10, 20, 30]),
                (RecordId::new(3, 2), vec![60, 70, 80, 90]),
                (RecordId::new(3, 3), vec![]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_record_iterator_empty_page() {
        let mut frame = PageFrame::new();
        HeapPageMut::from(&mut frame).init(1);

        let page = HeapPageRef::from(&frame);
        assert_eq!(page.records().count(), 0);
    }
}
