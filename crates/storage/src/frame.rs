use bytes::{Bytes, BytesMut};
use heapdb_error::errinput;

use crate::page::PAGE_SIZE;
use crate::Result;

/// A single page buffer as supplied by the buffer manager. Pinning, eviction
/// and I/O stay with the buffer manager; the frame only remembers whether it
/// has been handed out for writing since it was last flushed.
pub struct PageFrame {
    is_dirty: bool,
    data: Box<PageBuf>,
}

/// Page bytes, aligned so page headers can be cast in place.
#[repr(C, align(8))]
struct PageBuf([u8; PAGE_SIZE]);

impl PageFrame {
    /// Creates a zeroed, clean frame.
    pub fn new() -> Self {
        Self {
            is_dirty: false,
            data: Box::new(PageBuf([0; PAGE_SIZE])),
        }
    }

    /// Loads a page image read by the buffer manager. The frame starts clean.
    pub fn from_bytes(image: &[u8]) -> Result<Self> {
        if image.len() != PAGE_SIZE {
            return errinput!("page image must be {} bytes, got {}", PAGE_SIZE, image.len());
        }
        let mut frame = Self::new();
        frame.data.0.copy_from_slice(image);
        Ok(frame)
    }

    /// Copies the page image out for write-back.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(PAGE_SIZE);
        buf.extend_from_slice(&self.data.0);
        buf.freeze()
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Called by the buffer manager once the image has been written back.
    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data.0
    }

    /// Mutable access to data. Any mutable access dirties the frame.
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.is_dirty = true;
        &mut self.data.0
    }

    pub fn reset(&mut self) {
        self.is_dirty = false;
        self.data.0.fill(0);
    }
}

impl Default for PageFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<PageFrame> for PageFrame {
    fn as_ref(&self) -> &PageFrame {
        self
    }
}

impl AsMut<PageFrame> for PageFrame {
    fn as_mut(&mut self) -> &mut PageFrame {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapdb_error::Error;

    #[test]
    fn test_new_frame_is_clean_and_zeroed() {
        let frame = PageFrame::new();
        assert!(!frame.is_dirty());
        assert_eq!(frame.data().len(), PAGE_SIZE);
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_mutable_access_dirties_frame() {
        let mut frame = PageFrame::new();
        frame.data_mut()[10] = 7;
        assert!(frame.is_dirty());

        frame.mark_clean();
        assert!(!frame.is_dirty());
        assert_eq!(frame.data()[10], 7);

        frame.data_mut()[10] = 8;
        frame.reset();
        assert!(!frame.is_dirty());
        assert_eq!(frame.data()[10], 0);
    }

    #[test]
    fn test_image_round_trip() -> Result<()> {
        let mut frame = PageFrame::new();
        frame.data_mut()[..4].copy_from_slice(b"page");
        frame.data_mut()[PAGE_SIZE - 1] = 0xAB;

        let image = frame.to_bytes();
        let loaded = PageFrame::from_bytes(&image)?;
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.data(), frame.data());
        Ok(())
    }

    #[test]
    fn test_from_bytes_rejects_wrong_size() {
        let result = PageFrame::from_bytes(&[0u8; 12]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
