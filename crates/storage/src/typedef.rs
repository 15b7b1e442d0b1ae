/// Identifier of a page, issued by the page-identifier service outside this crate.
pub type PageId = u32;

/// Index into a heap page's slot directory.
pub type SlotId = u16;
