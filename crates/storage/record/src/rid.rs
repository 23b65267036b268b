use pool::api::PageNum;
use std::fmt;

/// Slot index within a page. Signed so that iteration cursors can sit
/// "before slot 0" at `-1`.
pub type SlotNum = i32;

/// A record identifier: the page number and slot index naming one record.
/// Stable for the life of the record; live records always have
/// `page_num >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rid {
    /// The page holding the record.
    pub page_num: PageNum,

    /// The slot within that page.
    pub slot_num: SlotNum,
}

impl Rid {
    /// Creates a new `Rid` from a page number and slot index.
    pub fn new(page_num: PageNum, slot_num: SlotNum) -> Self {
        Self { page_num, slot_num }
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page_num, self.slot_num)
    }
}
