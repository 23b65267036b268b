use crate::rid::{Rid, SlotNum};
use binary_helpers::bin_error::BinaryError;
use pool::api::PageNum;
use pool::error::PoolError;
use thiserror::Error;

/// Errors surfaced by the record layer.
///
/// Buffer-pool failures pass through as [`RecordError::Pool`] so that
/// callers can still match the pool's own error kinds (a sequential scan,
/// for instance, distinguishes `InvalidPageNum` from real failures).
#[derive(Debug, Error)]
pub enum RecordError {
    /// A stateful handle was opened a second time.
    #[error("handle is already open")]
    AlreadyOpen,

    /// A handle was used after it was closed (or after its page was
    /// disposed).
    #[error("handle has been closed")]
    Closed,

    /// An insert hit a page whose record count equals its capacity.
    #[error("page {page_num} is at record capacity")]
    PageFull { page_num: PageNum },

    /// A slot index outside `[0, capacity)` was passed to update or delete.
    #[error("slot {slot_num} is out of range for a page with capacity {capacity}")]
    SlotOutOfRange { slot_num: SlotNum, capacity: i32 },

    /// A rid whose slot lies outside `[0, capacity)` was passed to a read.
    #[error("invalid rid {rid}: slot out of range for a page with capacity {capacity}")]
    InvalidRid { rid: Rid, capacity: i32 },

    /// The addressed slot holds no record.
    #[error("no record exists at {rid}")]
    RecordNotExist { rid: Rid },

    /// A non-positive record size was requested.
    #[error("record size {size} is invalid")]
    InvalidRecordSize { size: i32 },

    /// The requested record size exceeds what the store can place, either
    /// per page or across a two-page chain.
    #[error("record of {size} bytes exceeds the maximum of {max}")]
    RecordTooLarge { size: i32, max: i32 },

    /// Page iteration ran past the last live slot.
    #[error("no further records on this page")]
    EndOfPage,

    /// A scan ran past the last live record of the file.
    #[error("no further records in this file")]
    EndOfFile,

    /// A buffer-pool error, passed through with its identity intact.
    #[error("buffer pool error")]
    Pool(#[from] PoolError),

    /// The page header bytes could not be decoded.
    #[error("error decoding page header")]
    Header(#[from] BinaryError),
}

/// Result type of record operations.
pub type RecordResult<T> = Result<T, RecordError>;
