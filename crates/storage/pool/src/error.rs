use crate::api::{FileId, PageNum};
use thiserror::Error;

/// Errors returned by a buffer pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The file id is not known to the pool.
    #[error("file {file_id} is not open in the buffer pool")]
    UnknownFile { file_id: FileId },

    /// The page number lies within the file's numbering range but the page is
    /// not materialized — typically because it was disposed. Callers that
    /// walk pages in order treat this as "skip", not as a failure.
    #[error("page {file_id}:{page_num} is not materialized")]
    InvalidPageNum { file_id: FileId, page_num: PageNum },

    /// A dispose was refused because pins on the page are still outstanding.
    #[error("page {file_id}:{page_num} is still pinned")]
    PagePinned { file_id: FileId, page_num: PageNum },
}

/// Result type of buffer pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
