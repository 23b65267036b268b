//! Public API for the `pool` crate.

use crate::error::PoolResult;
use crate::frame::FrameHandle;

/// Identifier of an open paged file within the pool.
pub type FileId = u32;

/// Page number within a file. Page 0 is reserved for the pool's own file
/// metadata; data pages start at 1. Signed so that header fields can carry
/// the `-1` "no page" sentinel.
pub type PageNum = i32;

/// Buffer pool public API.
///
/// A `BufferPool` manages the fixed-size pages of a set of open files and
/// hands out pinned frames. A [`FrameHandle`] keeps its page resident for as
/// long as it lives; dropping the handle releases the pin. Implementations
/// choose the backing storage; the record layer is written purely against
/// this trait.
pub trait BufferPool {
    /// Pin an existing page of `file_id` and return a handle to its frame.
    ///
    /// Returns [`PoolError::InvalidPageNum`](crate::error::PoolError) when
    /// the page lies in the numbering range but is not materialized (for
    /// example after a dispose).
    fn get_this_page(&self, file_id: FileId, page_num: PageNum) -> PoolResult<FrameHandle>;

    /// Allocate a fresh zeroed page for `file_id`, pin it, and return the
    /// handle. The page number is available through
    /// [`FrameHandle::page_num`]; disposed page numbers may be reused.
    fn allocate_page(&self, file_id: FileId) -> PoolResult<FrameHandle>;

    /// Remove a page from the file. The page number stays within the file's
    /// numbering range and later reads of it report
    /// [`PoolError::InvalidPageNum`](crate::error::PoolError). Refused with
    /// [`PoolError::PagePinned`](crate::error::PoolError) while any pin on
    /// the page is outstanding.
    fn dispose_page(&self, file_id: FileId, page_num: PageNum) -> PoolResult<()>;

    /// Number of pages in the file's numbering range, the reserved page 0
    /// included. Disposed pages still count: the value is a high-water mark,
    /// not a count of live pages.
    fn page_count(&self, file_id: FileId) -> PoolResult<PageNum>;
}
