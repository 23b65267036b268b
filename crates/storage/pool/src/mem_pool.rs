use crate::api::{BufferPool, FileId, PageNum};
use crate::error::{PoolError, PoolResult};
use crate::frame::{Frame, FrameHandle};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Page size handed out by [`MemPool`] unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 8192;

#[derive(Debug, Default)]
struct FileState {
    frames: HashMap<PageNum, Rc<Frame>>,
    /// Disposed page numbers, reusable by later allocations (smallest
    /// first). They stay inside `page_count`'s numbering range.
    free: BTreeSet<PageNum>,
    /// High-water mark of allocated page numbers, reserved page 0 included.
    page_count: PageNum,
}

/// An in-memory buffer pool.
///
/// Every file starts with the reserved page 0 materialized; data pages are
/// allocated from 1 upward, reusing disposed numbers first. Disposed pages
/// remain inside the numbering range and answer
/// [`PoolError::InvalidPageNum`], which is exactly the contract sequential
/// scans rely on to skip holes.
#[derive(Debug)]
pub struct MemPool {
    page_size: usize,
    files: RefCell<HashMap<FileId, FileState>>,
    next_file_id: Cell<FileId>,
}

impl Default for MemPool {
    fn default() -> Self {
        Self::new()
    }
}

impl MemPool {
    /// Creates a pool with [`DEFAULT_PAGE_SIZE`] pages.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates a pool handing out pages of `page_size` bytes.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            files: RefCell::new(HashMap::new()),
            next_file_id: Cell::new(0),
        }
    }

    /// The page size of every frame in this pool.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Registers a new file and materializes its reserved page 0.
    pub fn create_file(&self) -> FileId {
        let file_id = self.next_file_id.get();
        self.next_file_id.set(file_id + 1);

        let mut frames = HashMap::new();
        frames.insert(0, Frame::new(0, self.page_size));
        let state = FileState {
            frames,
            free: BTreeSet::new(),
            page_count: 1,
        };

        self.files.borrow_mut().insert(file_id, state);
        file_id
    }

    /// Current number of pins on a page. Lets tests assert that no frame
    /// leaked a pin.
    pub fn pin_count(&self, file_id: FileId, page_num: PageNum) -> PoolResult<u32> {
        let files = self.files.borrow();
        let state = files
            .get(&file_id)
            .ok_or(PoolError::UnknownFile { file_id })?;
        let frame = state
            .frames
            .get(&page_num)
            .ok_or(PoolError::InvalidPageNum { file_id, page_num })?;
        Ok(frame.pin_count())
    }
}

impl BufferPool for MemPool {
    fn get_this_page(&self, file_id: FileId, page_num: PageNum) -> PoolResult<FrameHandle> {
        let files = self.files.borrow();
        let state = files
            .get(&file_id)
            .ok_or(PoolError::UnknownFile { file_id })?;
        let frame = state
            .frames
            .get(&page_num)
            .ok_or(PoolError::InvalidPageNum { file_id, page_num })?;
        Ok(FrameHandle::new(frame.clone()))
    }

    fn allocate_page(&self, file_id: FileId) -> PoolResult<FrameHandle> {
        let mut files = self.files.borrow_mut();
        let state = files
            .get_mut(&file_id)
            .ok_or(PoolError::UnknownFile { file_id })?;

        let page_num = match state.free.pop_first() {
            Some(reused) => reused,
            None => {
                let fresh = state.page_count;
                state.page_count += 1;
                fresh
            }
        };

        let frame = Frame::new(page_num, self.page_size);
        state.frames.insert(page_num, frame.clone());
        Ok(FrameHandle::new(frame))
    }

    fn dispose_page(&self, file_id: FileId, page_num: PageNum) -> PoolResult<()> {
        let mut files = self.files.borrow_mut();
        let state = files
            .get_mut(&file_id)
            .ok_or(PoolError::UnknownFile { file_id })?;

        let frame = state
            .frames
            .get(&page_num)
            .ok_or(PoolError::InvalidPageNum { file_id, page_num })?;
        if frame.pin_count() > 0 {
            return Err(PoolError::PagePinned { file_id, page_num });
        }

        state.frames.remove(&page_num);
        state.free.insert(page_num);
        Ok(())
    }

    fn page_count(&self, file_id: FileId) -> PoolResult<PageNum> {
        let files = self.files.borrow();
        let state = files
            .get(&file_id)
            .ok_or(PoolError::UnknownFile { file_id })?;
        Ok(state.page_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_file_has_only_the_reserved_page() {
        let pool = MemPool::new();
        let fid = pool.create_file();

        assert_eq!(pool.page_count(fid).unwrap(), 1);
        assert!(pool.get_this_page(fid, 0).is_ok());
        assert!(matches!(
            pool.get_this_page(fid, 1),
            Err(PoolError::InvalidPageNum { page_num: 1, .. })
        ));
    }

    #[test]
    fn unknown_file_is_rejected() {
        let pool = MemPool::new();
        assert!(matches!(
            pool.page_count(42),
            Err(PoolError::UnknownFile { file_id: 42 })
        ));
        assert!(matches!(
            pool.allocate_page(42),
            Err(PoolError::UnknownFile { file_id: 42 })
        ));
    }

    #[test]
    fn allocation_numbers_pages_from_one() {
        let pool = MemPool::new();
        let fid = pool.create_file();

        let first = pool.allocate_page(fid).unwrap();
        let second = pool.allocate_page(fid).unwrap();

        assert_eq!(first.page_num(), 1);
        assert_eq!(second.page_num(), 2);
        assert_eq!(pool.page_count(fid).unwrap(), 3);
        assert_eq!(first.data().len(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn dispose_refused_while_pinned() {
        let pool = MemPool::new();
        let fid = pool.create_file();

        let handle = pool.allocate_page(fid).unwrap();
        assert!(matches!(
            pool.dispose_page(fid, 1),
            Err(PoolError::PagePinned { page_num: 1, .. })
        ));

        drop(handle);
        pool.dispose_page(fid, 1).unwrap();
    }

    #[test]
    fn disposed_page_stays_in_range_but_unreadable() {
        let pool = MemPool::new();
        let fid = pool.create_file();

        drop(pool.allocate_page(fid).unwrap());
        drop(pool.allocate_page(fid).unwrap());
        pool.dispose_page(fid, 1).unwrap();

        // The numbering range keeps the hole.
        assert_eq!(pool.page_count(fid).unwrap(), 3);
        assert!(matches!(
            pool.get_this_page(fid, 1),
            Err(PoolError::InvalidPageNum { page_num: 1, .. })
        ));
        assert!(pool.get_this_page(fid, 2).is_ok());
    }

    #[test]
    fn allocation_reuses_the_smallest_disposed_page() {
        let pool = MemPool::new();
        let fid = pool.create_file();

        for _ in 0..3 {
            drop(pool.allocate_page(fid).unwrap());
        }
        pool.dispose_page(fid, 3).unwrap();
        pool.dispose_page(fid, 1).unwrap();

        assert_eq!(pool.allocate_page(fid).unwrap().page_num(), 1);
        assert_eq!(pool.allocate_page(fid).unwrap().page_num(), 3);
        assert_eq!(pool.allocate_page(fid).unwrap().page_num(), 4);
    }

    #[test]
    fn reused_page_comes_back_zeroed() {
        let pool = MemPool::new();
        let fid = pool.create_file();

        {
            let handle = pool.allocate_page(fid).unwrap();
            handle.data_mut().fill(0xEE);
        }
        pool.dispose_page(fid, 1).unwrap();

        let fresh = pool.allocate_page(fid).unwrap();
        assert_eq!(fresh.page_num(), 1);
        assert!(fresh.data().iter().all(|b| *b == 0));
    }

    #[test]
    fn pin_count_tracks_outstanding_handles() {
        let pool = MemPool::new();
        let fid = pool.create_file();

        let first = pool.allocate_page(fid).unwrap();
        let second = pool.get_this_page(fid, 1).unwrap();
        assert_eq!(pool.pin_count(fid, 1).unwrap(), 2);

        drop(first);
        assert_eq!(pool.pin_count(fid, 1).unwrap(), 1);
        drop(second);
        assert_eq!(pool.pin_count(fid, 1).unwrap(), 0);
    }
}
