//! File-level record operations.
//!
//! A `FileHandle` routes inserts, updates, deletes and point lookups to the
//! right page of one open file. It keeps a cached [`PageSlot`] as the hint
//! for the next insert, so consecutive inserts land on the same page without
//! re-probing from the start of the file.

mod chain;

use crate::config::ChainPolicy;
use crate::errors::record_error::{RecordError, RecordResult};
use crate::page_slot::PageSlot;
use crate::record::Record;
use crate::rid::Rid;
use pool::api::{BufferPool, FileId, PageNum};
use pool::error::PoolError;
use tracing::trace;

/// Record operations on one open file.
#[derive(Debug)]
pub struct FileHandle<'p, P: BufferPool> {
    pool: Option<&'p P>,
    file_id: FileId,
    policy: ChainPolicy,
    cached: Option<PageSlot<'p, P>>,
}

impl<'p, P: BufferPool> Default for FileHandle<'p, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p, P: BufferPool> FileHandle<'p, P> {
    /// Creates a closed handle with the default [`ChainPolicy`].
    pub fn new() -> Self {
        Self::with_policy(ChainPolicy::default())
    }

    /// Creates a closed handle with the given chain thresholds.
    pub fn with_policy(policy: ChainPolicy) -> Self {
        Self {
            pool: None,
            file_id: 0,
            policy,
            cached: None,
        }
    }

    /// Binds the handle to `file_id` on `pool`. Fails with `AlreadyOpen` if
    /// the handle is already bound.
    pub fn open(&mut self, pool: &'p P, file_id: FileId) -> RecordResult<()> {
        if self.pool.is_some() {
            return Err(RecordError::AlreadyOpen);
        }
        self.pool = Some(pool);
        self.file_id = file_id;
        trace!(file_id, "opened record file");
        Ok(())
    }

    /// Releases the cached page and unbinds the handle. Idempotent.
    pub fn close(&mut self) {
        self.cached = None;
        self.pool = None;
    }

    /// Inserts a record of `record_size` logical bytes and returns its rid.
    ///
    /// Records up to the policy's `small_limit` take the single-page path: a
    /// circular probe over existing pages (starting from the cached page)
    /// looks for room, and a fresh page is allocated when none has any.
    /// Larger records are split across a two-page chain; the returned rid
    /// names the chain's head.
    pub fn insert(&mut self, data: &[u8], record_size: i32) -> RecordResult<Rid> {
        if record_size <= 0 {
            return Err(RecordError::InvalidRecordSize { size: record_size });
        }
        if record_size > self.policy.small_limit {
            return self.insert_chained(data, record_size);
        }

        let pool = self.pool()?;
        let page_count = pool.page_count(self.file_id)?;

        // Pick the probe origin: the cached page if the hint is alive,
        // otherwise the first data page.
        let start = match self.cached.as_ref().and_then(|slot| slot.page_num()) {
            Some(page_num) => page_num,
            None if page_count >= 2 => match PageSlot::open(pool, self.file_id, 1) {
                Ok(slot) => {
                    self.cached = Some(slot);
                    1
                }
                // Page 1 may have been disposed; the probe below skips it.
                Err(RecordError::Pool(PoolError::InvalidPageNum { .. })) => 1,
                Err(e) => return Err(e),
            },
            None => 0,
        };

        let mut found = false;
        for offset in 0..page_count {
            let page_num = (start + offset) % page_count;
            if page_num == 0 {
                // Reserved for the pool's file metadata.
                continue;
            }

            if self.cached.as_ref().and_then(|slot| slot.page_num()) != Some(page_num) {
                self.cached = None;
                match PageSlot::open(pool, self.file_id, page_num) {
                    Ok(slot) => self.cached = Some(slot),
                    Err(RecordError::Pool(PoolError::InvalidPageNum { .. })) => {
                        // A disposed page; keep probing.
                        trace!(page_num, "probe skipped unmaterialized page");
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            let Some(slot) = self.cached.as_ref() else {
                continue;
            };
            // Only pages formatted for this record size are candidates, and
            // chain heads are never polluted with unrelated records.
            if slot.record_real_size()? != record_size || slot.has_next()? {
                continue;
            }
            if !slot.is_full()? {
                found = true;
                break;
            }
        }

        if !found {
            let frame = pool.allocate_page(self.file_id)?;
            let page_num = frame.page_num();
            self.cached = None;
            // The slot takes its own pin on the new page; the allocator's
            // pin is released right after.
            let slot = PageSlot::init_empty(pool, self.file_id, page_num, record_size)?;
            drop(frame);
            self.cached = Some(slot);
            trace!(page_num, record_size, "allocated fresh record page");
        }

        let slot = self.cached.as_mut().ok_or(RecordError::Closed)?;
        slot.insert(data)
    }

    /// Overwrites the record named by `rec.rid` with `rec.data`.
    pub fn update(&mut self, rec: &Record) -> RecordResult<()> {
        let pool = self.pool()?;
        let mut slot = PageSlot::open(pool, self.file_id, rec.rid.page_num)?;
        slot.update(rec)
    }

    /// Deletes the record at `rid`. For the head of a two-page chain this
    /// removes both halves; either page is disposed once it holds no further
    /// records.
    pub fn delete(&mut self, rid: Rid) -> RecordResult<()> {
        let pool = self.pool()?;
        // The insert hint may pin the target page; a pinned page cannot be
        // disposed.
        self.drop_cached_pin(rid.page_num);

        let mut slot = PageSlot::open(pool, self.file_id, rid.page_num)?;
        if slot.has_next()? {
            slot.close();
            return self.delete_chained(rid);
        }
        slot.delete(rid)
    }

    /// Reads the record at `rid` into an owned [`Record`].
    ///
    /// For the head of a chain this returns the head half only; scans are
    /// the assembling read path.
    pub fn get(&self, rid: Rid) -> RecordResult<Record> {
        let pool = self.pool()?;
        let slot = PageSlot::open(pool, self.file_id, rid.page_num)?;
        let data = slot.record(rid)?.to_vec();
        Ok(Record::new(rid, data))
    }

    /// The chain thresholds this handle applies.
    pub fn policy(&self) -> &ChainPolicy {
        &self.policy
    }

    fn pool(&self) -> RecordResult<&'p P> {
        self.pool.ok_or(RecordError::Closed)
    }

    /// Drops the cached insert hint if it pins `page_num`.
    fn drop_cached_pin(&mut self, page_num: PageNum) {
        if self.cached.as_ref().and_then(|slot| slot.page_num()) == Some(page_num) {
            self.cached = None;
        }
    }
}
