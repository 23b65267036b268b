//! Oversized records: a logical record split across exactly two pages.
//!
//! The head page is allocated and written first, then the tail; the head's
//! `next_page_num` is linked only once the tail's half is in place. The
//! returned rid names the head, because deletion starts there (it is the
//! page carrying the `has_next` flag).

use crate::errors::record_error::{RecordError, RecordResult};
use crate::file_handle::FileHandle;
use crate::page_slot::PageSlot;
use crate::rid::Rid;
use pool::api::{BufferPool, PageNum};
use tracing::{error, trace, warn};

impl<'p, P: BufferPool> FileHandle<'p, P> {
    /// Splits `data` into two `chain_half`-byte halves on two fresh pages.
    pub(super) fn insert_chained(&mut self, data: &[u8], record_size: i32) -> RecordResult<Rid> {
        let pool = self.pool()?;
        let half = self.policy.chain_half;
        if record_size > self.policy.max_record_size() {
            return Err(RecordError::RecordTooLarge {
                size: record_size,
                max: self.policy.max_record_size(),
            });
        }

        // Head page first: linear scans must meet the head before the tail,
        // and page numbers only grow within one insert.
        let head_frame = pool.allocate_page(self.file_id)?;
        let head_page = head_frame.page_num();
        self.cached = None;
        let mut head = PageSlot::init_empty(pool, self.file_id, head_page, half)?;
        drop(head_frame);

        let head_len = data.len().min(half as usize);
        let rid = head.insert(&data[..head_len])?;

        // From here on the head half is live; a failing tail must not leave
        // a dangling chain behind.
        let tail_page = match self.write_tail_half(data, head_len) {
            Ok(tail_page) => tail_page,
            Err(e) => {
                warn!(head_page, "tail half failed, rolling back chain head");
                if let Err(rollback) = head.delete(rid) {
                    error!(head_page, %rollback, "chain head rollback failed");
                }
                return Err(e);
            }
        };

        head.link_tail(tail_page)?;
        self.cached = Some(head);

        trace!(head_page, tail_page, record_size, "inserted chained record");
        Ok(rid)
    }

    /// Allocates the tail page and writes the second half of `data` into its
    /// slot 0. Returns the tail's page number.
    fn write_tail_half(&mut self, data: &[u8], head_len: usize) -> RecordResult<PageNum> {
        let pool = self.pool()?;
        let half = self.policy.chain_half;

        let tail_frame = pool.allocate_page(self.file_id)?;
        let tail_page = tail_frame.page_num();
        let mut tail = PageSlot::init_empty(pool, self.file_id, tail_page, half)?;
        drop(tail_frame);

        let rest = &data[head_len..];
        let tail_len = rest.len().min(half as usize);
        tail.insert(&rest[..tail_len])?;

        Ok(tail_page)
    }

    /// Deletes both halves of the chain headed at `head_rid.page_num`. The
    /// tail page number is read before the head's record goes away, because
    /// deleting the head's only record disposes the head page.
    pub(super) fn delete_chained(&mut self, head_rid: Rid) -> RecordResult<()> {
        let pool = self.pool()?;

        let mut head = PageSlot::open(pool, self.file_id, head_rid.page_num)?;
        let tail_page = head.next_page_num()?;
        head.delete(head_rid)?;

        self.drop_cached_pin(tail_page);
        let mut tail = PageSlot::open(pool, self.file_id, tail_page)?;
        tail.delete(Rid::new(tail_page, 0))?;

        trace!(head_page = head_rid.page_num, tail_page, "deleted chained record");
        Ok(())
    }
}
