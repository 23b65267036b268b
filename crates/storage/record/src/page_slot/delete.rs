use crate::bitmap::{BitmapMut, BitmapRef};
use crate::errors::record_error::{RecordError, RecordResult};
use crate::page_slot::PageSlot;
use crate::rid::Rid;
use pool::api::BufferPool;
use tracing::trace;

impl<'p, P: BufferPool> PageSlot<'p, P> {
    /// Removes the record at `rid`: clears its bitmap bit and decrements the
    /// record count. The slot's bytes are left as-is and become undefined
    /// until the next insert reuses them.
    ///
    /// Deleting the last record returns the page to the buffer pool for
    /// disposal; the slot is closed afterwards and must be replaced before
    /// further use. Only then are the chain flags reset, so a head page
    /// keeps its tail link while it still carries its record.
    pub fn delete(&mut self, rid: Rid) -> RecordResult<()> {
        let frame = self.pinned()?;
        let page_num = frame.page_num();

        let remaining;
        {
            let mut data = frame.data_mut();
            let geometry = super::read_geometry(&data)?;
            if rid.slot_num < 0 || rid.slot_num >= geometry.capacity {
                return Err(RecordError::SlotOutOfRange {
                    slot_num: rid.slot_num,
                    capacity: geometry.capacity,
                });
            }

            {
                let range = super::bitmap_range(geometry.capacity);
                let mut bitmap = BitmapMut::new(&mut data[range], geometry.capacity);
                if !bitmap.get(rid.slot_num) {
                    return Err(RecordError::RecordNotExist { rid });
                }
                bitmap.clear(rid.slot_num);
            }

            remaining = geometry.record_num - 1;
            debug_assert_eq!(
                BitmapRef::new(
                    &data[super::bitmap_range(geometry.capacity)],
                    geometry.capacity
                )
                .count_ones(),
                remaining
            );
            let mut header = super::header_mut(&mut data)?;
            header.set_record_num(remaining)?;
            if remaining == 0 {
                // The page leaves its chain (if any) together with its last
                // record.
                header.set_has_next(0)?;
                header.set_next_page_num(-1)?;
            }
        }
        frame.mark_dirty();

        if remaining == 0 {
            trace!(page_num, "page emptied, disposing");
            // Drop our own pin first; the pool refuses to dispose a pinned
            // page.
            self.frame = None;
            self.pool.dispose_page(self.file_id, page_num)?;
        } else {
            trace!(page_num, slot_num = rid.slot_num, "deleted record");
        }
        Ok(())
    }
}
