use crate::bitmap::BitmapMut;
use crate::errors::record_error::{RecordError, RecordResult};
use crate::page_slot::PageSlot;
use crate::rid::Rid;
use pool::api::BufferPool;
use tracing::trace;

impl<'p, P: BufferPool> PageSlot<'p, P> {
    /// Places `payload` in the lowest free slot of the page and returns its
    /// rid.
    ///
    /// Exactly `record_real_size` bytes are written: a longer payload is
    /// truncated, a shorter one zero-padded. Fails with `PageFull` when the
    /// page is at capacity.
    pub fn insert(&mut self, payload: &[u8]) -> RecordResult<Rid> {
        let frame = self.pinned()?;
        let page_num = frame.page_num();

        let slot_num;
        {
            let mut data = frame.data_mut();
            let geometry = super::read_geometry(&data)?;
            if geometry.record_num >= geometry.capacity {
                return Err(RecordError::PageFull { page_num });
            }

            let range = super::bitmap_range(geometry.capacity);
            slot_num = {
                let mut bitmap = BitmapMut::new(&mut data[range], geometry.capacity);
                let Some(free) = bitmap.next_unset_from(0) else {
                    // record_num and the bitmap disagree; refuse rather than
                    // overwrite a live slot.
                    return Err(RecordError::PageFull { page_num });
                };
                bitmap.set(free);
                free
            };

            {
                let mut header = super::header_mut(&mut data)?;
                header.set_record_num(geometry.record_num + 1)?;
            }

            let slot = &mut data[super::slot_range(&geometry, slot_num)];
            let copied = payload.len().min(slot.len());
            slot[..copied].copy_from_slice(&payload[..copied]);
            slot[copied..].fill(0);
        }
        frame.mark_dirty();

        trace!(page_num, slot_num, "inserted record");
        Ok(Rid::new(page_num, slot_num))
    }
}
