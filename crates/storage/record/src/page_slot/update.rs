use crate::bitmap::BitmapRef;
use crate::errors::record_error::{RecordError, RecordResult};
use crate::page_slot::PageSlot;
use crate::record::Record;
use pool::api::BufferPool;
use tracing::trace;

impl<'p, P: BufferPool> PageSlot<'p, P> {
    /// Overwrites the record at `rec.rid` with `rec.data`, truncated or
    /// zero-padded to `record_real_size`.
    ///
    /// Fails with `SlotOutOfRange` for slot indices outside the page's
    /// capacity and `RecordNotExist` for vacant slots.
    pub fn update(&mut self, rec: &Record) -> RecordResult<()> {
        let frame = self.pinned()?;
        {
            let mut data = frame.data_mut();
            let geometry = super::read_geometry(&data)?;
            if rec.rid.slot_num < 0 || rec.rid.slot_num >= geometry.capacity {
                return Err(RecordError::SlotOutOfRange {
                    slot_num: rec.rid.slot_num,
                    capacity: geometry.capacity,
                });
            }

            let occupied = BitmapRef::new(
                &data[super::bitmap_range(geometry.capacity)],
                geometry.capacity,
            )
            .get(rec.rid.slot_num);
            if !occupied {
                return Err(RecordError::RecordNotExist { rid: rec.rid });
            }

            let slot = &mut data[super::slot_range(&geometry, rec.rid.slot_num)];
            let copied = rec.data.len().min(slot.len());
            slot[..copied].copy_from_slice(&rec.data[..copied]);
            slot[copied..].fill(0);
        }
        frame.mark_dirty();

        trace!(page_num = rec.rid.page_num, slot_num = rec.rid.slot_num, "updated record");
        Ok(())
    }
}
