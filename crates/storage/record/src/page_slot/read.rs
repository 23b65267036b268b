use crate::bitmap::BitmapRef;
use crate::errors::record_error::{RecordError, RecordResult};
use crate::page_slot::PageSlot;
use crate::rid::{Rid, SlotNum};
use pool::api::BufferPool;
use std::cell::Ref;

impl<'p, P: BufferPool> PageSlot<'p, P> {
    /// Returns the `record_real_size` bytes of the record at `rid`, borrowed
    /// from the pinned page. The borrow keeps the slot (and thus the pin)
    /// alive.
    ///
    /// Fails with `InvalidRid` for slot indices outside the page's capacity
    /// and `RecordNotExist` for vacant slots.
    pub fn record(&self, rid: Rid) -> RecordResult<Ref<'_, [u8]>> {
        let frame = self.pinned()?;
        let data = frame.data();

        let geometry = super::read_geometry(&data)?;
        if rid.slot_num < 0 || rid.slot_num >= geometry.capacity {
            return Err(RecordError::InvalidRid {
                rid,
                capacity: geometry.capacity,
            });
        }

        let occupied = BitmapRef::new(
            &data[super::bitmap_range(geometry.capacity)],
            geometry.capacity,
        )
        .get(rid.slot_num);
        if !occupied {
            return Err(RecordError::RecordNotExist { rid });
        }

        let range = super::slot_range(&geometry, rid.slot_num);
        Ok(Ref::map(data, |page| &page[range.start..range.end]))
    }

    /// Returns the lowest live slot strictly after `after`, with its bytes.
    /// `EndOfPage` when no further slot is set.
    pub fn next_record(&self, after: SlotNum) -> RecordResult<(Rid, Ref<'_, [u8]>)> {
        let frame = self.pinned()?;
        let page_num = frame.page_num();
        let data = frame.data();

        let geometry = super::read_geometry(&data)?;
        if after >= geometry.capacity - 1 {
            return Err(RecordError::EndOfPage);
        }

        let next = BitmapRef::new(
            &data[super::bitmap_range(geometry.capacity)],
            geometry.capacity,
        )
        .next_set_from(after + 1);
        let Some(slot_num) = next else {
            return Err(RecordError::EndOfPage);
        };

        let range = super::slot_range(&geometry, slot_num);
        Ok((
            Rid::new(page_num, slot_num),
            Ref::map(data, |page| &page[range.start..range.end]),
        ))
    }

    /// The first live record of the page, i.e. [`next_record`](Self::next_record)
    /// from before slot 0.
    pub fn first_record(&self) -> RecordResult<(Rid, Ref<'_, [u8]>)> {
        self.next_record(-1)
    }
}
