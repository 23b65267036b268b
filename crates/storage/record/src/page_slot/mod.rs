//! A `PageSlot` owns one pinned page and interprets its bytes as a record
//! page: fixed header, slot bitmap, then fixed-width record slots.
//!
//! The pin is an owned [`FrameHandle`]; dropping the slot (or calling
//! [`PageSlot::close`]) releases it. All byte access goes through the
//! handle's `Ref`/`RefMut` views, so no pointer into the page can outlive
//! the pin.

mod delete;
mod insert;
mod read;
mod update;

use crate::errors::record_error::{RecordError, RecordResult};
use crate::header::{HeaderMut, HeaderRef, HEADER_SIZE};
use crate::layout;
use crate::rid::SlotNum;
use binary_helpers::bin_error::BinaryError;
use pool::api::{BufferPool, FileId, PageNum};
use pool::frame::FrameHandle;
use std::ops::Range;

/// One pinned record page.
///
/// A slot is created over an existing page with [`open`](Self::open) or over
/// a freshly allocated page with [`init_empty`](Self::init_empty). A slot
/// whose page was disposed (see [`delete`](Self::delete)) or that was closed
/// answers every operation with [`RecordError::Closed`] until replaced.
#[derive(Debug)]
pub struct PageSlot<'p, P: BufferPool> {
    pool: &'p P,
    file_id: FileId,
    frame: Option<FrameHandle>,
}

impl<'p, P: BufferPool> PageSlot<'p, P> {
    /// Pins an existing page of `file_id` and wraps it. Pool errors (notably
    /// `InvalidPageNum` for disposed pages) pass through verbatim.
    pub fn open(pool: &'p P, file_id: FileId, page_num: PageNum) -> RecordResult<Self> {
        let frame = pool.get_this_page(file_id, page_num)?;
        Ok(Self {
            pool,
            file_id,
            frame: Some(frame),
        })
    }

    /// Pins `page_num` and formats it as an empty record page for records of
    /// `record_real_size` logical bytes: writes the header, derives the
    /// physical slot width and capacity, zeroes the bitmap and clears the
    /// chain link.
    ///
    /// Fails with `InvalidRecordSize` for non-positive sizes and
    /// `RecordTooLarge` when not even one record of this size fits on a
    /// page.
    pub fn init_empty(
        pool: &'p P,
        file_id: FileId,
        page_num: PageNum,
        record_real_size: i32,
    ) -> RecordResult<Self> {
        if record_real_size <= 0 {
            return Err(RecordError::InvalidRecordSize {
                size: record_real_size,
            });
        }

        let slot = Self::open(pool, file_id, page_num)?;
        let frame = slot.pinned()?;
        {
            let mut data = frame.data_mut();
            let page_size = data.len();

            let slot_size = layout::align8(record_real_size);
            let capacity = layout::record_capacity(page_size, slot_size);
            if capacity < 1 {
                // Not even one slot plus its bitmap bit fits.
                return Err(RecordError::RecordTooLarge {
                    size: record_real_size,
                    max: page_size.saturating_sub(HEADER_SIZE + 2) as i32,
                });
            }

            {
                let mut header = header_mut(&mut data)?;
                header.set_record_num(0)?;
                header.set_record_capacity(capacity)?;
                header.set_record_real_size(record_real_size)?;
                header.set_record_size(slot_size)?;
                header.set_first_record_offset(layout::first_record_offset(capacity))?;
                header.set_has_next(0)?;
                header.set_next_page_num(-1)?;
            }
            data[bitmap_range(capacity)].fill(0);
        }
        frame.mark_dirty();

        Ok(slot)
    }

    /// Releases the pin. Idempotent; the slot answers `Closed` afterwards.
    pub fn close(&mut self) {
        self.frame = None;
    }

    /// The page this slot is holding, or `None` after close/dispose.
    pub fn page_num(&self) -> Option<PageNum> {
        self.frame.as_ref().map(|frame| frame.page_num())
    }

    /// Whether the page is at record capacity.
    pub fn is_full(&self) -> RecordResult<bool> {
        let frame = self.pinned()?;
        let data = frame.data();
        let header = header_ref(&data)?;
        Ok(header.get_record_num()? >= header.get_record_capacity()?)
    }

    /// The logical record size this page was formatted for.
    pub fn record_real_size(&self) -> RecordResult<i32> {
        let frame = self.pinned()?;
        let data = frame.data();
        Ok(header_ref(&data)?.get_record_real_size()?)
    }

    /// Whether this page is the head of a two-page record chain.
    pub fn has_next(&self) -> RecordResult<bool> {
        let frame = self.pinned()?;
        let data = frame.data();
        Ok(header_ref(&data)?.get_has_next()? == 1)
    }

    /// The tail page of the chain this page heads, `-1` when unchained.
    pub fn next_page_num(&self) -> RecordResult<PageNum> {
        let frame = self.pinned()?;
        let data = frame.data();
        Ok(header_ref(&data)?.get_next_page_num()?)
    }

    /// Marks this page as the head of a chain whose tail is `tail_page`.
    pub fn link_tail(&mut self, tail_page: PageNum) -> RecordResult<()> {
        let frame = self.pinned()?;
        {
            let mut data = frame.data_mut();
            let mut header = header_mut(&mut data)?;
            header.set_has_next(1)?;
            header.set_next_page_num(tail_page)?;
        }
        frame.mark_dirty();
        Ok(())
    }

    fn pinned(&self) -> RecordResult<&FrameHandle> {
        self.frame.as_ref().ok_or(RecordError::Closed)
    }
}

/// Decoded copy of the header fields the record operations need.
#[derive(Debug, Clone, Copy)]
struct PageGeometry {
    record_num: i32,
    capacity: i32,
    real_size: i32,
    slot_size: i32,
    first_offset: i32,
}

fn read_geometry(data: &[u8]) -> RecordResult<PageGeometry> {
    let header = header_ref(data)?;
    Ok(PageGeometry {
        record_num: header.get_record_num()?,
        capacity: header.get_record_capacity()?,
        real_size: header.get_record_real_size()?,
        slot_size: header.get_record_size()?,
        first_offset: header.get_first_record_offset()?,
    })
}

fn header_ref(data: &[u8]) -> RecordResult<HeaderRef<'_>> {
    HeaderRef::new(data).ok_or_else(short_page_error)
}

fn header_mut(data: &mut [u8]) -> RecordResult<HeaderMut<'_>> {
    HeaderMut::new(data).ok_or_else(short_page_error)
}

fn short_page_error() -> RecordError {
    RecordError::Header(BinaryError::BytesSliceSizeMismatch {
        expected: HEADER_SIZE,
        from_offset: 0,
    })
}

/// Byte range of the slot bitmap within the page.
fn bitmap_range(capacity: i32) -> Range<usize> {
    HEADER_SIZE..HEADER_SIZE + layout::bitmap_bytes(capacity)
}

/// Byte range of the *logical* record in slot `slot_num`: the slot is
/// `slot_size` bytes wide but only `real_size` of them belong to the record.
fn slot_range(geometry: &PageGeometry, slot_num: SlotNum) -> Range<usize> {
    let start = (geometry.first_offset + slot_num * geometry.slot_size) as usize;
    start..start + geometry.real_size as usize
}
