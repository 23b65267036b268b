//! Physical layout arithmetic for record pages.
//!
//! A record page is laid out as
//!
//! ```text
//! [ PageHeader | Bitmap | pad to 8 | Slot 0 | Slot 1 | ... | Slot C-1 ]
//! ```
//!
//! with one bitmap bit per slot. The capacity `C` is the largest integer
//! satisfying `C * record_size + ceil(C / 8) <= page_size - header - 1`,
//! computed below with the classic `record_size + 1/8` division.

use crate::header::HEADER_SIZE;

/// Rounds `size` up to the next multiple of 8. Slot widths and the first
/// record offset are always 8-aligned.
pub(crate) fn align8(size: i32) -> i32 {
    (size + 7) / 8 * 8
}

/// Maximum number of records a page of `page_size` bytes can hold at the
/// given (aligned) physical slot width.
pub(crate) fn record_capacity(page_size: usize, record_size: i32) -> i32 {
    ((page_size as f64 - HEADER_SIZE as f64 - 1.0) / (record_size as f64 + 0.125)) as i32
}

/// Bytes needed for a bitmap with one bit per slot.
pub(crate) fn bitmap_bytes(capacity: i32) -> usize {
    (capacity as usize + 7) / 8
}

/// Byte offset of slot 0 from the page start: header plus bitmap, padded to
/// the next 8-byte boundary.
pub(crate) fn first_record_offset(capacity: i32) -> i32 {
    align8(HEADER_SIZE as i32 + bitmap_bytes(capacity) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align8_rounds_up() {
        assert_eq!(align8(0), 0);
        assert_eq!(align8(1), 8);
        assert_eq!(align8(8), 8);
        assert_eq!(align8(9), 16);
        assert_eq!(align8(500), 504);
        assert_eq!(align8(4000), 4000);
    }

    #[test]
    fn capacity_for_common_sizes_on_8k_pages() {
        // page_size 8192, header 28: (8163) / (record_size + 0.125)
        assert_eq!(record_capacity(8192, 504), 16); // 500-byte records
        assert_eq!(record_capacity(8192, 104), 78); // 100-byte records
        assert_eq!(record_capacity(8192, 4000), 2); // chain halves
        assert_eq!(record_capacity(8192, 4096), 1); // single-page maximum
    }

    #[test]
    fn capacity_zero_when_record_exceeds_page() {
        assert_eq!(record_capacity(8192, 8192), 0);
    }

    #[test]
    fn capacity_fits_with_bitmap_and_header() {
        // The defining inequality must hold for the computed capacity and
        // fail for capacity + 1.
        for record_size in [8, 104, 504, 4000, 4096] {
            let capacity = record_capacity(8192, record_size);
            let used = capacity as usize * record_size as usize + bitmap_bytes(capacity);
            assert!(used <= 8192 - HEADER_SIZE - 1, "size {record_size}");

            let one_more = capacity + 1;
            let overflow = one_more as usize * record_size as usize + bitmap_bytes(one_more);
            assert!(overflow > 8192 - HEADER_SIZE - 1, "size {record_size}");
        }
    }

    #[test]
    fn first_record_offset_is_aligned_past_the_bitmap() {
        assert_eq!(first_record_offset(16), 32); // 28 + 2 -> 32
        assert_eq!(first_record_offset(78), 40); // 28 + 10 -> 40
        assert_eq!(first_record_offset(2), 32); // 28 + 1 -> 32
        assert!(first_record_offset(1004) >= HEADER_SIZE as i32 + 126);
        assert_eq!(first_record_offset(1004) % 8, 0);
    }
}
