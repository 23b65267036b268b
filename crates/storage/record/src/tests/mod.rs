//! Cross-module scenarios: file handles and scans running against the
//! in-memory buffer pool.


use crate::errors::record_error::RecordError;
use crate::file_handle::FileHandle;
use crate::scanner::{Scanned, Scanner};
use pool::api::FileId;
use pool::mem_pool::MemPool;

/// Registers a file on `pool` and opens a handle on it.
fn open_file(pool: &MemPool) -> (FileHandle<'_, MemPool>, FileId) {
    let fid = pool.create_file();
    let mut handle = FileHandle::new();
    handle.open(pool, fid).unwrap();
    (handle, fid)
}

/// A payload of `len` bytes with a recognizable, seed-dependent pattern.
fn patterned(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| seed.wrapping_add((i % 251) as u8))
        .collect()
}

/// Runs a scan to completion, panicking on anything but `EndOfFile`.
fn collect_scan(scanner: &mut Scanner<'_, MemPool>) -> Vec<Scanned> {
    let mut out = Vec::new();
    let mut result = scanner.first_record();
    loop {
        match result {
            Ok(scanned) => {
                out.push(scanned);
                result = scanner.next_record();
            }
            Err(RecordError::EndOfFile) => break,
            Err(e) => panic!("scan failed: {e}"),
        }
    }
    out
}
