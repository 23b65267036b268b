//! Sequential scans over all live records of a file.
//!
//! # Why the `scanned` page set
//!
//! A plain `page_num += 1` walk breaks down once a record chain appears:
//! assembling the chain forces a visit to the *tail* page out of order, and
//! the linear walk would later reach that tail again and misread its half as
//! a fresh record. The scanner therefore keeps one "visited" flag per page.
//! Pages are flagged as their slots are exhausted (and both chain pages are
//! flagged as soon as the chain is assembled); once a chain has been
//! materialized, every page advance goes through a search for the next
//! unvisited page instead of the linear increment.
//!
//! ```text
//!   pages:   1      2(head) ---> 5(tail)    3      4
//!   visit:   1,  2+5 (joined),  search -> 3,  4,  done
//! ```
//!
//! The scanner holds at most one pinned page at any time. Records are handed
//! out as owned [`Record`]s; a joined two-page record carries the rid of the
//! tail's slot 0 and is flagged [`Scanned::chained`].

use crate::errors::record_error::{RecordError, RecordResult};
use crate::page_slot::PageSlot;
use crate::record::Record;
use crate::rid::Rid;
use pool::api::{BufferPool, FileId, PageNum};
use pool::error::PoolError;
use tracing::trace;

/// A record-level predicate applied during scans.
///
/// Implementations must be pure: the scanner does not retain the record
/// borrow across calls. Any `Fn(&Record) -> bool` qualifies.
pub trait ConditionFilter {
    /// Whether `record` should be delivered to the caller.
    fn matches(&self, record: &Record) -> bool;
}

impl<F> ConditionFilter for F
where
    F: Fn(&Record) -> bool,
{
    fn matches(&self, record: &Record) -> bool {
        self(record)
    }
}

/// One record delivered by a scan.
#[derive(Debug)]
pub struct Scanned {
    /// The record, owned by the caller.
    pub record: Record,

    /// True when the record was assembled from a two-page chain; its rid
    /// then names the tail's slot and is not suitable for re-lookup.
    pub chained: bool,
}

/// A stateful cursor over all live records of a file.
///
/// The scan survives inserts on pages it has not reached yet, but gives no
/// guarantees about concurrent mutation of the pages it is about to visit.
pub struct Scanner<'p, P: BufferPool> {
    pool: Option<&'p P>,
    file_id: FileId,
    filter: Option<&'p dyn ConditionFilter>,
    slot: Option<PageSlot<'p, P>>,
    cursor: Rid,
    /// One flag per page of the file; see the module docs.
    scanned: Vec<bool>,
    /// Set once any chained record has been assembled during this scan;
    /// from then on page advances use the unscanned-page search.
    materialized: bool,
}

/// What one probe of the current page produced.
enum Probe {
    /// A plain record, with the cursor position it was found at.
    Record(Record),
    /// The current page heads a chain.
    ChainHead,
    /// The current page has no further live slots.
    PageEnd,
}

impl<'p, P: BufferPool> Default for Scanner<'p, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p, P: BufferPool> Scanner<'p, P> {
    /// Creates a closed scanner.
    pub fn new() -> Self {
        Self {
            pool: None,
            file_id: 0,
            filter: None,
            slot: None,
            cursor: Rid::new(0, -1),
            scanned: Vec::new(),
            materialized: false,
        }
    }

    /// Opens a scan over `file_id`. An absent `filter` matches every record.
    /// Any previous scan state is discarded.
    pub fn open_scan(
        &mut self,
        pool: &'p P,
        file_id: FileId,
        filter: Option<&'p dyn ConditionFilter>,
    ) -> RecordResult<()> {
        self.close_scan();
        self.pool = Some(pool);
        self.file_id = file_id;
        self.filter = filter;
        Ok(())
    }

    /// Drops all scan state, releasing the pinned page if any. Idempotent.
    pub fn close_scan(&mut self) {
        self.pool = None;
        self.filter = None;
        self.slot = None;
        self.cursor = Rid::new(0, -1);
        self.scanned.clear();
        self.materialized = false;
    }

    /// Positions the cursor before the first record and returns it.
    pub fn first_record(&mut self) -> RecordResult<Scanned> {
        let pool = self.pool.ok_or(RecordError::Closed)?;
        let page_count = pool.page_count(self.file_id)?;

        self.scanned = vec![false; page_count.max(0) as usize];
        self.materialized = false;
        self.slot = None;
        self.cursor = Rid::new(1, -1);

        self.next_record()
    }

    /// Returns the next record accepted by the filter, or `EndOfFile`.
    pub fn next_record(&mut self) -> RecordResult<Scanned> {
        let pool = self.pool.ok_or(RecordError::Closed)?;
        let page_count = pool.page_count(self.file_id)?;
        if page_count <= 1 {
            // Only the reserved page exists.
            return Err(RecordError::EndOfFile);
        }
        if self.scanned.len() < page_count as usize {
            // Pages appended since the scan started.
            self.scanned.resize(page_count as usize, false);
        }

        loop {
            if self.cursor.page_num >= page_count {
                match self.next_unscanned() {
                    Some(page_num) => self.cursor = Rid::new(page_num, -1),
                    None => return Err(RecordError::EndOfFile),
                }
            }

            // Re-target the pinned page when the cursor moved off it.
            if self.slot.as_ref().and_then(|slot| slot.page_num()) != Some(self.cursor.page_num) {
                self.slot = None;
                match PageSlot::open(pool, self.file_id, self.cursor.page_num) {
                    Ok(slot) => self.slot = Some(slot),
                    Err(RecordError::Pool(PoolError::InvalidPageNum { .. })) => {
                        // A disposed page; skip it.
                        trace!(page_num = self.cursor.page_num, "scan skipped unmaterialized page");
                        self.mark_scanned(self.cursor.page_num);
                        self.cursor = Rid::new(self.cursor.page_num + 1, -1);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            let probe = {
                let slot = self.slot.as_ref().ok_or(RecordError::Closed)?;
                if slot.has_next()? {
                    Probe::ChainHead
                } else {
                    match slot.next_record(self.cursor.slot_num) {
                        Ok((rid, bytes)) => Probe::Record(Record::new(rid, bytes.to_vec())),
                        Err(RecordError::EndOfPage) => Probe::PageEnd,
                        Err(e) => return Err(e),
                    }
                }
            };

            match probe {
                Probe::Record(record) => {
                    self.cursor = record.rid;
                    if self.accepts(&record) {
                        return Ok(Scanned {
                            record,
                            chained: false,
                        });
                    }
                }
                Probe::PageEnd => {
                    self.mark_scanned(self.cursor.page_num);
                    self.advance_page()?;
                }
                Probe::ChainHead => {
                    if let Some(scanned) = self.assemble_chain(pool)? {
                        if self.accepts(&scanned.record) {
                            return Ok(scanned);
                        }
                        // Rejected; the cursor already sits on the tail slot
                        // and the loop continues from there.
                    }
                }
            }
        }
    }

    /// Reads the head half under the cursor, follows `next_page_num`, reads
    /// the tail's slot 0 and concatenates both halves. Flags both pages as
    /// visited and leaves the cursor on the tail.
    ///
    /// Returns `Ok(None)` when either half turned out to be missing; the
    /// cursor has then been advanced past the chain.
    fn assemble_chain(&mut self, pool: &'p P) -> RecordResult<Option<Scanned>> {
        let head_page = self.cursor.page_num;

        let (head_half, tail_page) = {
            let slot = self.slot.as_ref().ok_or(RecordError::Closed)?;
            let tail_page = slot.next_page_num()?;
            match slot.next_record(self.cursor.slot_num) {
                Ok((_, bytes)) => (Some(bytes.to_vec()), tail_page),
                Err(RecordError::EndOfPage) => (None, tail_page),
                Err(e) => return Err(e),
            }
        };
        self.mark_scanned(head_page);

        let Some(mut data) = head_half else {
            // The head's record is gone; treat the page as exhausted.
            self.advance_page()?;
            return Ok(None);
        };

        self.mark_scanned(tail_page);
        self.materialized = true;

        // Swap the pin over to the tail. A missing tail is a broken chain,
        // not a skippable page, so pool errors surface verbatim.
        self.slot = None;
        let tail_slot = PageSlot::open(pool, self.file_id, tail_page)?;
        let joined = match tail_slot.first_record() {
            Ok((tail_rid, tail_bytes)) => {
                data.extend_from_slice(&tail_bytes);
                Some((tail_rid, data))
            }
            Err(RecordError::EndOfPage) => None,
            Err(e) => return Err(e),
        };
        self.slot = Some(tail_slot);

        match joined {
            Some((tail_rid, data)) => {
                trace!(head_page, tail_page, "assembled chained record");
                self.cursor = tail_rid;
                Ok(Some(Scanned {
                    record: Record::new(tail_rid, data),
                    chained: true,
                }))
            }
            None => {
                // The tail half is gone; fall back to the unscanned search.
                match self.next_unscanned() {
                    Some(page_num) => {
                        self.cursor = Rid::new(page_num, -1);
                        Ok(None)
                    }
                    None => Err(RecordError::EndOfFile),
                }
            }
        }
    }

    /// Moves the cursor to the next page: linearly before any chain was
    /// materialized, through the unscanned-page search afterwards.
    fn advance_page(&mut self) -> RecordResult<()> {
        if self.materialized {
            match self.next_unscanned() {
                Some(page_num) => self.cursor = Rid::new(page_num, -1),
                None => return Err(RecordError::EndOfFile),
            }
        } else {
            self.cursor = Rid::new(self.cursor.page_num + 1, -1);
        }
        Ok(())
    }

    fn accepts(&self, record: &Record) -> bool {
        match self.filter {
            Some(filter) => filter.matches(record),
            None => true,
        }
    }

    fn mark_scanned(&mut self, page_num: PageNum) {
        if page_num >= 0 && (page_num as usize) < self.scanned.len() {
            self.scanned[page_num as usize] = true;
        }
    }

    /// First page from 1 upward that has not been visited yet.
    fn next_unscanned(&self) -> Option<PageNum> {
        (1..self.scanned.len() as PageNum).find(|&page_num| !self.scanned[page_num as usize])
    }
}
