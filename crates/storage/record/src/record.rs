use crate::rid::Rid;

/// An owned record: its identifier plus the record's logical bytes.
///
/// The data length equals the `record_real_size` of the page the record
/// lives on — or the sum of both halves for a record assembled from a
/// two-page chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The identifier this record was read under.
    pub rid: Rid,

    /// The record payload.
    pub data: Vec<u8>,
}

impl Record {
    /// Creates a record from its parts.
    pub fn new(rid: Rid, data: Vec<u8>) -> Self {
        Self { rid, data }
    }
}
