use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Page size for all index file I/O (1KB)
pub const PAGE_SIZE: usize = 1024;

/// Page number within a paged file. Page 0 is reserved for the index
/// metadata header; node pages start at 1. A value of -1 means "no such
/// page".
pub type PageId = i32;

/// Slot number within a record page
pub type SlotId = i32;

/// Stable record address: a slot within a record page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct RecordId {
    pub pid: PageId,
    pub sid: SlotId,
}

impl RecordId {
    pub fn new(pid: PageId, sid: SlotId) -> Self {
        RecordId { pid, sid }
    }

    pub fn is_valid(&self) -> bool {
        self.pid >= 0 && self.sid >= 0
    }
}

/// Position in the leaf chain: a leaf page and an entry slot within it.
/// `pid == 0` marks end-of-scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct IndexCursor {
    pub pid: PageId,
    pub eid: usize,
}

impl IndexCursor {
    pub fn new(pid: PageId, eid: usize) -> Self {
        IndexCursor { pid, eid }
    }
}
