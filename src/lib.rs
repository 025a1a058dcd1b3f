pub mod error;
pub mod storage;

pub use error::{Error, Result};
pub use storage::base::{IndexCursor, PAGE_SIZE, PageId, RecordId, SlotId};
pub use storage::files::{OpenMode, PagedFile};
pub use storage::index::BTreeIndex;
