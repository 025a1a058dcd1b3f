pub mod base;
pub mod files;
pub mod index;

pub use base::{IndexCursor, PageId, RecordId};
