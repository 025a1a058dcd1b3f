use std::fmt;
use std::io;

use crate::storage::base::{PageId, RecordId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Key absent from the tree, or a scan cursor is exhausted
    NoSuchRecord,
    /// Node cannot accept another entry
    NodeFull,
    /// Key is negative or collides with the zero occupancy sentinel
    InvalidKey(i32),
    /// Record id with a negative component
    InvalidRecord(RecordId),
    /// Negative page id
    InvalidPageId(PageId),
    /// Split target must be empty
    SiblingNotEmpty,
    FileOpen(io::Error),
    FileRead(io::Error),
    FileWrite(io::Error),
    FileClose(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchRecord => write!(f, "no such record"),
            Error::NodeFull => write!(f, "node is full"),
            Error::InvalidKey(key) => write!(f, "invalid key: {}", key),
            Error::InvalidRecord(rid) => {
                write!(f, "invalid record id: ({}, {})", rid.pid, rid.sid)
            }
            Error::InvalidPageId(pid) => write!(f, "invalid page id: {}", pid),
            Error::SiblingNotEmpty => write!(f, "split sibling is not empty"),
            Error::FileOpen(e) => write!(f, "paged file open error: {}", e),
            Error::FileRead(e) => write!(f, "paged file read error: {}", e),
            Error::FileWrite(e) => write!(f, "paged file write error: {}", e),
            Error::FileClose(e) => write!(f, "paged file close error: {}", e),
        }
    }
}

impl std::error::Error for Error {}
