use std::fs::{File, OpenOptions};
use std::io::{self, Result};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::storage::base::{PAGE_SIZE, PageId};

/// Access mode for a paged file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only; the file must already exist
    Read,
    /// Read-write; the file is created if it does not exist
    Write,
}

/// PagedFile manages fixed-size page storage in .idx files
/// Pages are addressed by non-negative page number; the end-of-file page
/// count doubles as a monotonic allocator for new pages.
pub struct PagedFile {
    file: File,
    path: PathBuf,
    mode: OpenMode,
    /// One past the highest page number ever written
    end_pid: Mutex<PageId>,
}

impl PagedFile {
    /// Open a paged file, creating it first when missing in write mode
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let file = match mode {
            OpenMode::Read => OpenOptions::new().read(true).open(&path)?,
            OpenMode::Write => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(&path)?,
        };

        let len = file.metadata()?.len();
        if len % PAGE_SIZE as u64 != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file length {} is not a multiple of page size", len),
            ));
        }

        Ok(PagedFile {
            file,
            path: path.as_ref().to_path_buf(),
            mode,
            end_pid: Mutex::new((len / PAGE_SIZE as u64) as PageId),
        })
    }

    /// Calculate file offset for a page
    fn page_offset(pid: PageId) -> u64 {
        pid as u64 * PAGE_SIZE as u64
    }

    /// Read a page into the caller's buffer
    pub fn read_page(&self, pid: PageId, page: &mut [u8; PAGE_SIZE]) -> Result<()> {
        if pid < 0 || pid >= self.end_pid() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("page {} out of range ({} pages)", pid, self.end_pid()),
            ));
        }
        self.file.read_exact_at(page, Self::page_offset(pid))
    }

    /// Write a full page, extending the file when pid is past the end
    pub fn write_page(&self, pid: PageId, page: &[u8; PAGE_SIZE]) -> Result<()> {
        if pid < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("page {} out of range", pid),
            ));
        }
        if self.mode == OpenMode::Read {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "paged file opened read-only",
            ));
        }

        self.file.write_all_at(page, Self::page_offset(pid))?;

        let mut end_pid = self.end_pid.lock();
        if pid + 1 > *end_pid {
            *end_pid = pid + 1;
        }
        Ok(())
    }

    /// One past the highest page number ever written (0 for an empty file)
    pub fn end_pid(&self) -> PageId {
        *self.end_pid.lock()
    }

    /// Flush and close the file
    pub fn close(self) -> Result<()> {
        if self.mode == OpenMode::Write {
            self.file.sync_all()?;
        }
        Ok(())
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
