use std::path::Path;

use tracing::debug;

use super::node::{InternalNode, LeafNode, get_i32, put_i32};
use crate::error::{Error, Result};
use crate::storage::base::{IndexCursor, PAGE_SIZE, PageId, RecordId};
use crate::storage::files::{OpenMode, PagedFile};

/// Separator key and freshly written page that a split hands up for the
/// parent to incorporate
#[derive(Debug, Clone, Copy)]
struct NewChild {
    key: i32,
    pid: PageId,
}

/// B+Tree index over a paged file, mapping integer keys to record ids
/// Page 0 holds the (root_pid, height) header; node pages start at 1 and
/// are allocated off the end of the file, never freed. height 0 is the
/// empty tree, height 1 a single-leaf root.
pub struct BTreeIndex {
    pf: PagedFile,
    root_pid: PageId,
    height: i32,
}

impl BTreeIndex {
    /// Open an index file, restoring the root header when the file
    /// already holds pages
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let pf = PagedFile::open(path, mode).map_err(Error::FileOpen)?;
        let mut index = BTreeIndex {
            pf,
            root_pid: -1,
            height: 0,
        };

        if index.pf.end_pid() != 0 {
            let mut page = [0u8; PAGE_SIZE];
            index.pf.read_page(0, &mut page).map_err(Error::FileRead)?;

            let root_pid = get_i32(&page, 0);
            let height = get_i32(&page, 4);

            // A zero root_pid means the header page was never written;
            // page 0 is reserved, so a live root can never be there
            if root_pid != 0 && height >= 0 {
                index.root_pid = root_pid;
                index.height = height;
                debug!(root_pid, height, "restored index header");
            }
        }

        Ok(index)
    }

    /// Write the root header to page 0 and close the file
    pub fn close(self) -> Result<()> {
        if self.pf.mode() == OpenMode::Write {
            let mut page = [0u8; PAGE_SIZE];
            put_i32(&mut page, 0, self.root_pid);
            put_i32(&mut page, 4, self.height);
            self.pf.write_page(0, &page).map_err(Error::FileWrite)?;
            debug!(root_pid = self.root_pid, height = self.height, "wrote index header");
        }
        self.pf.close().map_err(Error::FileClose)
    }

    pub fn root_pid(&self) -> PageId {
        self.root_pid
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Insert a (key, rid) pair. Key 0 is the on-page occupancy sentinel
    /// and is rejected along with negative keys.
    pub fn insert(&mut self, key: i32, rid: RecordId) -> Result<()> {
        if key <= 0 {
            return Err(Error::InvalidKey(key));
        }
        if !rid.is_valid() {
            return Err(Error::InvalidRecord(rid));
        }

        // Empty tree: the first leaf claims the first page past the
        // reserved header page
        if self.height == 0 {
            let pid = self.pf.end_pid().max(1);
            let mut leaf = LeafNode::new();
            leaf.insert(key, rid)?;
            leaf.write(pid, &self.pf)?;

            self.root_pid = pid;
            self.height = 1;
            debug!(root_pid = pid, "created root leaf");
            return Ok(());
        }

        let propagated = self.insert_rec(key, rid, 1, self.root_pid)?;
        debug_assert!(propagated.is_none(), "split propagation escaped the root");
        Ok(())
    }

    /// Recursive descent for insert. The returned NewChild is the
    /// propagation channel: a split at this level hands the separator
    /// key and the new page up to the caller. Splits of the root itself
    /// are absorbed here by growing the tree.
    fn insert_rec(
        &mut self,
        key: i32,
        rid: RecordId,
        curr_height: i32,
        curr_pid: PageId,
    ) -> Result<Option<NewChild>> {
        // Leaf level
        if curr_height == self.height {
            let mut leaf = LeafNode::new();
            leaf.read(curr_pid, &self.pf)?;

            match leaf.insert(key, rid) {
                Ok(()) => {
                    leaf.write(curr_pid, &self.pf)?;
                    return Ok(None);
                }
                Err(Error::NodeFull) => {}
                Err(e) => return Err(e),
            }

            // Leaf overflow: split into a sibling at the next free page
            let new_pid = self.pf.end_pid();
            let mut sibling = LeafNode::new();
            let sibling_key = leaf.insert_and_split(key, rid, &mut sibling)?;

            // Chain the sibling into the leaf list before either page
            // hits disk
            sibling.set_next_leaf(leaf.next_leaf())?;
            leaf.set_next_leaf(new_pid)?;

            leaf.write(curr_pid, &self.pf)?;
            sibling.write(new_pid, &self.pf)?;

            if curr_height != 1 {
                return Ok(Some(NewChild {
                    key: sibling_key,
                    pid: new_pid,
                }));
            }
            self.grow_root(curr_pid, sibling_key, new_pid)?;
            return Ok(None);
        }

        // Internal level: pick the subtree, dropping this node's buffer
        // before descending
        let child_pid = {
            let mut node = InternalNode::new();
            node.read(curr_pid, &self.pf)?;
            node.locate_child(key)
        };

        let Some(new_child) = self.insert_rec(key, rid, curr_height + 1, child_pid)? else {
            return Ok(None);
        };

        // The child split; incorporate its new sibling here
        let mut node = InternalNode::new();
        node.read(curr_pid, &self.pf)?;

        match node.insert(new_child.key, new_child.pid) {
            Ok(()) => {
                node.write(curr_pid, &self.pf)?;
                return Ok(None);
            }
            Err(Error::NodeFull) => {}
            Err(e) => return Err(e),
        }

        let new_pid = self.pf.end_pid();
        let mut sibling = InternalNode::new();
        let mid_key = node.insert_and_split(new_child.key, new_child.pid, &mut sibling)?;

        node.write(curr_pid, &self.pf)?;
        sibling.write(new_pid, &self.pf)?;

        if curr_height != 1 {
            return Ok(Some(NewChild {
                key: mid_key,
                pid: new_pid,
            }));
        }
        self.grow_root(curr_pid, mid_key, new_pid)?;
        Ok(None)
    }

    /// Allocate a new internal root over the two halves of a split root.
    /// Must run after the sibling write so end_pid points past it.
    fn grow_root(&mut self, left_pid: PageId, key: i32, right_pid: PageId) -> Result<()> {
        let new_root_pid = self.pf.end_pid();
        let mut root = InternalNode::new();
        root.init_root(left_pid, key, right_pid)?;
        root.write(new_root_pid, &self.pf)?;

        self.root_pid = new_root_pid;
        self.height += 1;
        debug!(root_pid = new_root_pid, height = self.height, "root split");
        Ok(())
    }

    /// Find search_key's leaf position. The cursor is set in both
    /// outcomes: on a miss it points at the first entry greater than
    /// search_key (NoSuchRecord is returned), so a caller can still scan
    /// forward from there.
    pub fn locate(&self, search_key: i32, cursor: &mut IndexCursor) -> Result<()> {
        if self.height <= 0 {
            *cursor = IndexCursor::new(0, 0);
            return Err(Error::NoSuchRecord);
        }

        let mut curr_pid = self.root_pid;
        for _ in 1..self.height {
            let mut node = InternalNode::new();
            node.read(curr_pid, &self.pf)?;
            curr_pid = node.locate_child(search_key);
        }

        let mut leaf = LeafNode::new();
        leaf.read(curr_pid, &self.pf)?;

        let (found, eid) = leaf.locate(search_key);
        *cursor = IndexCursor::new(curr_pid, eid);
        if found { Ok(()) } else { Err(Error::NoSuchRecord) }
    }

    /// Read the entry under the cursor and advance it, crossing to the
    /// next leaf past the last entry. A cursor with pid 0 is exhausted.
    pub fn read_forward(&self, cursor: &mut IndexCursor) -> Result<(i32, RecordId)> {
        if cursor.pid <= 0 {
            return Err(Error::NoSuchRecord);
        }

        let mut leaf = LeafNode::new();
        leaf.read(cursor.pid, &self.pf)?;
        let (key, rid) = leaf.read_entry(cursor.eid)?;

        if cursor.eid + 1 >= leaf.key_count() {
            cursor.pid = leaf.next_leaf();
            cursor.eid = 0;
        } else {
            cursor.eid += 1;
        }

        Ok((key, rid))
    }
}
