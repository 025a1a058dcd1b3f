pub mod btree;
pub mod node;

pub use btree::BTreeIndex;
pub use node::{InternalNode, LeafNode};
