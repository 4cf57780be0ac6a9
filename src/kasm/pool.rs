use crate::kasm::graph::{Node, NodeId};
use anyhow::{bail, Result};

pub const NODES_PER_BLOCK: usize = 10_000;
pub const MAX_NODE_BLOCKS: usize = 500_000;
pub const READS_PER_BLOCK: usize = 10_000;
pub const MAX_READ_BLOCKS: usize = 100_000;

/// Dense node arena.
///
/// Nodes are bump-allocated in `NODES_PER_BLOCK` chunks and live until the
/// pool is dropped at the end of the invocation. The index of a node is its
/// `NodeId`: ids increase monotonically and are never reused, which is what
/// lets the enumerator use them as visited-set keys.
#[derive(Debug, Default)]
pub struct NodePool {
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn new() -> Self {
        NodePool {
            nodes: Vec::with_capacity(NODES_PER_BLOCK),
        }
    }

    /// Allocate a node, growing the arena by one block when full.
    pub fn alloc(&mut self, node: Node) -> Result<NodeId> {
        if self.nodes.len() == self.nodes.capacity() {
            let blocks = self.nodes.capacity() / NODES_PER_BLOCK;
            if blocks >= MAX_NODE_BLOCKS {
                bail!("Node pool exhausted after {} blocks", blocks);
            }
            self.nodes.reserve_exact(NODES_PER_BLOCK);
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Fixed-width read arena.
///
/// Every read occupies `read_length` bytes in one contiguous buffer; a read
/// (or a k-mer window inside one) is addressed by its byte offset. Offsets
/// stay valid for the life of the pool, so the k-mer index can key on
/// `(pool, offset)` views without copying windows.
#[derive(Debug)]
pub struct ReadPool {
    bytes: Vec<u8>,
    read_length: usize,
}

impl ReadPool {
    pub fn new(read_length: usize) -> Self {
        ReadPool {
            bytes: Vec::with_capacity(READS_PER_BLOCK * read_length),
            read_length,
        }
    }

    /// Copy one read into the arena and return its starting offset.
    pub fn alloc(&mut self, read: &[u8]) -> Result<u32> {
        debug_assert_eq!(read.len(), self.read_length);
        if self.bytes.len() == self.bytes.capacity() {
            let block_bytes = READS_PER_BLOCK * self.read_length;
            let blocks = self.bytes.capacity() / block_bytes;
            if blocks >= MAX_READ_BLOCKS {
                bail!("Read pool exhausted after {} blocks", blocks);
            }
            self.bytes.reserve_exact(block_bytes);
        }
        let off = self.bytes.len() as u32;
        self.bytes.extend_from_slice(read);
        Ok(off)
    }

    /// The k-length window starting at `off`.
    #[inline]
    pub fn window(&self, off: u32, k: usize) -> &[u8] {
        let off = off as usize;
        &self.bytes[off..off + k]
    }

    /// The full read starting at `off` (a record-start offset).
    #[inline]
    pub fn read_at(&self, off: u32) -> &[u8] {
        let off = off as usize;
        &self.bytes[off..off + self.read_length]
    }

    pub fn num_reads(&self) -> usize {
        self.bytes.len() / self.read_length
    }
}
