use crate::kasm::graph::NodeId;
use fxhash::FxHashMap;
use smallvec::SmallVec;

/// Seed for all k-mer key hashing.
pub const KMER_HASH_SEED: u64 = 97;

/// MurmurHash64A over `key`.
///
/// 64-bit mixing over little-endian 8-byte chunks with the canonical tail
/// handling; identical bytes always map to identical hashes regardless of
/// where in the read arena the window lives.
pub fn murmur64a(key: &[u8], seed: u64) -> u64 {
    const M: u64 = 0xc6a4_a793_5bd1_e995;
    const R: u32 = 47;

    let mut h = seed ^ (key.len() as u64).wrapping_mul(M);

    let mut chunks = key.chunks_exact(8);
    for chunk in &mut chunks {
        let mut k = u64::from_le_bytes(chunk.try_into().expect("8-byte chunk"));
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u64;
        for (i, &b) in tail.iter().enumerate() {
            k |= (b as u64) << (8 * i);
        }
        h ^= k;
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

/// Hash of one k-mer window under the index seed.
#[inline]
pub fn kmer_hash(kmer: &[u8]) -> u64 {
    murmur64a(kmer, KMER_HASH_SEED)
}

/// Map from k-mer window to graph node.
///
/// Keys are murmur hashes of the first k bytes of an arena window; hash
/// collisions fall into a short bucket resolved by a caller-supplied byte
/// equality probe (the index itself never dereferences node ids). Deletion
/// is plain bucket removal.
#[derive(Debug, Default)]
pub struct KmerIndex {
    buckets: FxHashMap<u64, SmallVec<[NodeId; 1]>>,
    len: usize,
}

impl KmerIndex {
    pub fn new() -> Self {
        KmerIndex {
            buckets: FxHashMap::default(),
            len: 0,
        }
    }

    /// Number of live nodes in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find the node whose k-mer hashes to `hash` and satisfies `eq`.
    pub fn find(&self, hash: u64, mut eq: impl FnMut(NodeId) -> bool) -> Option<NodeId> {
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&id| eq(id))
    }

    /// Register a freshly allocated node under `hash`.
    pub fn insert(&mut self, hash: u64, id: NodeId) {
        self.buckets.entry(hash).or_default().push(id);
        self.len += 1;
    }

    /// Remove `id` from the bucket for `hash`, if present.
    pub fn remove(&mut self, hash: u64, id: NodeId) {
        if let Some(bucket) = self.buckets.get_mut(&hash) {
            if let Some(pos) = bucket.iter().position(|&n| n == id) {
                bucket.remove(pos);
                self.len -= 1;
                if bucket.is_empty() {
                    self.buckets.remove(&hash);
                }
            }
        }
    }

    /// Snapshot of every node id currently in the index.
    ///
    /// Sweeps mutate the index while walking it, so callers get an owned
    /// list rather than a borrowing iterator.
    pub fn ids(&self) -> Vec<NodeId> {
        self.buckets.values().flatten().copied().collect()
    }
}
