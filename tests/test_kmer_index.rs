#[cfg(test)]
mod tests {
    use kasm::kasm::graph::{Graph, NodeId, Strand};
    use kasm::kasm::kmer::{kmer_hash, murmur64a, KmerIndex};

    /* --------------------------------------------------------------------- */
    /*  murmur64a                                                            */
    /* --------------------------------------------------------------------- */

    #[test]
    fn murmur_is_deterministic() {
        let a = murmur64a(b"ACGTACGTA", 97);
        let b = murmur64a(b"ACGTACGTA", 97);
        assert_eq!(a, b);

        // Same bytes in a different buffer hash identically
        let owned = b"ACGTACGTA".to_vec();
        assert_eq!(murmur64a(&owned, 97), a);
    }

    #[test]
    fn murmur_depends_on_every_byte() {
        // Last byte sits in the unaligned tail for length 9
        assert_ne!(murmur64a(b"AAAAAAAAA", 97), murmur64a(b"AAAAAAAAC", 97));
        // And in the aligned body for length 8
        assert_ne!(murmur64a(b"AAAAAAAA", 97), murmur64a(b"CAAAAAAA", 97));
        // Short keys (pure tail) are sensitive too
        assert_ne!(murmur64a(b"ACGTA", 97), murmur64a(b"ACGTC", 97));
    }

    #[test]
    fn murmur_depends_on_seed_and_length() {
        assert_ne!(murmur64a(b"ACGTA", 97), murmur64a(b"ACGTA", 98));
        assert_ne!(murmur64a(b"ACGTA", 97), murmur64a(b"ACGT", 97));
    }

    /* --------------------------------------------------------------------- */
    /*  KmerIndex bucket behavior                                            */
    /* --------------------------------------------------------------------- */

    #[test]
    fn index_insert_find_remove() {
        let mut index = KmerIndex::new();
        assert!(index.is_empty());

        index.insert(42, NodeId(0));
        index.insert(42, NodeId(1)); // same hash, different node
        index.insert(7, NodeId(2));
        assert_eq!(index.len(), 3);

        // The equality probe disambiguates bucket entries
        assert_eq!(index.find(42, |id| id == NodeId(1)), Some(NodeId(1)));
        assert_eq!(index.find(42, |id| id == NodeId(0)), Some(NodeId(0)));
        assert_eq!(index.find(42, |_| false), None);
        assert_eq!(index.find(99, |_| true), None);

        index.remove(42, NodeId(0));
        assert_eq!(index.len(), 2);
        assert_eq!(index.find(42, |id| id == NodeId(0)), None);
        assert_eq!(index.find(42, |id| id == NodeId(1)), Some(NodeId(1)));

        // Removing an absent id is a no-op
        index.remove(42, NodeId(0));
        assert_eq!(index.len(), 2);
    }

    /* --------------------------------------------------------------------- */
    /*  Graph-level lookup over arena windows                                */
    /* --------------------------------------------------------------------- */

    #[test]
    fn graph_lookup_compares_exactly_k_bytes() {
        let mut graph = Graph::new(3, 5, 1);
        let off = graph.alloc_read(b"ACGTA").unwrap();
        let id = graph
            .new_node(off, off, 0, Strand::Forward, b"III")
            .unwrap();

        // Key is the first k bytes of the window only
        assert_eq!(graph.find_node(b"ACG"), Some(id));
        assert_eq!(graph.find_node(b"CGT"), None);
        assert_eq!(graph.kmer_bytes(id), b"ACG");

        // Windows into the same read share storage but key separately
        let id2 = graph
            .new_node(off + 1, off, 0, Strand::Forward, b"III")
            .unwrap();
        assert_eq!(graph.find_node(b"CGT"), Some(id2));
        assert_eq!(graph.node_count(), 2);

        graph.remove_node(id);
        assert_eq!(graph.find_node(b"ACG"), None);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(kmer_hash(b"ACG"), murmur64a(b"ACG", 97));
    }
}
