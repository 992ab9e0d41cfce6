//! Hash-consed node storage.
//!
//! The [`NodeTable`] is the single source of truth for node identity. It
//! guarantees:
//!
//! 1. Canonicity: identical `(level, lo, hi)` triples map to the same id
//! 2. Maximal sharing: identical substructures share one node
//! 3. Zero-suppression: a node whose `hi` arc is ⊥ is never stored; inserting
//!    one yields its `lo` child instead
//!
//! The table is the sole shared mutable object during construction, so every
//! operation goes through one coarse `RwLock`. `add` is linearisable: the
//! lookup-or-insert runs under the write lock, so concurrent insertions of the
//! same triple race to a single winner and all callers observe its id.
//! Identifiers are stable for the lifetime of the table.

use crate::error::{ZddError, ZddResult};
use crate::node::{Node, NodeId};
use rustc_hash::FxHashMap;
use std::mem;
use std::sync::RwLock;

struct TableInner {
    /// Node storage indexed by id. Slot 0 is the null sentinel, slots 1 and 2
    /// the terminals.
    nodes: Vec<Node>,
    /// `(level, lo, hi)` → id for O(1) deduplication.
    index: FxHashMap<Node, NodeId>,
}

/// Hash-consed store assigning identifiers to `(level, lo, hi)` triples.
pub struct NodeTable {
    inner: RwLock<TableInner>,
}

impl NodeTable {
    /// Create a table holding only the two terminals.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a table with preallocated node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(3));
        let terminal = Node::new(0, NodeId::NULL, NodeId::NULL);
        nodes.push(terminal); // null sentinel, never handed out
        nodes.push(terminal); // ⊥
        nodes.push(terminal); // ⊤
        Self {
            inner: RwLock::new(TableInner {
                nodes,
                index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, TableInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, TableInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Get or create a canonical node.
    ///
    /// Applies the zero-suppression rule first: if `hi` is ⊥ the node would
    /// contribute no solutions beyond its `lo` child, so `lo` is returned and
    /// nothing is allocated. Otherwise the triple is deduplicated against the
    /// index and a fresh id is assigned only on a miss.
    pub fn add(&self, level: u32, lo: NodeId, hi: NodeId) -> NodeId {
        if hi == NodeId::ZERO {
            return lo;
        }

        let node = Node::new(level, lo, hi);
        let mut inner = self.write();

        if let Some(&existing) = inner.index.get(&node) {
            return existing;
        }

        let id = NodeId::new(inner.nodes.len() as u32);
        inner.nodes.push(node);
        inner.index.insert(node, id);
        id
    }

    /// Look up a node by id.
    ///
    /// The null reference and ids past the end of the array fail with
    /// [`ZddError::InvalidNode`].
    pub fn get(&self, id: NodeId) -> ZddResult<Node> {
        let inner = self.read();
        if id.is_null() || id.index() >= inner.nodes.len() {
            return Err(ZddError::InvalidNode(id));
        }
        Ok(inner.nodes[id.index()])
    }

    /// Unchecked lookup for traversals over ids the table itself produced.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> Node {
        self.read().nodes[id.index()]
    }

    /// Number of stored nodes, terminals inclusive, the null sentinel
    /// exclusive.
    pub fn size(&self) -> usize {
        self.read().nodes.len() - 1
    }

    /// Approximate bytes held by the node array and the hash index. Used for
    /// the construction memory ceiling.
    pub fn approx_bytes(&self) -> u64 {
        let inner = self.read();
        let node_bytes = inner.nodes.capacity() * mem::size_of::<Node>();
        let index_bytes = inner.index.capacity() * (mem::size_of::<Node>() + mem::size_of::<NodeId>());
        (node_bytes + index_bytes) as u64
    }

    /// Snapshot of table statistics.
    pub fn stats(&self) -> TableStats {
        let inner = self.read();
        TableStats {
            node_count: inner.nodes.len() - 1,
            capacity: inner.nodes.capacity(),
            index_capacity: inner.index.capacity(),
        }
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a [`NodeTable`].
#[derive(Debug, Clone)]
pub struct TableStats {
    pub node_count: usize,
    pub capacity: usize,
    pub index_capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_table_holds_terminals() {
        let table = NodeTable::new();
        assert_eq!(table.size(), 2);

        let zero = table.get(NodeId::ZERO).unwrap();
        let one = table.get(NodeId::ONE).unwrap();
        assert!(zero.is_terminal());
        assert!(one.is_terminal());
    }

    #[test]
    fn test_zero_suppression_rule() {
        let table = NodeTable::new();

        // hi == ⊥: the lo child comes back and nothing is stored
        let r = table.add(5, NodeId::ONE, NodeId::ZERO);
        assert_eq!(r, NodeId::ONE);
        assert_eq!(table.size(), 2);

        let r = table.add(5, NodeId::ZERO, NodeId::ZERO);
        assert_eq!(r, NodeId::ZERO);
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn test_deduplication() {
        let table = NodeTable::new();

        let r1 = table.add(1, NodeId::ZERO, NodeId::ONE);
        assert_eq!(table.size(), 3);

        // Same triple returns the same id without allocating
        let r2 = table.add(1, NodeId::ZERO, NodeId::ONE);
        assert_eq!(r1, r2);
        assert_eq!(table.size(), 3);

        // Different triple gets a fresh id
        let r3 = table.add(2, NodeId::ZERO, NodeId::ONE);
        assert_ne!(r1, r3);
        assert_eq!(table.size(), 4);
    }

    #[test]
    fn test_ids_are_sequential() {
        let table = NodeTable::new();
        let r1 = table.add(1, NodeId::ZERO, NodeId::ONE);
        let r2 = table.add(2, r1, NodeId::ONE);
        assert_eq!(r1.raw(), 3);
        assert_eq!(r2.raw(), 4);
    }

    #[test]
    fn test_get_rejects_null_and_out_of_range() {
        let table = NodeTable::new();
        assert_eq!(
            table.get(NodeId::NULL),
            Err(ZddError::InvalidNode(NodeId::NULL))
        );
        assert_eq!(
            table.get(NodeId::new(99)),
            Err(ZddError::InvalidNode(NodeId::new(99)))
        );
    }

    #[test]
    fn test_shared_substructure() {
        let table = NodeTable::new();

        // Build the same chain twice; every id must coincide
        let a1 = table.add(1, NodeId::ZERO, NodeId::ONE);
        let a2 = table.add(2, a1, NodeId::ONE);
        let a3 = table.add(3, a2, a1);

        let b1 = table.add(1, NodeId::ZERO, NodeId::ONE);
        let b2 = table.add(2, b1, NodeId::ONE);
        let b3 = table.add(3, b2, b1);

        assert_eq!(a1, b1);
        assert_eq!(a2, b2);
        assert_eq!(a3, b3);
        assert_eq!(table.size(), 5);
    }

    #[test]
    fn test_concurrent_adds_converge() {
        use std::sync::Arc;
        use std::thread;

        let table = Arc::new(NodeTable::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let table = Arc::clone(&table);
            handles.push(thread::spawn(move || {
                let mut ids = Vec::new();
                for level in 1..=32u32 {
                    ids.push(table.add(level, NodeId::ZERO, NodeId::ONE));
                }
                ids
            }));
        }

        let results: Vec<Vec<NodeId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for ids in &results[1..] {
            assert_eq!(ids, &results[0]);
        }
        // 32 distinct triples plus the two terminals
        assert_eq!(table.size(), 34);
    }

    #[test]
    fn test_stats_and_bytes() {
        let table = NodeTable::new();
        table.add(1, NodeId::ZERO, NodeId::ONE);

        let stats = table.stats();
        assert_eq!(stats.node_count, 3);
        assert!(stats.capacity >= 4);
        assert!(table.approx_bytes() > 0);
    }
}
