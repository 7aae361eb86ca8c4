//! # Disjoint Set
//!
//! Union-find over cell indices with path compression and union by rank.
//!
//! The generator performs on the order of width × height find/union calls
//! per level, so the structure is kept as two flat arrays indexed by cell
//! rather than a graph of owned nodes.

/// Path-compressed, rank-balanced union-find arena.
///
/// # Examples
///
/// ```
/// use warren::DisjointSet;
///
/// let mut sets = DisjointSet::new(8);
/// assert!(!sets.same_set(1, 2));
/// sets.union(1, 2);
/// sets.union(2, 3);
/// assert!(sets.same_set(1, 3));
/// ```
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Creates `len` singleton groups, one per cell index.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Number of elements in the arena.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns true when the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of `index`'s group.
    ///
    /// Compresses the visited chain in a second pass so repeated lookups
    /// stay near O(1); the walk is iterative, never recursive.
    pub fn find(&mut self, index: usize) -> usize {
        debug_assert!(index < self.parent.len());
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = index;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merges the groups containing `a` and `b`.
    ///
    /// A no-op when both already share a representative; otherwise the
    /// lower-rank root is attached under the higher-rank root, and on a
    /// tie the second root wins and its rank grows.
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        if self.rank[root_a] > self.rank[root_b] {
            self.parent[root_b] = root_a;
        } else {
            self.parent[root_a] = root_b;
            if self.rank[root_a] == self.rank[root_b] {
                self.rank[root_b] += 1;
            }
        }
    }

    /// Returns true when `a` and `b` share a representative.
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons_are_distinct() {
        let mut sets = DisjointSet::new(4);
        for i in 0..4 {
            assert_eq!(sets.find(i), i);
        }
        assert!(!sets.same_set(0, 1));
    }

    #[test]
    fn test_union_merges_groups() {
        let mut sets = DisjointSet::new(6);
        sets.union(0, 1);
        sets.union(2, 3);
        assert!(sets.same_set(0, 1));
        assert!(sets.same_set(2, 3));
        assert!(!sets.same_set(1, 2));

        sets.union(1, 2);
        assert!(sets.same_set(0, 3));
    }

    #[test]
    fn test_union_is_idempotent() {
        let mut sets = DisjointSet::new(3);
        sets.union(0, 1);
        let root = sets.find(0);
        sets.union(0, 1);
        sets.union(1, 0);
        assert_eq!(sets.find(1), root);
    }

    #[test]
    fn test_transitive_chain() {
        let mut sets = DisjointSet::new(64);
        for i in 0..63 {
            sets.union(i, i + 1);
        }
        assert!(sets.same_set(0, 63));
        // After compression every element points straight at the root.
        let root = sets.find(0);
        for i in 0..64 {
            assert_eq!(sets.find(i), root);
        }
    }

    #[test]
    fn test_rank_tie_promotes_second_root() {
        let mut sets = DisjointSet::new(2);
        sets.union(0, 1);
        assert_eq!(sets.find(0), 1);
    }
}
