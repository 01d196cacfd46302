//! Parent-pointer forest used to group node indices into components.

/// Disjoint-set forest over `0..n` with size-weighted union.
///
/// `find` never rewrites parent pointers, so it can be called through a
/// shared reference; weighting keeps every tree at logarithmic depth.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// `true` for a forest over zero elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the set containing `x`.
    ///
    /// # Panics
    /// Panics if `x >= len()`.
    pub fn find(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets holding `a` and `b`; returns `false` if already joined.
    ///
    /// The smaller tree goes under the larger. On a tie the root of `a` is
    /// attached under the root of `b`.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        let (child, root) = if self.size[root_a] > self.size[root_b] {
            (root_b, root_a)
        } else {
            (root_a, root_b)
        };
        self.parent[child] = root;
        self.size[root] += self.size[child];
        true
    }

    /// `true` if `a` and `b` share a root.
    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of elements in the tree rooted at `root`.
    pub fn set_size(&self, root: usize) -> usize {
        self.size[self.find(root)]
    }
}
