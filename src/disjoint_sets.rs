use smallvec::SmallVec;

use crate::errors::*;

/// Disjoint sets (union-find) over the elements `0..len()`.
///
/// Each slot is an "up tree" entry: a negative value marks a root and its magnitude is
/// the size of the set, a non-negative value is the index of the parent element.
///
/// `find` compresses paths and `union` attaches the smaller set under the larger one.
/// When both sets are the same size the root of the second argument goes under the
/// root of the first, so repeated equal size unions always give the same partition roots.
#[derive(Debug, Clone, Default)]
pub struct DisjointSets {
    up_trees: Vec<isize>,
    sets_count: usize,
}

impl DisjointSets {
    pub fn new(elements_count: usize) -> DisjointSets {
        DisjointSets {
            up_trees: vec![-1; elements_count],
            sets_count: elements_count,
        }
    }

    /// Append `count` new singleton sets.
    pub fn add_elements(&mut self, count: usize) {
        self.up_trees.extend((0..count).map(|_| -1));
        self.sets_count += count;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.up_trees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.up_trees.is_empty()
    }

    /// Number of distinct sets currently in the partition.
    #[inline]
    pub fn sets_count(&self) -> usize {
        self.sets_count
    }

    /// The representative element of the set containing `element`.
    pub fn find(&mut self, element: usize) -> Result<usize> {
        self.check_element(element)?;

        // Walk up to the root remembering the trail, then point everything on the
        // trail straight at the root. No recursion, so long chains cannot blow the stack.
        let mut trail = SmallVec::<[usize; 16]>::new();
        let mut current = element;
        while self.up_trees[current] >= 0 {
            trail.push(current);
            current = self.up_trees[current] as usize;
        }
        let root = current;

        for node in trail {
            self.up_trees[node] = root as isize;
        }

        Ok(root)
    }

    /// Merge the sets containing `a` and `b`. Joining two members of the same set is a no-op.
    ///
    /// Returns true if two distinct sets were merged.
    pub fn union(&mut self, a: usize, b: usize) -> Result<bool> {
        let root_a = self.find(a)?;
        let root_b = self.find(b)?;
        if root_a == root_b {
            return Ok(false);
        }

        let combined_size = self.up_trees[root_a] + self.up_trees[root_b];

        // Sizes are stored negated, so the bigger (or equal) set has the smaller value.
        if self.up_trees[root_a] <= self.up_trees[root_b] {
            self.up_trees[root_b] = root_a as isize;
            self.up_trees[root_a] = combined_size;
        } else {
            self.up_trees[root_a] = root_b as isize;
            self.up_trees[root_b] = combined_size;
        }
        self.sets_count -= 1;

        Ok(true)
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> Result<bool> {
        Ok(self.find(a)? == self.find(b)?)
    }

    /// Number of elements in the set containing `element`.
    pub fn set_size(&mut self, element: usize) -> Result<usize> {
        let root = self.find(element)?;
        Ok((-self.up_trees[root]) as usize)
    }

    #[inline]
    fn check_element(&self, element: usize) -> Result<()> {
        if element < self.up_trees.len() {
            Ok(())
        } else {
            Err(index_out_of_bounds(element, self.up_trees.len()))
        }
    }
}
