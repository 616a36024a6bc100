//! Fixed-depth authenticated tree over the address registry.
//!
//! The core only ever sees a [`TreeWitness`] and recomputes a root from it.
//! [`AddressTree`] is the caller-side holder of the raw leaves that produces those
//! witnesses; nothing in the admission path reads it.

use commitgate_primitives::{constants::{EMPTY_LEAF, TAG_TREE_NODE}, node_hash, Hash256};

use crate::{
    errors::CodecError,
    hashers::tree_leaf,
    types::{AddressKey, PathNode, Root, TREE_DEPTH, TREE_SLOTS},
};

#[inline]
fn parent_hash(left: &Hash256, right: &Hash256) -> Hash256 {
    node_hash(TAG_TREE_NODE, left, right)
}

/// Authentication path for one registry slot, leaf to root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeWitness {
    pub path: [PathNode; TREE_DEPTH],
}

impl TreeWitness {
    #[must_use]
    pub const fn new(path: [PathNode; TREE_DEPTH]) -> Self {
        Self { path }
    }

    /// Slot implied by the direction bits.
    #[must_use]
    pub fn index(&self) -> usize {
        self.path
            .iter()
            .enumerate()
            .fold(0usize, |acc, (level, node)| if node.is_left { acc } else { acc | (1 << level) })
    }
}

/// Recompute the registry root with `leaf_value` at the witnessed slot.
///
/// Pure: the same witness yields the root proving the current occupant and the root
/// after writing a new occupant, depending only on `leaf_value`.
#[must_use]
pub fn compute_root(witness: &TreeWitness, leaf_value: &AddressKey) -> Root {
    let mut acc = tree_leaf(witness.index(), leaf_value);
    for node in &witness.path {
        acc = if node.is_left {
            parent_hash(&acc, &node.sibling)
        } else {
            parent_hash(&node.sibling, &acc)
        };
    }
    Root(acc)
}

/// Caller-side dense tree of registry slots.
#[derive(Clone, Debug)]
pub struct AddressTree {
    leaves: Vec<AddressKey>,
    // levels[0] holds leaf hashes, levels[TREE_DEPTH] holds the root.
    levels: Vec<Vec<Hash256>>,
}

impl Default for AddressTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressTree {
    #[must_use]
    pub fn new() -> Self {
        let mut levels = Vec::with_capacity(TREE_DEPTH + 1);
        let mut width = TREE_SLOTS;
        let mut fill = EMPTY_LEAF;
        for _ in 0..=TREE_DEPTH {
            levels.push(vec![fill; width]);
            fill = parent_hash(&fill, &fill);
            width >>= 1;
        }
        Self { leaves: vec![AddressKey::EMPTY; TREE_SLOTS], levels }
    }

    fn check(index: usize) -> Result<(), CodecError> {
        if index >= TREE_SLOTS {
            return Err(CodecError::SlotOutOfRange { index, max: TREE_SLOTS });
        }
        Ok(())
    }

    /// Write `value` into `index` and rehash its path.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::SlotOutOfRange` for `index >= 256`.
    pub fn set_leaf(&mut self, index: usize, value: AddressKey) -> Result<(), CodecError> {
        Self::check(index)?;
        self.leaves[index] = value;
        self.levels[0][index] = tree_leaf(index, &value);
        let mut idx = index;
        for level in 0..TREE_DEPTH {
            let base = idx & !1;
            let h = parent_hash(&self.levels[level][base], &self.levels[level][base + 1]);
            idx >>= 1;
            self.levels[level + 1][idx] = h;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CodecError::SlotOutOfRange` for `index >= 256`.
    pub fn leaf(&self, index: usize) -> Result<AddressKey, CodecError> {
        Self::check(index)?;
        Ok(self.leaves[index])
    }

    /// First slot holding `key`, if any.
    #[must_use]
    pub fn position(&self, key: &AddressKey) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        self.leaves.iter().position(|k| k == key)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves.iter().filter(|k| !k.is_empty()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn root(&self) -> Root {
        Root(self.levels[TREE_DEPTH][0])
    }

    /// # Errors
    ///
    /// Returns `CodecError::SlotOutOfRange` for `index >= 256`.
    pub fn witness(&self, index: usize) -> Result<TreeWitness, CodecError> {
        Self::check(index)?;
        let mut path = [PathNode { sibling: EMPTY_LEAF, is_left: true }; TREE_DEPTH];
        let mut idx = index;
        for (level, node) in path.iter_mut().enumerate() {
            *node = PathNode { sibling: self.levels[level][idx ^ 1], is_left: idx & 1 == 0 };
            idx >>= 1;
        }
        Ok(TreeWitness::new(path))
    }
}
