//! Sparse authenticated map over the message store, one tree level per key bit.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock as Lazy;

use commitgate_primitives::{constants::{EMPTY_LEAF, TAG_MAP_NODE}, node_hash, Hash256};

use crate::{
    errors::CodecError,
    hashers::map_leaf,
    types::{AddressKey, Message, PathNode, Root, MAP_HEIGHT},
};

#[inline]
fn parent_hash(left: &Hash256, right: &Hash256) -> Hash256 {
    node_hash(TAG_MAP_NODE, left, right)
}

/// `EMPTY_SUBTREES[h]` is the root of an all-empty subtree of height `h`.
static EMPTY_SUBTREES: Lazy<Vec<Hash256>> = Lazy::new(|| {
    let mut out = Vec::with_capacity(MAP_HEIGHT + 1);
    let mut h = EMPTY_LEAF;
    out.push(h);
    for _ in 0..MAP_HEIGHT {
        h = parent_hash(&h, &h);
        out.push(h);
    }
    out
});

/// Root of the map with no keys set.
#[must_use]
pub fn empty_map_root() -> Root {
    Root(EMPTY_SUBTREES[MAP_HEIGHT])
}

// Bit `pos` of the key, MSB-first.
#[inline]
const fn bit(key: &Hash256, pos: usize) -> bool {
    (key[pos / 8] >> (7 - pos % 8)) & 1 == 1
}

#[inline]
fn flip(key: &mut Hash256, pos: usize) {
    key[pos / 8] ^= 1 << (7 - pos % 8);
}

#[inline]
fn clear(key: &mut Hash256, pos: usize) {
    key[pos / 8] &= !(1 << (7 - pos % 8));
}

/// Authentication path for one key, leaf to root. The key is carried only by the
/// direction bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapWitness {
    pub path: Box<[PathNode; MAP_HEIGHT]>,
}

impl MapWitness {
    #[must_use]
    pub const fn new(path: Box<[PathNode; MAP_HEIGHT]>) -> Self {
        Self { path }
    }

    /// Key implied by the direction bits; independent of any value.
    #[must_use]
    pub fn key(&self) -> AddressKey {
        let mut key = [0u8; 32];
        for (level, node) in self.path.iter().enumerate() {
            if !node.is_left {
                flip(&mut key, MAP_HEIGHT - 1 - level);
            }
        }
        AddressKey(key)
    }
}

/// Recompute the map root with `value` stored under the witnessed key, and return that key.
#[must_use]
pub fn compute_root_and_key(witness: &MapWitness, value: &Message) -> (Root, AddressKey) {
    let key = witness.key();
    let mut acc = map_leaf(&key, value);
    for node in witness.path.iter() {
        acc = if node.is_left {
            parent_hash(&acc, &node.sibling)
        } else {
            parent_hash(&node.sibling, &acc)
        };
    }
    (Root(acc), key)
}

/// Caller-side sparse map holding raw messages and the non-empty interior nodes.
#[derive(Clone, Debug, Default)]
pub struct MessageMap {
    values: BTreeMap<AddressKey, Message>,
    // (height, key prefix with the low `height` bits cleared) -> hash
    nodes: HashMap<(usize, Hash256), Hash256>,
}

impl MessageMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, height: usize, id: &Hash256) -> Hash256 {
        self.nodes.get(&(height, *id)).copied().unwrap_or(EMPTY_SUBTREES[height])
    }

    fn store(&mut self, height: usize, id: Hash256, h: Hash256) {
        if h == EMPTY_SUBTREES[height] {
            self.nodes.remove(&(height, id));
        } else {
            self.nodes.insert((height, id), h);
        }
    }

    /// Write `value` under `key`; writing [`Message::EMPTY`] deletes the entry.
    pub fn set(&mut self, key: AddressKey, value: Message) {
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
        let mut id = key.0;
        let mut h = map_leaf(&key, &value);
        for height in 0..MAP_HEIGHT {
            self.store(height, id, h);
            let pos = MAP_HEIGHT - 1 - height;
            let mut sib_id = id;
            flip(&mut sib_id, pos);
            let sib = self.node(height, &sib_id);
            h = if bit(&id, pos) { parent_hash(&sib, &h) } else { parent_hash(&h, &sib) };
            clear(&mut id, pos);
        }
        self.store(MAP_HEIGHT, id, h);
    }

    #[must_use]
    pub fn get(&self, key: &AddressKey) -> Message {
        self.values.get(key).copied().unwrap_or(Message::EMPTY)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn root(&self) -> Root {
        Root(self.node(MAP_HEIGHT, &[0u8; 32]))
    }

    #[must_use]
    pub fn witness(&self, key: &AddressKey) -> MapWitness {
        let mut path = Box::new([PathNode { sibling: EMPTY_LEAF, is_left: true }; MAP_HEIGHT]);
        let mut id = key.0;
        for (height, node) in path.iter_mut().enumerate() {
            let pos = MAP_HEIGHT - 1 - height;
            let mut sib_id = id;
            flip(&mut sib_id, pos);
            *node = PathNode { sibling: self.node(height, &sib_id), is_left: !bit(&id, pos) };
            clear(&mut id, pos);
        }
        MapWitness::new(path)
    }
}

/// Rebuild a boxed fixed-height path from a decoded vector.
pub(crate) fn boxed_path(nodes: Vec<PathNode>) -> Result<Box<[PathNode; MAP_HEIGHT]>, CodecError> {
    let got = nodes.len();
    nodes
        .into_boxed_slice()
        .try_into()
        .map_err(|_| CodecError::InvalidLength { expected: MAP_HEIGHT, got })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(b: u8) -> AddressKey {
        let mut k = [b; 32];
        k[0] = b.rotate_left(3);
        AddressKey(k)
    }

    #[test]
    fn empty_map_root_matches_holder() {
        assert_eq!(MessageMap::new().root(), empty_map_root());
    }

    #[test]
    fn witness_key_round_trips() {
        let map = MessageMap::new();
        for b in [0u8, 1, 0x80, 0xFF, 0x5A] {
            assert_eq!(map.witness(&key(b)).key(), key(b));
        }
    }

    #[test]
    fn key_is_invariant_under_value() {
        let mut map = MessageMap::new();
        map.set(key(1), Message::from(4u64));
        let w = map.witness(&key(2));
        let (_, k1) = compute_root_and_key(&w, &Message::from(1u64));
        let (_, k2) = compute_root_and_key(&w, &Message::from(0b10_0000u64));
        let (_, k3) = compute_root_and_key(&w, &Message::EMPTY);
        assert_eq!(k1, key(2));
        assert_eq!(k1, k2);
        assert_eq!(k2, k3);
    }

    #[test]
    fn witness_proves_current_and_next_value() {
        let mut map = MessageMap::new();
        map.set(key(1), Message::from(7u64));
        map.set(key(2), Message::from(8u64));
        let w = map.witness(&key(2));
        assert_eq!(compute_root_and_key(&w, &Message::from(8u64)).0, map.root());
        let (next, _) = compute_root_and_key(&w, &Message::from(9u64));
        map.set(key(2), Message::from(9u64));
        assert_eq!(next, map.root());
        assert_eq!(map.get(&key(2)), Message::from(9u64));
    }

    #[test]
    fn deleting_restores_empty_root() {
        let mut map = MessageMap::new();
        map.set(key(3), Message::from(1u64));
        assert_ne!(map.root(), empty_map_root());
        map.set(key(3), Message::EMPTY);
        assert_eq!(map.root(), empty_map_root());
        assert!(map.is_empty());
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut a = MessageMap::new();
        let mut b = MessageMap::new();
        a.set(key(1), Message::from(1u64));
        a.set(key(2), Message::from(2u64));
        b.set(key(2), Message::from(2u64));
        b.set(key(1), Message::from(1u64));
        assert_eq!(a.root(), b.root());
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn boxed_path_rejects_wrong_height() {
        let node = PathNode { sibling: EMPTY_LEAF, is_left: true };
        assert!(boxed_path(vec![node; MAP_HEIGHT]).is_ok());
        assert_eq!(
            boxed_path(vec![node; 3]),
            Err(CodecError::InvalidLength { expected: MAP_HEIGHT, got: 3 })
        );
    }
}
