use commitgate_primitives::{
    constants::{EMPTY_LEAF, TAG_ADDRESS_KEY, TAG_MAP_LEAF, TAG_SALT, TAG_TREE_LEAF},
    h_tag, le_bytes, Hash256,
};
use ed25519_dalek::VerifyingKey;

use crate::types::{AddressKey, Message, Salt};

/// K = H("commitgate.address.key", pk)
#[must_use]
pub fn address_key(address: &VerifyingKey) -> AddressKey {
    AddressKey(h_tag(TAG_ADDRESS_KEY, &[address.as_bytes()]))
}

/// S = H("commitgate.salt", salt)
#[must_use]
pub fn salt_commitment(salt: &Salt) -> Hash256 {
    h_tag(TAG_SALT, &[&salt.0])
}

/// Registry leaf; the slot index is bound into the hash. Empty slots hash to the sentinel
/// so untouched subtrees stay canonical.
#[must_use]
pub fn tree_leaf(index: usize, value: &AddressKey) -> Hash256 {
    if value.is_empty() {
        return EMPTY_LEAF;
    }
    h_tag(TAG_TREE_LEAF, &[&le_bytes::<2>(index as u128), &value.0])
}

/// Message-map leaf, bound to its key.
#[must_use]
pub fn map_leaf(key: &AddressKey, value: &Message) -> Hash256 {
    if value.is_empty() {
        return EMPTY_LEAF;
    }
    h_tag(TAG_MAP_LEAF, &[&key.0, &value.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use crate::state::SaltState;

    #[test]
    fn address_key_depends_on_key_bytes() {
        let a = SigningKey::from_bytes(&[1u8; 32]).verifying_key();
        let b = SigningKey::from_bytes(&[2u8; 32]).verifying_key();
        assert_eq!(address_key(&a), address_key(&a));
        assert_ne!(address_key(&a), address_key(&b));
        assert!(!address_key(&a).is_empty());
    }

    #[test]
    fn tree_leaf_binds_index() {
        let k = AddressKey([7u8; 32]);
        assert_ne!(tree_leaf(0, &k), tree_leaf(1, &k));
        assert_eq!(tree_leaf(3, &AddressKey::EMPTY), EMPTY_LEAF);
    }

    #[test]
    fn map_leaf_binds_key() {
        let m = Message::from(0b10_0000u64);
        assert_ne!(map_leaf(&AddressKey([1u8; 32]), &m), map_leaf(&AddressKey([2u8; 32]), &m));
        assert_eq!(map_leaf(&AddressKey([1u8; 32]), &Message::EMPTY), EMPTY_LEAF);
    }

    #[test]
    fn salt_commitment_is_not_sentinel() {
        assert_ne!(salt_commitment(&Salt([0u8; 32])), [0u8; 32]);
    }

    // Salts have no equality of their own; they are compared through commitments.
    #[test]
    fn salts_compare_through_commitments() {
        let stored = SaltState::Initialized(salt_commitment(&Salt([4u8; 32])));
        assert!(stored.matches(&salt_commitment(&Salt([4u8; 32]))));
        assert!(!stored.matches(&salt_commitment(&Salt([5u8; 32]))));
        assert_eq!(format!("{:?}", Salt([4u8; 32])), "Salt(..)");
    }
}
