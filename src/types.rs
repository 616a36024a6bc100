use core::fmt;

use commitgate_primitives::{constants::GENESIS_ROOT, ct_eq_hash, Hash256};
use ed25519_dalek::VerifyingKey;
use rand_core::{OsRng, RngCore};

use crate::hashers::address_key;

pub const TREE_DEPTH: usize = 8;                        // address registry depth
pub const TREE_SLOTS: usize = 1 << TREE_DEPTH;          // 256 structural slots
pub const MAP_HEIGHT: usize = 256;                      // one level per key bit
pub const ADDRESS_CAPACITY: u8 = 100;                   // protocol cap on registrations
pub const MESSAGE_FLAG_MASK: u32 = 0b11_1111;           // low 6 bits

/// Fixed-size commitment to a collection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Root(pub Hash256);

impl Root {
    pub const GENESIS: Self = Self(GENESIS_ROOT);

    /// Constant-time comparison.
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        ct_eq_hash(&self.0, &other.0)
    }
}

/// Leaf value in the address registry and key in the message map.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct AddressKey(pub Hash256);

impl AddressKey {
    /// The sentinel held by unoccupied slots.
    pub const EMPTY: Self = Self([0u8; 32]);

    #[must_use]
    pub fn of(address: &VerifyingKey) -> Self {
        address_key(address)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

/// A submitted message, held as a 32-byte big-endian word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Message(pub [u8; 32]);

impl Message {
    /// The value of a key that was never written.
    pub const EMPTY: Self = Self([0u8; 32]);

    /// Low 32 bits of the big-endian word.
    #[must_use]
    pub const fn low_word(&self) -> u32 {
        u32::from_be_bytes([self.0[28], self.0[29], self.0[30], self.0[31]])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

impl From<u64> for Message {
    fn from(v: u64) -> Self {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&v.to_be_bytes());
        Self(out)
    }
}

impl From<u128> for Message {
    fn from(v: u128) -> Self {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&v.to_be_bytes());
        Self(out)
    }
}

/// Administrator secret whose hash gates registration.
#[derive(Clone, Copy)]
pub struct Salt(pub [u8; 32]);

impl Salt {
    #[must_use]
    pub fn random() -> Self {
        let mut out = [0u8; 32];
        OsRng.fill_bytes(&mut out);
        Self(out)
    }
}

// Secrets never print their bytes.
impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(..)")
    }
}

macro_rules! impl_hex_fmt {
    ($t:ty, $name:literal) => {
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }
        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($name, "({})"), hex::encode(self.0))
            }
        }
    };
}
impl_hex_fmt!(Root, "Root");
impl_hex_fmt!(AddressKey, "AddressKey");
impl_hex_fmt!(Message, "Message");

/// One level of an authentication path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathNode {
    pub sibling: Hash256,
    /// The running hash is the left child at this level.
    pub is_left: bool,
}
