use commitgate_primitives::{ct_eq_hash, Hash256};

use crate::types::Root;

/// One-time secret gate on registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SaltState {
    #[default]
    Uninitialized,
    /// Holds `H(salt)`.
    Initialized(Hash256),
}

impl SaltState {
    /// Whether `commitment` matches the stored one. Always false before bootstrap.
    #[must_use]
    pub fn matches(&self, commitment: &Hash256) -> bool {
        match self {
            Self::Uninitialized => false,
            Self::Initialized(stored) => ct_eq_hash(stored, commitment),
        }
    }
}

/// The five committed scalars. Everything the core knows about both collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CommitmentStore {
    pub address_root: Root,
    pub message_root: Root,
    pub address_counter: u8,
    pub message_counter: u64,
    pub salt: SaltState,
}

impl CommitmentStore {
    /// Genesis: zero roots, zero counters, no salt.
    #[must_use]
    pub fn genesis() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_bootstrapped(&self) -> bool {
        matches!(self.salt, SaltState::Initialized(_))
    }
}
