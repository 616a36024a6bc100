//! Pure state transitions. Each takes a snapshot of the committed scalars and either
//! returns the complete next snapshot or a refusal; nothing is partially applied.

use ed25519_dalek::VerifyingKey;

use crate::{
    config::AdmissionConfig,
    errors::AdmissionError,
    hashers::{address_key, salt_commitment},
    map::{compute_root_and_key, MapWitness},
    predicate::{classify, MessageFlag},
    state::{CommitmentStore, SaltState},
    tree::{compute_root, TreeWitness},
    types::{Message, Salt},
};

/// Registration request from the salt holder.
#[derive(Clone, Copy, Debug)]
pub struct Registration<'a> {
    pub salt: &'a Salt,
    pub witness: &'a TreeWitness,
    pub address: &'a VerifyingKey,
}

/// Message submission from a registered participant.
#[derive(Clone, Copy, Debug)]
pub struct Submission<'a> {
    pub address: &'a VerifyingKey,
    pub tree_witness: &'a TreeWitness,
    pub message: &'a Message,
    pub map_witness: &'a MapWitness,
}

/// Set the salt commitment. Fires once.
///
/// # Errors
///
/// Returns `AdmissionError::AlreadyBootstrapped` if a salt is already committed.
pub fn bootstrap(store: &CommitmentStore, salt: &Salt) -> Result<CommitmentStore, AdmissionError> {
    if store.is_bootstrapped() {
        return Err(AdmissionError::AlreadyBootstrapped);
    }
    Ok(CommitmentStore { salt: SaltState::Initialized(salt_commitment(salt)), ..*store })
}

/// Write the address key into the witnessed slot and bump the counter.
///
/// The prior occupant of the slot is not checked: rewriting identical content leaves the
/// root unchanged but still counts as a registration.
///
/// # Errors
///
/// Returns `CapacityExceeded` at the cap, `NotBootstrapped` before bootstrap and
/// `SaltMismatch` for a wrong pre-image, checked in that order.
pub fn register(
    store: &CommitmentStore,
    config: &AdmissionConfig,
    reg: &Registration<'_>,
) -> Result<CommitmentStore, AdmissionError> {
    if store.address_counter >= config.capacity {
        return Err(AdmissionError::CapacityExceeded { capacity: config.capacity });
    }
    if !store.is_bootstrapped() {
        return Err(AdmissionError::NotBootstrapped);
    }
    if !store.salt.matches(&salt_commitment(reg.salt)) {
        return Err(AdmissionError::SaltMismatch);
    }

    let address_root = compute_root(reg.witness, &address_key(reg.address));
    Ok(CommitmentStore {
        address_root,
        address_counter: store.address_counter + 1,
        ..*store
    })
}

/// Store a message under the sender's key.
/// Steps: membership → key consistency → content validity → counter.
///
/// # Errors
///
/// Returns `NotRegistered`, `KeyMismatch` or `ValidityRejected` for the first failing
/// check, and `MessageCounterExhausted` if the counter cannot advance.
pub fn submit(
    store: &CommitmentStore,
    sub: &Submission<'_>,
) -> Result<(CommitmentStore, MessageFlag), AdmissionError> {
    let key = address_key(sub.address);

    // Membership
    if !compute_root(sub.tree_witness, &key).ct_eq(&store.address_root) {
        return Err(AdmissionError::NotRegistered);
    }
    // Key consistency
    let (message_root, map_key) = compute_root_and_key(sub.map_witness, sub.message);
    if map_key != key {
        return Err(AdmissionError::KeyMismatch);
    }
    // Content
    let flag = classify(sub.message)?;

    let message_counter = store
        .message_counter
        .checked_add(1)
        .ok_or(AdmissionError::MessageCounterExhausted)?;
    Ok((CommitmentStore { message_root, message_counter, ..*store }, flag))
}
