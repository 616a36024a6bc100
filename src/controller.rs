//! Orchestration of the three transitions over a shared [`CommitmentStore`].
//!
//! Callers pass the snapshot their witnesses were built against. The pure transition
//! runs outside the lock and the result is committed with a single compare-and-swap.
//! A snapshot that is no longer current at commit time is refused with
//! [`AdmissionError::StaleCommitment`]; nothing is merged or retried here.

use ed25519_dalek::VerifyingKey;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::AdmissionConfig,
    errors::AdmissionError,
    events::{EventLog, EventRecord},
    map::MapWitness,
    predicate::MessageFlag,
    state::CommitmentStore,
    transitions::{self, Registration, Submission},
    tree::TreeWitness,
    types::{Message, Root, Salt},
};

#[derive(Debug, Default)]
struct Ledger {
    store: CommitmentStore,
    log: EventLog,
}

#[derive(Debug)]
pub struct AdmissionController {
    config: AdmissionConfig,
    ledger: Mutex<Ledger>,
}

fn refuse(op: &'static str, err: AdmissionError) -> AdmissionError {
    warn!(op, error = %err, kind = ?err.kind(), "transition refused");
    err
}

impl AdmissionController {
    /// Controller at genesis.
    ///
    /// # Errors
    ///
    /// Returns `AdmissionError::InvalidConfig` if `config` fails validation.
    pub fn new(config: AdmissionConfig) -> Result<Self, AdmissionError> {
        config.validate()?;
        Ok(Self { config, ledger: Mutex::new(Ledger::default()) })
    }

    #[must_use]
    pub const fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Copy of the five committed scalars.
    #[must_use]
    pub fn commitments(&self) -> CommitmentStore {
        self.ledger.lock().store
    }

    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.ledger.lock().store.is_bootstrapped()
    }

    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.ledger.lock().log.records().to_vec()
    }

    /// Events with sequence number `>= from`.
    #[must_use]
    pub fn events_since(&self, from: u64) -> Vec<EventRecord> {
        self.ledger.lock().log.since(from).to_vec()
    }

    /// Swap in `next` iff the store still equals `expected`; append the submission
    /// events in the same critical section.
    fn commit(
        &self,
        expected: &CommitmentStore,
        next: CommitmentStore,
        emitted: Option<(VerifyingKey, Message)>,
    ) -> Result<(), AdmissionError> {
        let mut ledger = self.ledger.lock();
        if ledger.store != *expected {
            return Err(AdmissionError::StaleCommitment);
        }
        ledger.store = next;
        if let Some((address, message)) = emitted {
            ledger.log.append_submission(address, message);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AlreadyBootstrapped`, or `StaleCommitment` if another call committed first.
    pub fn bootstrap(&self, salt: &Salt) -> Result<(), AdmissionError> {
        let snapshot = self.commitments();
        let next = transitions::bootstrap(&snapshot, salt).map_err(|e| refuse("bootstrap", e))?;
        self.commit(&snapshot, next, None).map_err(|e| refuse("bootstrap", e))?;
        info!("salt commitment initialized");
        Ok(())
    }

    /// Register against `expected`, the commitments the caller's tree copy (and so
    /// `witness`) reflects. Returns the new address root.
    ///
    /// # Errors
    ///
    /// See [`transitions::register`]; `StaleCommitment` if `expected` is no longer current.
    pub fn register(
        &self,
        expected: &CommitmentStore,
        salt: &Salt,
        witness: &TreeWitness,
        address: &VerifyingKey,
    ) -> Result<Root, AdmissionError> {
        let reg = Registration { salt, witness, address };
        let next = transitions::register(expected, &self.config, &reg)
            .map_err(|e| refuse("register", e))?;
        self.commit(expected, next, None).map_err(|e| refuse("register", e))?;
        info!(
            slot = witness.index(),
            counter = next.address_counter,
            root = %next.address_root,
            "address registered"
        );
        Ok(next.address_root)
    }

    /// Submit against `expected`, the commitments the witnesses were built for.
    ///
    /// Neither the old map value nor the old tree content is recomputed, so `expected`
    /// is what ties the witnesses to the committed roots.
    ///
    /// # Errors
    ///
    /// See [`transitions::submit`]; `StaleCommitment` if `expected` is no longer current.
    pub fn submit(
        &self,
        expected: &CommitmentStore,
        address: &VerifyingKey,
        tree_witness: &TreeWitness,
        message: &Message,
        map_witness: &MapWitness,
    ) -> Result<MessageFlag, AdmissionError> {
        let sub = Submission { address, tree_witness, message, map_witness };
        let (next, flag) = transitions::submit(expected, &sub).map_err(|e| refuse("submit", e))?;
        self.commit(expected, next, Some((*address, *message)))
            .map_err(|e| refuse("submit", e))?;
        debug!(
            ?flag,
            counter = next.message_counter,
            root = %next.message_root,
            "message accepted"
        );
        Ok(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::RefusalKind,
        events::Event,
        map::MessageMap,
        tree::AddressTree,
        types::AddressKey,
    };
    use ed25519_dalek::SigningKey;
    use std::sync::Arc;

    fn vk(b: u8) -> VerifyingKey {
        SigningKey::from_bytes(&[b; 32]).verifying_key()
    }

    fn setup(salt: &Salt, a: &VerifyingKey) -> (AdmissionController, AddressTree, TreeWitness) {
        let ctl = AdmissionController::new(AdmissionConfig::default()).unwrap();
        ctl.bootstrap(salt).unwrap();
        let mut tree = AddressTree::new();
        tree.set_leaf(0, AddressKey::of(a)).unwrap();
        let w = tree.witness(0).unwrap();
        ctl.register(&ctl.commitments(), salt, &w, a).unwrap();
        (ctl, tree, w)
    }

    #[test]
    fn stale_snapshot_is_refused_without_effect() {
        let salt = Salt([1u8; 32]);
        let a = vk(1);
        let (ctl, _tree, tw) = setup(&salt, &a);
        let stale = ctl.commitments();

        let mut map = MessageMap::new();
        let key = AddressKey::of(&a);
        let m1 = Message::from(4u64);
        let w1 = map.witness(&key);
        ctl.submit(&stale, &a, &tw, &m1, &w1).unwrap();
        map.set(key, m1);

        // Second writer built its witness against the same, now superseded, snapshot.
        let m2 = Message::from(32u64);
        let after_first = ctl.commitments();
        let err = ctl.submit(&stale, &a, &tw, &m2, &w1).unwrap_err();
        assert_eq!(err, AdmissionError::StaleCommitment);
        assert_eq!(err.kind(), RefusalKind::PreconditionViolation);
        assert_eq!(ctl.commitments(), after_first);
        assert_eq!(ctl.events().len(), 2);
    }

    #[test]
    fn refused_submit_emits_nothing() {
        let salt = Salt([1u8; 32]);
        let a = vk(1);
        let (ctl, _tree, tw) = setup(&salt, &a);
        let before = ctl.commitments();
        let mw = MessageMap::new().witness(&AddressKey::of(&a));
        let err = ctl.submit(&before, &a, &tw, &Message::from(0b11_1111u64), &mw).unwrap_err();
        assert_eq!(err.kind(), RefusalKind::ValidityRejected);
        assert_eq!(ctl.commitments(), before);
        assert!(ctl.events().is_empty());
    }

    #[test]
    fn events_carry_exact_inputs() {
        let salt = Salt([1u8; 32]);
        let a = vk(1);
        let (ctl, _tree, tw) = setup(&salt, &a);
        let m = Message::from((7u128 << 100) | 0b01_1000);
        let mw = MessageMap::new().witness(&AddressKey::of(&a));
        let st = ctl.commitments();
        assert_eq!(ctl.submit(&st, &a, &tw, &m, &mw), Ok(MessageFlag::Middle));
        let ev: Vec<Event> = ctl.events().into_iter().map(|r| r.event).collect();
        assert_eq!(ev, vec![Event::Sender(a), Event::MessageReceived(m)]);
        assert_eq!(ctl.events_since(1).len(), 1);
    }

    #[test]
    fn concurrent_registrations_from_one_snapshot_admit_one() {
        let salt = Salt([1u8; 32]);
        let ctl = Arc::new(AdmissionController::new(AdmissionConfig::default()).unwrap());
        ctl.bootstrap(&salt).unwrap();
        let snapshot = ctl.commitments();
        let mut handles = Vec::new();
        for t in 0..4u8 {
            let ctl = Arc::clone(&ctl);
            handles.push(std::thread::spawn(move || {
                let a = vk(t + 1);
                let mut tree = AddressTree::new();
                tree.set_leaf(usize::from(t), AddressKey::of(&a)).unwrap();
                let w = tree.witness(usize::from(t)).unwrap();
                match ctl.register(&snapshot, &salt, &w, &a) {
                    Ok(_) => 1u32,
                    Err(AdmissionError::StaleCommitment) => 0,
                    Err(e) => panic!("unexpected refusal: {e}"),
                }
            }));
        }
        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 1);
        assert_eq!(ctl.commitments().address_counter, 1);
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(AdmissionController::new(AdmissionConfig { capacity: 0 }).is_err());
    }
}
