#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

//! commitgate - witness-verified admission over committed collections
//!
//! The crate keeps two collections behind 32-byte roots: a depth-8 registry of
//! participant keys and a sparse per-participant message map. Callers hold the raw
//! content and hand in witnesses; the core recomputes roots, checks them against the
//! committed scalars and commits the next scalars atomically.

// Fixed choices:
// - Hash: SHA3-256, domain-tagged and length-framed
// - Identity: Ed25519 verifying key, keyed as H("commitgate.address.key", pk)
// - Registry: binary tree, depth 8, slot index bound into the leaf
// - Message store: sparse binary tree, one level per key bit (256)
// - Registration cap: 100

pub mod types;
pub mod errors;
pub mod config;
pub mod hashers;
pub mod tree;
pub mod map;
pub mod predicate;
pub mod state;
pub mod events;
pub mod transitions;
pub mod controller;
pub mod ser;
pub mod agent_report;

pub use types::*;
pub use errors::{AdmissionError, CodecError, RefusalKind};
pub use config::AdmissionConfig;
pub use tree::{compute_root, AddressTree, TreeWitness};
pub use map::{compute_root_and_key, empty_map_root, MapWitness, MessageMap};
pub use predicate::{classify, MessageFlag};
pub use state::{CommitmentStore, SaltState};
pub use events::{Channel, Event, EventLog, EventRecord};
pub use controller::AdmissionController;
pub use agent_report::{AgentReport, ReportDetails, ReportTracker};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: u32 = 1;
