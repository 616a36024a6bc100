use thiserror::Error;

/// Refusal categories surfaced to callers deciding whether to rebuild witnesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalKind {
    PreconditionViolation,
    CapacityExceeded,
    ValidityRejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("salt already bootstrapped")]
    AlreadyBootstrapped,

    #[error("salt not bootstrapped")]
    NotBootstrapped,

    #[error("salt pre-image does not match commitment")]
    SaltMismatch,

    #[error("address registry full: capacity {capacity}")]
    CapacityExceeded { capacity: u8 },

    #[error("message counter exhausted")]
    MessageCounterExhausted,

    #[error("address not registered at witnessed slot")]
    NotRegistered,

    #[error("map witness key does not match sender address key")]
    KeyMismatch,

    #[error("message rejected: low bits {low_bits:#08b} match no accepted flag")]
    ValidityRejected { low_bits: u32 },

    #[error("commitments changed since snapshot")]
    StaleCommitment,

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

impl AdmissionError {
    /// Category of a transition refusal. Configuration errors never reach a transition
    /// and are reported as precondition violations.
    #[must_use]
    pub const fn kind(&self) -> RefusalKind {
        match self {
            Self::CapacityExceeded { .. } | Self::MessageCounterExhausted => {
                RefusalKind::CapacityExceeded
            }
            Self::ValidityRejected { .. } => RefusalKind::ValidityRejected,
            Self::AlreadyBootstrapped
            | Self::NotBootstrapped
            | Self::SaltMismatch
            | Self::NotRegistered
            | Self::KeyMismatch
            | Self::StaleCommitment
            | Self::InvalidConfig(_) => RefusalKind::PreconditionViolation,
        }
    }
}

/// Off-core collection and witness transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("slot out of range: {index} not in [0, {max})")]
    SlotOutOfRange { index: usize, max: usize },

    #[error("decode error: {0}")]
    DecodeError(&'static str),
}
