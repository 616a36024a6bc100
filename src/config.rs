use crate::{errors::AdmissionError, types::ADDRESS_CAPACITY};

/// Deployment-time parameters. Tree depth and map height are compile-time constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Maximum number of accepted registrations.
    pub capacity: u8,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self { capacity: ADDRESS_CAPACITY }
    }
}

impl AdmissionConfig {
    /// # Errors
    ///
    /// Returns `AdmissionError::InvalidConfig` for a zero capacity. A `u8` capacity always
    /// fits the tree's slots.
    pub fn validate(&self) -> Result<(), AdmissionError> {
        if self.capacity == 0 {
            return Err(AdmissionError::InvalidConfig("capacity must be non-zero"));
        }
        Ok(())
    }
}
