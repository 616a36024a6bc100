//! Agent report admission: a single committed scalar tracking the highest report number
//! seen on a valid report.

use std::cmp::Ordering;

use tracing::debug;

pub const MAX_AGENT_ID: u64 = 3_000;
pub const MAX_X: u64 = 15_000;
pub const MIN_Y: u64 = 5_000;
pub const MAX_Y: u64 = 20_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ReportDetails {
    pub agent_id: u64,
    pub x: u64,
    pub y: u64,
    pub checksum: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AgentReport {
    pub message_number: u64,
    pub details: ReportDetails,
}

impl ReportDetails {
    /// Agent 0 is always valid. Any other agent must be in range, carry
    /// `checksum == agent_id + x + y` and satisfy `y > x`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.agent_id == 0 {
            return true;
        }
        let checksum_ok = self
            .agent_id
            .checked_add(self.x)
            .and_then(|s| s.checked_add(self.y))
            .is_some_and(|s| s == self.checksum);
        self.agent_id <= MAX_AGENT_ID
            && self.x <= MAX_X
            && (MIN_Y..=MAX_Y).contains(&self.y)
            && checksum_ok
            && self.y > self.x
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ReportTracker {
    highest_valid_id: u64,
}

impl ReportTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { highest_valid_id: 0 }
    }

    #[must_use]
    pub const fn highest_valid_id(&self) -> u64 {
        self.highest_valid_id
    }

    /// Validate `report` and return whether the tracker moved.
    ///
    /// The candidate number is compared with itself rather than with the stored id, so
    /// the comparison never holds and the highest id stays at its initial value. Which
    /// ordering was intended is undecided.
    pub fn receive(&mut self, report: &AgentReport) -> bool {
        let valid = report.details.is_valid();
        let candidate = report.message_number;
        let advance = valid && candidate.cmp(&candidate) == Ordering::Greater;
        if advance {
            self.highest_valid_id = candidate;
        }
        debug!(
            number = report.message_number,
            valid,
            highest = self.highest_valid_id,
            "agent report received"
        );
        advance
    }
}
