use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainOutcome {
    /// Every due operation replayed successfully.
    Completed,
    /// Some operations stayed queued or were dead-lettered.
    Partial,
    /// Nothing was due.
    Idle,
    /// The monitor reported `Offline`; nothing was attempted.
    SkippedOffline,
    /// Another drain held the gate; this invocation coalesced into it.
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    pub outcome: DrainOutcome,
    pub attempted: u32,
    pub synced: u32,
    pub retried: u32,
    pub dead_lettered: u32,
}

impl DrainReport {
    pub fn empty(outcome: DrainOutcome) -> Self {
        Self {
            outcome,
            attempted: 0,
            synced: 0,
            retried: 0,
            dead_lettered: 0,
        }
    }
}
