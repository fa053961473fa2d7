use serde::{Deserialize, Serialize};

/// Final score needed for a non-failing outcome.
pub const WIN_THRESHOLD: i64 = 25;
/// Highest alert that still counts as unseen; also the stranded-fail bound.
pub const LOSE_THRESHOLD: i64 = 20;
/// Alert at or above this ends the session on the spot.
pub const INSTANT_FAIL_THRESHOLD: i64 = 100;

/// Mutable progress of one session. Serialized as-is for snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameState {
    pub player_score: i64,
    pub guard_alert: i64,
    /// Chosen option index per completed step, oldest first.
    pub history: Vec<usize>,
    /// Index of the next scenario to present. Equals `history.len()`.
    #[serde(rename = "current_idx", alias = "current_index")]
    pub current_index: usize,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based scenario number for display.
    pub fn scenario_number(&self) -> usize {
        self.current_index + 1
    }
}
