use std::fmt;

use crate::game::state::{GameState, LOSE_THRESHOLD, WIN_THRESHOLD};

/// Classification of a session that played every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Caught,
    Failed,
}

impl Outcome {
    pub fn evaluate(state: &GameState) -> Self {
        if state.player_score >= WIN_THRESHOLD && state.guard_alert <= LOSE_THRESHOLD {
            Outcome::Success
        } else if state.player_score >= WIN_THRESHOLD {
            Outcome::Caught
        } else {
            Outcome::Failed
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS!"),
            Outcome::Caught => write!(f, "CAUGHT!"),
            Outcome::Failed => write!(f, "FAILED."),
        }
    }
}

/// How a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Every scenario was played.
    Concluded(Outcome),
    /// Alert reached the instant-fail threshold.
    Arrested,
    /// No progress and too much alert.
    Stranded,
    /// The player saved mid-session; the snapshot is kept.
    Saved,
}

impl Ending {
    /// Whether the session is over for good and its snapshot can go.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Ending::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(player_score: i64, guard_alert: i64) -> GameState {
        GameState {
            player_score,
            guard_alert,
            ..GameState::default()
        }
    }

    #[test]
    fn test_outcome_boundaries() {
        assert_eq!(Outcome::evaluate(&state(25, 20)), Outcome::Success);
        assert_eq!(Outcome::evaluate(&state(25, 21)), Outcome::Caught);
        assert_eq!(Outcome::evaluate(&state(24, 0)), Outcome::Failed);
    }

    #[test]
    fn test_outcome_low_score_high_alert_is_failed() {
        assert_eq!(Outcome::evaluate(&state(3, 90)), Outcome::Failed);
        assert_eq!(Outcome::evaluate(&state(40, -5)), Outcome::Success);
    }

    #[test]
    fn test_only_saved_keeps_snapshot() {
        assert!(!Ending::Saved.is_terminal());
        assert!(Ending::Arrested.is_terminal());
        assert!(Ending::Stranded.is_terminal());
        assert!(Ending::Concluded(Outcome::Failed).is_terminal());
    }
}
