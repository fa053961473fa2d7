//! History-dependent adjustments applied on top of an option's own deltas.
//!
//! Every rule looks at the chosen option and the history *before* that
//! choice is recorded. Rules are keyed on option roles rather than on what
//! the option text says; content authors keep the two in line.

use serde::Deserialize;

/// Alert added when the player keeps hiding.
pub const HIDE_SUSPICION_PENALTY: i64 = 100;
/// Prior consecutive hides needed before another hide raises suspicion.
pub const HIDE_STREAK_LIMIT: usize = 3;
/// Score added for a third consecutive walk.
pub const STEADY_WALK_BONUS: i64 = 1;

/// Which option index plays which part in every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ModifierRoles {
    pub walk: usize,
    pub hide: usize,
}

impl Default for ModifierRoles {
    fn default() -> Self {
        Self { walk: 0, hide: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Too much hiding: the silence itself gives the player away.
    HideSuspicion,
    /// Sustained movement pays off.
    SteadyWalk,
}

/// Combined result of every rule for one choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustment {
    pub score: i64,
    pub alert: i64,
    pub triggered: Vec<Modifier>,
}

/// Evaluate all rules for `choice` given the history preceding it.
pub fn evaluate(choice: usize, history: &[usize], roles: &ModifierRoles) -> Adjustment {
    let mut adjustment = Adjustment::default();

    if choice == roles.hide && trailing_run(history, roles.hide) >= HIDE_STREAK_LIMIT {
        adjustment.alert += HIDE_SUSPICION_PENALTY;
        adjustment.triggered.push(Modifier::HideSuspicion);
    }

    if choice == roles.walk && trailing_run(history, roles.walk) >= 2 {
        adjustment.score += STEADY_WALK_BONUS;
        adjustment.triggered.push(Modifier::SteadyWalk);
    }

    adjustment
}

/// Length of the run of `option` at the end of `history`.
fn trailing_run(history: &[usize], option: usize) -> usize {
    history
        .iter()
        .rev()
        .take_while(|&&past| past == option)
        .count()
}
