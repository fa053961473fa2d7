use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info};
use thiserror::Error;

use crate::game::content::{Content, Scenario};
use crate::game::input::{read_selection, Selection};
use crate::game::modifiers::{self, Adjustment, Modifier, ModifierRoles};
use crate::game::outcome::{Ending, Outcome};
use crate::game::persistence::{check_consistent, SaveStore};
use crate::game::state::{GameState, INSTANT_FAIL_THRESHOLD, LOSE_THRESHOLD, WIN_THRESHOLD};

// ---------------------------------------------------------------------------
// Single step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Continue,
    Arrested,
    Stranded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub choice: usize,
    pub adjustment: Adjustment,
    pub status: StepStatus,
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("option {choice} does not exist (scenario has {count} options)")]
    ChoiceOutOfRange { choice: usize, count: usize },
    #[error("{counter} overflowed applying option {choice}")]
    Overflow { counter: &'static str, choice: usize },
}

/// Apply one choice to `state`.
///
/// Order: option deltas, then modifiers (which see history without this
/// choice), then the history append, then the termination checks. The index
/// only advances when the session continues. On error `state` is untouched.
pub fn step(
    state: &mut GameState,
    scenario: &Scenario,
    choice: usize,
    roles: &ModifierRoles,
) -> Result<StepReport, StepError> {
    let option = scenario
        .options
        .get(choice)
        .ok_or(StepError::ChoiceOutOfRange {
            choice,
            count: scenario.options.len(),
        })?;

    debug!(
        "Option {choice} deltas: score {:+}, alert {:+}",
        option.player_points, option.guard_points
    );
    let adjustment = modifiers::evaluate(choice, &state.history, roles);
    let overflow = |counter| StepError::Overflow { counter, choice };
    let player_score = state
        .player_score
        .checked_add(option.player_points)
        .and_then(|v| v.checked_add(adjustment.score))
        .ok_or_else(|| overflow("score"))?;
    let guard_alert = state
        .guard_alert
        .checked_add(option.guard_points)
        .and_then(|v| v.checked_add(adjustment.alert))
        .ok_or_else(|| overflow("alert"))?;

    state.player_score = player_score;
    state.guard_alert = guard_alert;
    for modifier in &adjustment.triggered {
        info!("Modifier triggered: {modifier:?}");
    }

    state.history.push(choice);

    let status = if state.guard_alert >= INSTANT_FAIL_THRESHOLD {
        StepStatus::Arrested
    } else if state.player_score == 0 && state.guard_alert > LOSE_THRESHOLD {
        StepStatus::Stranded
    } else {
        state.current_index += 1;
        StepStatus::Continue
    };

    Ok(StepReport {
        choice,
        adjustment,
        status,
    })
}

// ---------------------------------------------------------------------------
// Session loop
// ---------------------------------------------------------------------------

/// One play-through over a fixed scenario sequence. Owns the only GameState.
pub struct Session<'a> {
    content: &'a Content,
    store: &'a SaveStore,
    state: GameState,
}

impl<'a> Session<'a> {
    pub fn new(content: &'a Content, store: &'a SaveStore) -> Self {
        Self {
            content,
            store,
            state: GameState::new(),
        }
    }

    /// Continue from a restored snapshot, replacing the fresh state wholesale.
    pub fn resume(content: &'a Content, store: &'a SaveStore, state: GameState) -> Result<Self> {
        check_consistent(&state, content)
            .with_context(|| format!("cannot resume from {}", store.path().display()))?;
        Ok(Self {
            content,
            store,
            state,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Ending> {
        info!(
            "Session running from scenario {} of {}",
            self.state.scenario_number(),
            self.content.len()
        );

        while let Some(scenario) = self.content.get(self.state.current_index) {
            show_scenario(output, &self.state, scenario)?;

            let choice = match read_selection(input, output, scenario.options.len())? {
                Selection::Choose(choice) => choice,
                Selection::SaveRequested => {
                    self.store.save(&self.state).context("failed to save game")?;
                    writeln!(output, "\n>> GAME SAVED SUCCESSFULLY. Goodbye!")?;
                    return self.finish(Ending::Saved);
                }
            };

            let report = step(&mut self.state, scenario, choice, &self.content.roles)?;
            info!(
                "Scenario {}: chose option {} -> score {}, alert {}",
                self.state.history.len(),
                report.choice + 1,
                self.state.player_score,
                self.state.guard_alert
            );

            if report.adjustment.triggered.contains(&Modifier::HideSuspicion) {
                writeln!(
                    output,
                    ">> The guard gets suspicious of the silent museum. Alert rises!"
                )?;
            }

            let ending = match report.status {
                StepStatus::Continue => continue,
                StepStatus::Arrested => {
                    writeln!(output, "\nGuard: 'Halt! You're under arrest!'")?;
                    Ending::Arrested
                }
                StepStatus::Stranded => {
                    writeln!(
                        output,
                        "\nGuard: 'If you stay here longer, you'll become an exhibit!'"
                    )?;
                    Ending::Stranded
                }
            };
            return self.finish(ending);
        }

        let outcome = Outcome::evaluate(&self.state);
        show_final_report(output, &self.state, outcome)?;
        self.finish(Ending::Concluded(outcome))
    }

    fn finish(&self, ending: Ending) -> Result<Ending> {
        info!(
            "Session ended: {ending:?} (score {}, alert {})",
            self.state.player_score, self.state.guard_alert
        );
        if ending.is_terminal() {
            self.store
                .clear()
                .context("failed to remove finished snapshot")?;
        }
        Ok(ending)
    }
}

fn show_scenario<W: Write>(output: &mut W, state: &GameState, scenario: &Scenario) -> Result<()> {
    writeln!(output, "\n--- SCENARIO {} ---", state.scenario_number())?;
    writeln!(
        output,
        "[Score: {} | Alert: {}]",
        state.player_score, state.guard_alert
    )?;
    writeln!(output, "{}", scenario.prompt)?;
    for (idx, option) in scenario.options.iter().enumerate() {
        writeln!(output, "{}) {}", idx + 1, option.text)?;
    }
    Ok(())
}

fn show_final_report<W: Write>(output: &mut W, state: &GameState, outcome: Outcome) -> Result<()> {
    writeln!(output, "\n--- FINAL REPORT ---")?;
    writeln!(
        output,
        "Player Progress: {}/{WIN_THRESHOLD}",
        state.player_score
    )?;
    writeln!(output, "Guard Alert: {}/{LOSE_THRESHOLD}", state.guard_alert)?;
    writeln!(output, "RESULT: {outcome}")?;
    Ok(())
}
