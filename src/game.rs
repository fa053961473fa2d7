pub mod content;
pub mod engine;
pub mod input;
pub mod modifiers;
pub mod outcome;
pub mod persistence;
pub mod state;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use content::{Content, ContentSource};
use engine::Session;
use input::read_line;
use outcome::Ending;
use persistence::SaveStore;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub struct GameConfig {
    /// Scenario sequence to play.
    pub content: ContentSource,
    /// Where save-and-quit writes its snapshot, and where Load looks for it.
    pub save_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            content: ContentSource::Bundled,
            save_path: PathBuf::from("savegame.json"),
        }
    }
}

// ---------------------------------------------------------------------------
// Start menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartChoice {
    NewGame,
    LoadGame,
}

fn start_menu<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<StartChoice> {
    writeln!(output, "~~ A THIEF IN THE NIGHT ~~")?;
    writeln!(output, "1. New Game")?;
    writeln!(output, "2. Load Game")?;
    // Anything but "2" starts fresh.
    match read_line(input, output, "\nChoose: ")?.as_str() {
        "2" => Ok(StartChoice::LoadGame),
        _ => Ok(StartChoice::NewGame),
    }
}

/// Build the session the player asked for. A corrupt snapshot is fatal; a
/// missing one falls back to a new game.
fn open_session<'a, W: Write>(
    choice: StartChoice,
    content: &'a Content,
    store: &'a SaveStore,
    output: &mut W,
) -> Result<Session<'a>> {
    if choice == StartChoice::LoadGame {
        match store.load().context("failed to load saved game")? {
            Some(state) => {
                writeln!(
                    output,
                    "\n>> Save loaded! Resuming at Scenario {}...",
                    state.scenario_number()
                )?;
                return Session::resume(content, store, state);
            }
            None => writeln!(output, "\n>> No save file found! Starting new game...")?,
        }
    } else {
        writeln!(output, "\n>> Starting new game...")?;
    }
    info!("Starting a new session");
    Ok(Session::new(content, store))
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Menu, then one session over `content`.
pub fn play<R: BufRead, W: Write>(
    content: &Content,
    store: &SaveStore,
    input: &mut R,
    output: &mut W,
) -> Result<Ending> {
    let choice = start_menu(input, output)?;
    let mut session = open_session(choice, content, store, output)?;
    let ending = session.run(input, output)?;
    info!("Final state: {:?}", session.state());
    Ok(ending)
}

/// Play on the terminal.
pub fn run(content: &Content, config: &GameConfig) -> Result<Ending> {
    let store = SaveStore::new(&config.save_path);
    let stdin = io::stdin();
    let stdout = io::stdout();
    play(content, &store, &mut stdin.lock(), &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::content::{Scenario, ScenarioOption};
    use crate::game::modifiers::ModifierRoles;
    use crate::game::outcome::Outcome;
    use crate::game::state::GameState;
    use std::io::Cursor;

    fn temp_store(name: &str) -> SaveStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();

        SaveStore::new(std::env::temp_dir().join(format!("thief_menu_{name}_{nanos}.json")))
    }

    fn content() -> Content {
        let scenario = Scenario::new(
            "Test Scenario",
            vec![
                ScenarioOption::new("Walk", 4, 4),
                ScenarioOption::new("Hide", 0, 0),
                ScenarioOption::new("Sneak", 2, 1),
            ],
        );
        Content::new(vec![scenario; 3], ModifierRoles::default()).unwrap()
    }

    fn play_script(content: &Content, store: &SaveStore, script: &str) -> (Result<Ending>, String) {
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        let ending = play(content, store, &mut input, &mut output);
        (ending, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_new_game() {
        let content = content();
        let store = temp_store("new_game");
        let (ending, text) = play_script(&content, &store, "1\n1\n3\n3\n");
        assert_eq!(ending.unwrap(), Ending::Concluded(Outcome::Failed));
        assert!(text.starts_with("~~ A THIEF IN THE NIGHT ~~"));
        assert!(text.contains(">> Starting new game..."));
        assert!(text.contains("--- SCENARIO 3 ---"));
    }

    #[test]
    fn test_load_without_snapshot_starts_fresh() {
        let content = content();
        let store = temp_store("load_missing");
        let (ending, text) = play_script(&content, &store, "2\n3\n3\n3\n");
        assert_eq!(ending.unwrap(), Ending::Concluded(Outcome::Failed));
        assert!(text.contains("No save file found"));
        assert!(text.contains("[Score: 0 | Alert: 0]"));
    }

    #[test]
    fn test_load_resumes_snapshot() {
        let content = content();
        let store = temp_store("load_resume");
        store
            .save(&GameState {
                player_score: 8,
                guard_alert: 8,
                history: vec![0, 0],
                current_index: 2,
            })
            .unwrap();

        let (ending, text) = play_script(&content, &store, "2\n1\n");
        assert_eq!(ending.unwrap(), Ending::Concluded(Outcome::Failed));
        assert!(text.contains("Resuming at Scenario 3"));
        assert!(text.contains("[Score: 8 | Alert: 8]"));
        // third walk in a row earns the streak bonus
        assert!(text.contains("Player Progress: 13/25"));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_new_game_ignores_snapshot() {
        let content = content();
        let store = temp_store("new_ignores");
        let saved = GameState {
            player_score: 2,
            guard_alert: 1,
            history: vec![2],
            current_index: 1,
        };
        store.save(&saved).unwrap();

        let (ending, text) = play_script(&content, &store, "1\ns\n");
        assert_eq!(ending.unwrap(), Ending::Saved);
        assert!(text.contains("[Score: 0 | Alert: 0]"));
        assert_eq!(store.load().unwrap(), Some(GameState::new()));

        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_snapshot_is_fatal() {
        let content = content();
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "{\"player_score\": 3}").unwrap();

        let (ending, text) = play_script(&content, &store, "2\n1\n1\n1\n");
        assert!(ending.is_err());
        assert!(!text.contains("--- SCENARIO"));

        store.clear().unwrap();
    }
}
