use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::game::content::Content;
use crate::game::state::GameState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write snapshot {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to remove snapshot {path:?}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot does not match the loaded scenarios: {reason}")]
    Inconsistent { reason: String },
}

/// A single JSON snapshot file holding one GameState.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot. The previous file is only replaced once the new
    /// one is fully on disk.
    pub fn save(&self, state: &GameState) -> Result<(), SnapshotError> {
        let write_err = |source: io::Error| SnapshotError::Write {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_vec(state).map_err(|e| write_err(e.into()))?;
        let tmp = self.tmp_path();
        debug!("Writing snapshot to {}", tmp.display());

        let written = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(&json)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }

        info!(
            "Saved snapshot to {} (scenario {}, score {}, alert {})",
            self.path.display(),
            state.scenario_number(),
            state.player_score,
            state.guard_alert
        );
        Ok(())
    }

    /// `Ok(None)` when there is no snapshot to resume.
    pub fn load(&self) -> Result<Option<GameState>, SnapshotError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(SnapshotError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let state: GameState =
            serde_json::from_slice(&raw).map_err(|source| SnapshotError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Loaded snapshot from {} (scenario {})",
            self.path.display(),
            state.scenario_number()
        );
        Ok(Some(state))
    }

    /// Remove the snapshot. Missing is fine.
    pub fn clear(&self) -> Result<(), SnapshotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed snapshot {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SnapshotError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Check a restored state against the content it is about to be played on.
pub fn check_consistent(state: &GameState, content: &Content) -> Result<(), SnapshotError> {
    let inconsistent = |reason: String| Err(SnapshotError::Inconsistent { reason });

    if state.current_index != state.history.len() {
        return inconsistent(format!(
            "current index {} but {} recorded choices",
            state.current_index,
            state.history.len()
        ));
    }
    if state.current_index > content.len() {
        return inconsistent(format!(
            "current index {} beyond {} scenarios",
            state.current_index,
            content.len()
        ));
    }
    for (index, (&choice, scenario)) in state.history.iter().zip(&content.scenarios).enumerate() {
        if choice >= scenario.options.len() {
            return inconsistent(format!(
                "choice {choice} at scenario {index} but it has {} options",
                scenario.options.len()
            ));
        }
    }
    Ok(())
}
