use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::game::modifiers::ModifierRoles;

/// The content shipped inside the binary.
pub const BUNDLED_SCENARIOS: &str = include_str!("../../assets/scenarios.json");

/// One selectable choice within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioOption {
    pub text: String,
    /// Added to the player's score when chosen. May be zero or negative.
    pub player_points: i64,
    /// Added to the guard's alert when chosen. May be zero or negative.
    pub guard_points: i64,
}

impl ScenarioOption {
    #[cfg(test)]
    pub fn new(text: impl Into<String>, player_points: i64, guard_points: i64) -> Self {
        Self {
            text: text.into(),
            player_points,
            guard_points,
        }
    }
}

/// A single decision point. Identified only by its position in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub prompt: String,
    pub options: Vec<ScenarioOption>,
}

impl Scenario {
    #[cfg(test)]
    pub fn new(prompt: impl Into<String>, options: Vec<ScenarioOption>) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}

/// Where the scenario sequence comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentSource {
    #[default]
    Bundled,
    File(PathBuf),
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => write!(f, "<bundled>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read scenarios from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse scenarios: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario list is empty")]
    Empty,
    #[error("scenario {index} has no options")]
    NoOptions { index: usize },
    #[error("declared {role} role points at option {option}, which no scenario offers")]
    RoleOutOfRange { role: &'static str, option: usize },
}

/// Both accepted file layouts: a bare scenario array, or scenarios with
/// explicitly declared option roles.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentFile {
    Plain(Vec<Scenario>),
    WithRoles {
        roles: ModifierRoles,
        scenarios: Vec<Scenario>,
    },
}

/// The immutable scenario sequence plus the option roles the modifiers use.
#[derive(Debug, Clone)]
pub struct Content {
    pub scenarios: Vec<Scenario>,
    pub roles: ModifierRoles,
}

impl Content {
    pub fn new(scenarios: Vec<Scenario>, roles: ModifierRoles) -> Result<Self, ContentError> {
        let content = Self { scenarios, roles };
        content.validate()?;
        Ok(content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        match serde_json::from_str(json)? {
            ContentFile::Plain(scenarios) => Self::new(scenarios, ModifierRoles::default()),
            ContentFile::WithRoles { roles, scenarios } => {
                let content = Self::new(scenarios, roles)?;
                content.check_declared_roles()?;
                Ok(content)
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        debug!("Reading scenarios from {}", path.display());
        let json = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load from the configured source. Any failure here is fatal to startup.
    pub fn load(source: &ContentSource) -> Result<Self, ContentError> {
        let content = match source {
            ContentSource::Bundled => Self::from_json_str(BUNDLED_SCENARIOS)?,
            ContentSource::File(path) => Self::from_path(path)?,
        };
        info!(
            "Loaded {} scenarios from {source} (walk={}, hide={})",
            content.len(),
            content.roles.walk,
            content.roles.hide
        );
        Ok(content)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    fn validate(&self) -> Result<(), ContentError> {
        if self.is_empty() {
            return Err(ContentError::Empty);
        }
        if let Some(index) = self.scenarios.iter().position(|s| s.options.is_empty()) {
            return Err(ContentError::NoOptions { index });
        }
        Ok(())
    }

    /// Roles a content file names explicitly must exist somewhere. The
    /// positional defaults are not checked: a missing role never fires.
    fn check_declared_roles(&self) -> Result<(), ContentError> {
        let widest = self
            .scenarios
            .iter()
            .map(|s| s.options.len())
            .max()
            .unwrap_or(0);
        for (role, option) in [("walk", self.roles.walk), ("hide", self.roles.hide)] {
            if option >= widest {
                return Err(ContentError::RoleOutOfRange { role, option });
            }
        }
        Ok(())
    }
}
