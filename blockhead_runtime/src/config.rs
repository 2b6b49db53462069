//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! [board]
//! base = 8
//! column_count = 4
//!
//! [session]
//! mode = "subtract"
//! ```
//!
//! Every key is optional; missing keys take the classroom defaults
//! (base 10, three columns, addition).

use std::path::Path;

use blockhead_engine::domain::{BoardConstants, Mode};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub board: BoardConstants,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Operation selected when a session starts.
    #[serde(default = "default_mode")]
    pub mode: Mode,
}

fn default_mode() -> Mode {
    Mode::Add
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
        }
    }
}

impl RuntimeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RuntimeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.board.validate().map_err(|e| {
            RuntimeError::Config(format!("[board] {}", e))
        })
    }
}
