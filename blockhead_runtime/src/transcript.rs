//! Transcript: the constants and ordered commands of a session,
//! stored as pretty JSON so a lesson can be replayed later.

use std::fs;
use std::path::Path;

use blockhead_engine::domain::BoardConstants;
use blockhead_engine::events::CommandEnvelope;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub constants: BoardConstants,
    pub commands: Vec<CommandEnvelope>,
    /// Answer the replay must arrive at, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
}

impl Transcript {
    pub fn new(constants: BoardConstants, commands: Vec<CommandEnvelope>) -> Self {
        Self {
            constants,
            commands,
            expected_answer: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let transcript: Transcript = serde_json::from_str(&data)?;
        debug!(
            "loaded {} commands from {}",
            transcript.commands.len(),
            path.display()
        );
        Ok(transcript)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
