//! File-backed stand-in for a game server's player list, used by the CLI.
//!
//! ```json
//! { "players": [ { "id": "…uuid…", "name": "Alice", "online": true, "level": 0 } ] }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CodecError, ExecutorError},
    host::{Authorization, CommandExecutor, CommandSource, LiveSession, PlayerDirectory},
    identity::PlayerId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub level: u8,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roster {
    #[serde(default)]
    pub players: Vec<RosterEntry>,
}

impl Roster {
    pub fn load(path: &Path) -> Result<Self, CodecError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn get(&self, id: &PlayerId) -> Option<&RosterEntry> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Matches an id exactly, or a name ignoring case.
    pub fn lookup(&self, key: &str) -> Option<&RosterEntry> {
        self.players
            .iter()
            .find(|p| p.id.as_str() == key)
            .or_else(|| self.players.iter().find(|p| p.name.eq_ignore_ascii_case(key)))
    }
}

impl PlayerDirectory for Roster {
    fn display_name(&self, id: &PlayerId) -> String {
        self.get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn find_online(&self, id: &PlayerId) -> Option<LiveSession> {
        self.get(id).filter(|p| p.online).map(|p| LiveSession {
            id: p.id.clone(),
            display_name: p.name.clone(),
        })
    }
}

impl Authorization for Roster {
    fn check(&self, actor: &PlayerId, _permission: &str, min_level: u8) -> bool {
        let level = self.get(actor).map_or(0, |p| p.level);
        level >= min_level
    }
}

/// Prints each reward command instead of running it.
pub struct PrintExecutor;

impl CommandExecutor for PrintExecutor {
    fn execute(&self, source: &CommandSource, command: &str) -> Result<(), ExecutorError> {
        println!("[{}] /{command}", source.display_name);
        Ok(())
    }
}
