use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::codec;

pub const PLAYER_PLACEHOLDER: &str = "%player%";

/// Reward command templates run after a successful registration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RewardConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inviter_commands: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub invited_commands: Vec<String>,
}

impl RewardConfig {
    pub fn builtin() -> Self {
        Self {
            inviter_commands: vec!["give %player% minecraft:diamond 1".into()],
            invited_commands: vec!["give %player% minecraft:emerald 3".into()],
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Substitutes `display_name` for every placeholder, one command per template.
pub fn expand(templates: &[String], display_name: &str) -> Vec<String> {
    templates
        .iter()
        .map(|template| template.replace(PLAYER_PLACEHOLDER, display_name))
        .collect()
}

/// The live reward config and the file it came from.
pub struct RewardStore {
    path: PathBuf,
    config: RwLock<RewardConfig>,
}

impl RewardStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = read_or_default(&path);
        Self {
            path,
            config: RwLock::new(config),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> RewardConfig {
        self.config.read().clone()
    }

    /// Re-reads the file and swaps the result in. Concurrent reloads queue on
    /// the write lock.
    pub fn reload(&self) -> RewardConfig {
        let mut config = self.config.write();
        *config = read_or_default(&self.path);
        config.clone()
    }
}

fn read_or_default(path: &Path) -> RewardConfig {
    if let Some(config) = codec::load_config(path) {
        info!(
            path = %path.display(),
            invited = config.invited_commands.len(),
            inviter = config.inviter_commands.len(),
            "reward config loaded"
        );
        return config;
    }
    let config = RewardConfig::builtin();
    match codec::save_config(path, &config) {
        Ok(()) => info!(path = %path.display(), "wrote default reward config"),
        Err(err) => warn!(path = %path.display(), %err, "default reward config not saved"),
    }
    config
}
