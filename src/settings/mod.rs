use std::path::{Path, PathBuf};

pub const DEFAULT_DIR: &str = "config";
pub const LEDGER_FILE: &str = "invitedby.json";
pub const CONFIG_FILE: &str = "invitedby-config.json";

/// Where the ledger and the reward config live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub ledger_path: PathBuf,
    pub config_path: PathBuf,
}

impl Settings {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            ledger_path: dir.join(LEDGER_FILE),
            config_path: dir.join(CONFIG_FILE),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_server_config_dir() {
        let settings = Settings::default();
        assert_eq!(settings.ledger_path, Path::new("config/invitedby.json"));
        assert_eq!(settings.config_path, Path::new("config/invitedby-config.json"));
    }
}
