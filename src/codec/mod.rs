//! JSON persistence for the invite ledger and the reward config.
//!
//! Reads never fail: a missing file is an empty ledger (or no config), and a
//! corrupt file is logged and treated the same way. Writes go to a temp file
//! in the target directory which is then renamed over the target, so readers
//! only ever see a complete old or new document.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::Path,
};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{error::CodecError, identity::PlayerId, rewards::RewardConfig};

/// Invitee -> inviter, as laid out in the ledger file.
pub type LedgerEntries = BTreeMap<PlayerId, PlayerId>;

pub fn load_ledger(path: &Path) -> LedgerEntries {
    match read_json::<Option<LedgerEntries>>(path) {
        Ok(Some(Some(entries))) => entries,
        Ok(Some(None)) => LedgerEntries::new(),
        Ok(None) => {
            debug!(path = %path.display(), "no invite ledger on disk yet");
            LedgerEntries::new()
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "invite ledger unreadable, starting empty");
            LedgerEntries::new()
        }
    }
}

pub fn save_ledger(path: &Path, entries: &LedgerEntries) -> Result<(), CodecError> {
    write_json(path, entries)
}

pub fn load_config(path: &Path) -> Option<RewardConfig> {
    match read_json::<Option<RewardConfig>>(path) {
        Ok(found) => found.flatten(),
        Err(err) => {
            warn!(path = %path.display(), %err, "reward config unreadable");
            None
        }
    }
}

pub fn save_config(path: &Path, config: &RewardConfig) -> Result<(), CodecError> {
    write_json(path, config)
}

/// `Ok(None)` when the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CodecError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CodecError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let json = serde_json::to_vec_pretty(value)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
