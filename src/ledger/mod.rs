use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    codec::{self, LedgerEntries},
    error::CodecError,
    identity::PlayerId,
};

pub type InviteeId = PlayerId;
pub type InviterId = PlayerId;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invitee has already declared an inviter")]
    AlreadyRegistered,
    #[error("a player cannot invite themselves")]
    SelfInvitation,
}

/// Whether a mutation reached the ledger file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Durability {
    Saved,
    /// The write failed; only the in-memory mapping has the change.
    MemoryOnly,
}

impl Durability {
    pub fn is_saved(self) -> bool {
        self == Durability::Saved
    }
}

struct LedgerState {
    entries: LedgerEntries,
    durable: bool,
}

/// Invitee -> inviter mapping backed by a JSON file.
///
/// Every read and write goes through one lock, which is also held while the
/// file is rewritten, so the check-then-insert in [`Ledger::register`] and
/// the write that follows it are one step as far as other callers can tell.
pub struct Ledger {
    path: PathBuf,
    state: Mutex<LedgerState>,
}

impl Ledger {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = codec::load_ledger(&path);
        entries.retain(|invitee, inviter| {
            let keep = invitee != inviter;
            if !keep {
                warn!(%invitee, "dropping stored self-invitation");
            }
            keep
        });
        info!(path = %path.display(), entries = entries.len(), "invite ledger loaded");
        Self {
            path,
            state: Mutex::new(LedgerState {
                entries,
                durable: true,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_inviter(&self, invitee: &InviteeId) -> bool {
        self.state.lock().entries.contains_key(invitee)
    }

    pub fn inviter_of(&self, invitee: &InviteeId) -> Option<InviterId> {
        let inviter = self.state.lock().entries.get(invitee).cloned();
        debug!(%invitee, found = inviter.is_some(), "inviter lookup");
        inviter
    }

    pub fn register(
        &self,
        invitee: &InviteeId,
        inviter: &InviterId,
    ) -> Result<Durability, LedgerError> {
        let mut state = self.state.lock();
        if state.entries.contains_key(invitee) {
            return Err(LedgerError::AlreadyRegistered);
        }
        if invitee == inviter {
            return Err(LedgerError::SelfInvitation);
        }
        state.entries.insert(invitee.clone(), inviter.clone());
        info!(%invitee, %inviter, "invite registered");
        Ok(self.persist(&mut state))
    }

    /// Drops the invitee's entry. Returns whether there was one; nothing is
    /// written when there was not.
    pub fn reset(&self, invitee: &InviteeId) -> bool {
        self.remove(invitee).is_some()
    }

    /// Like [`Ledger::reset`], also reporting whether the removal was saved.
    pub fn remove(&self, invitee: &InviteeId) -> Option<Durability> {
        let mut state = self.state.lock();
        state.entries.remove(invitee)?;
        info!(%invitee, "invite status reset");
        Some(self.persist(&mut state))
    }

    /// False while the last write of the ledger file failed. The in-memory
    /// mapping still holds the mutation.
    pub fn is_durable(&self) -> bool {
        self.state.lock().durable
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn entries(&self) -> LedgerEntries {
        self.state.lock().entries.clone()
    }

    pub fn flush(&self) -> Result<(), CodecError> {
        let mut state = self.state.lock();
        let result = codec::save_ledger(&self.path, &state.entries);
        state.durable = result.is_ok();
        result
    }

    fn persist(&self, state: &mut LedgerState) -> Durability {
        match codec::save_ledger(&self.path, &state.entries) {
            Ok(()) => {
                state.durable = true;
                Durability::Saved
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "invite ledger not saved, change kept in memory only");
                state.durable = false;
                Durability::MemoryOnly
            }
        }
    }
}
