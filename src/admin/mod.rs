use tracing::debug;

use crate::{
    host::PlayerDirectory,
    identity::PlayerId,
    ledger::{InviterId, Ledger},
    rewards::{RewardConfig, RewardStore},
};

pub const UNKNOWN_INVITER: &str = "Unknown (offline)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InfoResult {
    NotDeclared,
    Declared {
        inviter: InviterId,
        inviter_name: String,
    },
}

/// Who invited `target`, with the inviter's name if they are online.
pub fn info(ledger: &Ledger, directory: &dyn PlayerDirectory, target: &PlayerId) -> InfoResult {
    let Some(inviter) = ledger.inviter_of(target) else {
        return InfoResult::NotDeclared;
    };
    let inviter_name = match inviter.uuid() {
        Ok(_) => directory
            .find_online(&inviter)
            .map(|session| session.display_name),
        Err(err) => {
            debug!(%err, "stored inviter is not a valid identity");
            None
        }
    }
    .unwrap_or_else(|| UNKNOWN_INVITER.to_string());
    InfoResult::Declared {
        inviter,
        inviter_name,
    }
}

pub fn reset(ledger: &Ledger, target: &PlayerId) -> bool {
    ledger.reset(target)
}

pub fn reload_config(rewards: &RewardStore) -> RewardConfig {
    rewards.reload()
}
