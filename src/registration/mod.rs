use tracing::debug;

use crate::{
    ledger::{InviteeId, InviterId, Ledger, LedgerError},
    rewards::{self, RewardStore},
};

/// Reward commands produced by one successful registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardPlan {
    pub invitee_commands: Vec<String>,
    pub inviter_commands: Vec<String>,
    /// Whether the ledger write behind this registration reached disk.
    pub durable: bool,
}

impl RewardPlan {
    /// Invitee rewards first, then inviter rewards, each in template order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.invitee_commands
            .iter()
            .chain(&self.inviter_commands)
            .map(String::as_str)
    }
}

pub type RegistrationOutcome = Result<RewardPlan, LedgerError>;

/// Records `inviter` for `invitee` and expands both reward lists.
///
/// A rejected registration has no side effects. Names are substituted
/// verbatim.
pub fn register(
    ledger: &Ledger,
    rewards: &RewardStore,
    invitee: &InviteeId,
    invitee_name: &str,
    inviter: &InviterId,
    inviter_name: &str,
) -> RegistrationOutcome {
    let durable = ledger.register(invitee, inviter)?.is_saved();

    let config = rewards.current();
    let plan = RewardPlan {
        invitee_commands: rewards::expand(&config.invited_commands, invitee_name),
        inviter_commands: rewards::expand(&config.inviter_commands, inviter_name),
        durable,
    };
    debug!(
        %invitee,
        %inviter,
        commands = plan.invitee_commands.len() + plan.inviter_commands.len(),
        "rewards expanded"
    );
    Ok(plan)
}
