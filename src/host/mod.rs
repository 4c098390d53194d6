//! Seams to the embedding server.
//!
//! The ledger never talks to players directly. Whoever hosts it supplies a
//! [`PlayerDirectory`] for names and online sessions, an [`Authorization`]
//! predicate for permission checks and a [`CommandExecutor`] that runs the
//! expanded reward commands.

use crate::{error::ExecutorError, identity::PlayerId};

pub const PERMISSION_USE: &str = "invitedby.use";
pub const PERMISSION_ADMIN: &str = "invitedby.admin";
pub const LEVEL_USE: u8 = 0;
pub const LEVEL_ADMIN: u8 = 2;

/// A player currently connected to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveSession {
    pub id: PlayerId,
    pub display_name: String,
}

/// Who issued a command. Reward commands run in this context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSource {
    pub actor: PlayerId,
    pub display_name: String,
}

impl CommandSource {
    pub fn new(actor: impl Into<PlayerId>, display_name: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            display_name: display_name.into(),
        }
    }
}

impl From<LiveSession> for CommandSource {
    fn from(session: LiveSession) -> Self {
        Self {
            actor: session.id,
            display_name: session.display_name,
        }
    }
}

pub trait PlayerDirectory: Send + Sync {
    /// Best known name for `id`, online or not.
    fn display_name(&self, id: &PlayerId) -> String;

    fn find_online(&self, id: &PlayerId) -> Option<LiveSession>;
}

pub trait Authorization: Send + Sync {
    fn check(&self, actor: &PlayerId, permission: &str, min_level: u8) -> bool;
}

pub trait CommandExecutor: Send + Sync {
    fn execute(&self, source: &CommandSource, command: &str) -> Result<(), ExecutorError>;
}

/// The three collaborators a command needs, borrowed together.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub directory: &'a dyn PlayerDirectory,
    pub authorization: &'a dyn Authorization,
    pub executor: &'a dyn CommandExecutor,
}
