//! Invite ledger for game servers.
//!
//! Each player may declare, once, which player invited them. The pairing is
//! kept in a JSON ledger that is rewritten after every change, and a
//! successful declaration expands configurable reward commands for both
//! players:
//!
//! * [`ledger`]: the invitee -> inviter mapping and its insert-once rule.
//! * [`codec`]: tolerant JSON load, atomic JSON save.
//! * [`rewards`]: reward templates, defaults, reload and `%player%` expansion.
//! * [`registration`] / [`admin`]: the player and operator operations.
//! * [`service`]: [`InvitedBy`], the owned instance tying it together.
//! * [`commands`]: the permission-gated command surface for a host server.

pub mod admin;
pub mod codec;
pub mod commands;
pub mod host;
pub mod identity;
pub mod ledger;
pub mod registration;
pub mod rewards;
pub mod roster;
pub mod service;
pub mod settings;

mod error;

pub use error::{CodecError, ExecutorError, IdentityError};
pub use identity::PlayerId;
pub use ledger::LedgerError;
pub use service::InvitedBy;
pub use settings::Settings;
