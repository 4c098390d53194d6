//! The `/invitedby` command surface: four operations behind permission
//! gates, answering with the lines shown to whoever ran the command.

use tracing::{debug, warn};

use crate::{
    admin::InfoResult,
    host::{CommandSource, Host, LEVEL_ADMIN, LEVEL_USE, PERMISSION_ADMIN, PERMISSION_USE},
    identity::PlayerId,
    ledger::LedgerError,
    service::InvitedBy,
};

pub const MSG_DENIED: &str = "You do not have permission to use this command.";
pub const MSG_NO_PLAYER: &str = "No player was found.";
pub const MSG_ALREADY_DECLARED: &str = "You have already declared who invited you.";
pub const MSG_SELF_INVITE: &str = "You cannot invite yourself.";
pub const MSG_REGISTERED: &str = "Invitation registered. Rewards granted!";
pub const MSG_RELOADED: &str = "InvitedBy config reloaded.";
pub const MSG_NOT_SAVED: &str = "Warning: invite data could not be saved to disk.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// The source declares `inviter` as the player who invited them.
    Register { inviter: PlayerId },
    Reload,
    Reset { target: PlayerId },
    Info { target: PlayerId },
}

impl Request {
    fn permission(&self) -> (&'static str, u8) {
        match self {
            Request::Register { .. } => (PERMISSION_USE, LEVEL_USE),
            Request::Reload | Request::Reset { .. } | Request::Info { .. } => {
                (PERMISSION_ADMIN, LEVEL_ADMIN)
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feedback {
    pub success: bool,
    pub lines: Vec<String>,
}

impl Feedback {
    fn ok(line: impl Into<String>) -> Self {
        Self {
            success: true,
            lines: vec![line.into()],
        }
    }

    fn error(line: impl Into<String>) -> Self {
        Self {
            success: false,
            lines: vec![line.into()],
        }
    }

    fn warn_if(mut self, not_saved: bool) -> Self {
        if not_saved {
            self.lines.push(MSG_NOT_SAVED.to_string());
        }
        self
    }
}

pub fn dispatch(
    service: &InvitedBy,
    host: Host<'_>,
    source: &CommandSource,
    request: Request,
) -> Feedback {
    let (permission, level) = request.permission();
    if !host.authorization.check(&source.actor, permission, level) {
        debug!(actor = %source.actor, permission, "command denied");
        return Feedback::error(MSG_DENIED);
    }

    match request {
        Request::Register { inviter } => register(service, host, source, &inviter),
        Request::Reload => {
            service.reload_config();
            Feedback::ok(MSG_RELOADED)
        }
        Request::Reset { target } => {
            let name = host.directory.display_name(&target);
            match service.remove(&target) {
                Some(durability) => Feedback::ok(format!("Reset invite status for {name}"))
                    .warn_if(!durability.is_saved()),
                None => Feedback::error(format!("Player {name} has no invite status.")),
            }
        }
        Request::Info { target } => {
            let name = host.directory.display_name(&target);
            match service.info(host.directory, &target) {
                InfoResult::Declared { inviter_name, .. } => {
                    Feedback::ok(format!("{name} was invited by {inviter_name}"))
                }
                InfoResult::NotDeclared => Feedback::ok(format!("{name} has not declared an inviter.")),
            }
        }
    }
}

fn register(
    service: &InvitedBy,
    host: Host<'_>,
    source: &CommandSource,
    inviter: &PlayerId,
) -> Feedback {
    let Some(inviter) = host.directory.find_online(inviter) else {
        return Feedback::error(MSG_NO_PLAYER);
    };

    let plan = match service.register(
        &source.actor,
        &source.display_name,
        &inviter.id,
        &inviter.display_name,
    ) {
        Ok(plan) => plan,
        Err(LedgerError::AlreadyRegistered) => return Feedback::error(MSG_ALREADY_DECLARED),
        Err(LedgerError::SelfInvitation) => return Feedback::error(MSG_SELF_INVITE),
    };

    let feedback = Feedback::ok(MSG_REGISTERED).warn_if(!plan.durable);
    for command in plan.commands() {
        if let Err(err) = host.executor.execute(source, command) {
            warn!(%err, "reward command failed");
        }
    }
    feedback
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use parking_lot::Mutex;

    use super::*;
    use crate::{
        codec,
        error::ExecutorError,
        host::{Authorization, CommandExecutor, LiveSession, PlayerDirectory},
        rewards::RewardConfig,
        settings::Settings,
    };

    #[derive(Default)]
    struct FakeServer {
        names: BTreeMap<PlayerId, String>,
        online: Vec<PlayerId>,
        levels: BTreeMap<PlayerId, u8>,
        ran: Mutex<Vec<(PlayerId, String)>>,
        fail_on: Option<String>,
    }

    impl FakeServer {
        fn with_player(mut self, id: &str, name: &str, online: bool, level: u8) -> Self {
            self.names.insert(id.into(), name.into());
            self.levels.insert(id.into(), level);
            if online {
                self.online.push(id.into());
            }
            self
        }

        fn host(&self) -> Host<'_> {
            Host {
                directory: self,
                authorization: self,
                executor: self,
            }
        }

        fn ran(&self) -> Vec<String> {
            self.ran.lock().iter().map(|(_, cmd)| cmd.clone()).collect()
        }
    }

    impl PlayerDirectory for FakeServer {
        fn display_name(&self, id: &PlayerId) -> String {
            self.names.get(id).cloned().unwrap_or_else(|| id.to_string())
        }

        fn find_online(&self, id: &PlayerId) -> Option<LiveSession> {
            self.online.contains(id).then(|| LiveSession {
                id: id.clone(),
                display_name: self.display_name(id),
            })
        }
    }

    impl Authorization for FakeServer {
        fn check(&self, actor: &PlayerId, _permission: &str, min_level: u8) -> bool {
            self.levels.get(actor).copied().unwrap_or(0) >= min_level
        }
    }

    impl CommandExecutor for FakeServer {
        fn execute(&self, source: &CommandSource, command: &str) -> Result<(), ExecutorError> {
            self.ran.lock().push((source.actor.clone(), command.to_string()));
            if self.fail_on.as_deref() == Some(command) {
                return Err(ExecutorError {
                    command: command.to_string(),
                    reason: "unknown item".into(),
                });
            }
            Ok(())
        }
    }

    fn server() -> FakeServer {
        FakeServer::default()
            .with_player("alice", "Alice", true, 0)
            .with_player("bob", "Bob", true, 0)
            .with_player("carol", "Carol", false, 0)
            .with_player("op", "Op", true, 2)
    }

    fn start(dir: &tempfile::TempDir) -> InvitedBy {
        let settings = Settings::in_dir(dir.path());
        codec::save_config(
            &settings.config_path,
            &RewardConfig {
                invited_commands: vec!["give %player% emerald 3".into()],
                inviter_commands: vec![
                    "give %player% diamond 1".into(),
                    "tell %player% thanks".into(),
                ],
            },
        )
        .unwrap();
        InvitedBy::start(settings)
    }

    fn alice() -> CommandSource {
        CommandSource::new("alice", "Alice")
    }

    fn op() -> CommandSource {
        CommandSource::new("op", "Op")
    }

    #[test]
    fn register_runs_rewards_in_plan_order() {
        let dir = tempfile::tempdir().unwrap();
        let service = start(&dir);
        let server = server();

        let feedback = dispatch(
            &service,
            server.host(),
            &alice(),
            Request::Register { inviter: "bob".into() },
        );
        assert_eq!(feedback, Feedback::ok(MSG_REGISTERED));
        assert_eq!(
            server.ran(),
            vec!["give Alice emerald 3", "give Bob diamond 1", "tell Bob thanks"]
        );
        assert!(server.ran.lock().iter().all(|(actor, _)| actor == &alice().actor));
    }

    #[test]
    fn register_rejections_run_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let service = start(&dir);
        let server = server();
        let host = server.host();

        let own = dispatch(&service, host, &alice(), Request::Register { inviter: "alice".into() });
        assert_eq!(own, Feedback::error(MSG_SELF_INVITE));

        let offline = dispatch(&service, host, &alice(), Request::Register { inviter: "carol".into() });
        assert_eq!(offline, Feedback::error(MSG_NO_PLAYER));
        assert!(server.ran().is_empty());

        dispatch(&service, host, &alice(), Request::Register { inviter: "bob".into() });
        let again = dispatch(&service, host, &alice(), Request::Register { inviter: "op".into() });
        assert_eq!(again, Feedback::error(MSG_ALREADY_DECLARED));
        assert_eq!(server.ran().len(), 3);
    }

    #[test]
    fn failing_reward_command_does_not_stop_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let service = start(&dir);
        let server = FakeServer {
            fail_on: Some("give Alice emerald 3".into()),
            ..server()
        };

        let feedback = dispatch(
            &service,
            server.host(),
            &alice(),
            Request::Register { inviter: "bob".into() },
        );
        assert!(feedback.success);
        assert_eq!(server.ran().len(), 3);
    }

    #[test]
    fn admin_operations_need_admin_level() {
        let dir = tempfile::tempdir().unwrap();
        let service = start(&dir);
        let server = server();
        let host = server.host();

        for request in [
            Request::Reload,
            Request::Reset { target: "bob".into() },
            Request::Info { target: "bob".into() },
        ] {
            assert_eq!(dispatch(&service, host, &alice(), request), Feedback::error(MSG_DENIED));
        }
        assert!(dispatch(&service, host, &op(), Request::Reload).success);
    }

    #[test]
    fn info_and_reset_messages() {
        let dir = tempfile::tempdir().unwrap();
        let service = start(&dir);
        let server = server();
        let host = server.host();

        let info = dispatch(&service, host, &op(), Request::Info { target: "alice".into() });
        assert_eq!(info, Feedback::ok("Alice has not declared an inviter."));

        dispatch(&service, host, &alice(), Request::Register { inviter: "bob".into() });
        let info = dispatch(&service, host, &op(), Request::Info { target: "alice".into() });
        // ids here are not uuids, so the inviter cannot be resolved
        assert_eq!(info, Feedback::ok("Alice was invited by Unknown (offline)"));

        let reset = dispatch(&service, host, &op(), Request::Reset { target: "alice".into() });
        assert_eq!(reset, Feedback::ok("Reset invite status for Alice"));
        let reset = dispatch(&service, host, &op(), Request::Reset { target: "alice".into() });
        assert_eq!(reset, Feedback::error("Player Alice has no invite status."));
    }

    #[test]
    fn unsaved_registration_warns() {
        let dir = tempfile::tempdir().unwrap();
        let service = InvitedBy::start(Settings {
            ledger_path: dir.path().to_path_buf(),
            config_path: dir.path().join("invitedby-config.json"),
        });
        let server = server();

        let feedback = dispatch(
            &service,
            server.host(),
            &alice(),
            Request::Register { inviter: "bob".into() },
        );
        assert!(feedback.success);
        assert_eq!(feedback.lines, vec![MSG_REGISTERED, MSG_NOT_SAVED]);

        let reset = dispatch(&service, server.host(), &op(), Request::Reset { target: "alice".into() });
        assert!(reset.success);
        assert_eq!(reset.lines, vec!["Reset invite status for Alice", MSG_NOT_SAVED]);
    }
}
