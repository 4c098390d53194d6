use tracing::{info, warn};

use crate::{
    admin::{self, InfoResult},
    host::PlayerDirectory,
    identity::PlayerId,
    ledger::{Durability, Ledger},
    registration::{self, RegistrationOutcome},
    rewards::{RewardConfig, RewardStore},
    settings::Settings,
};

/// One running instance: the invite ledger plus the reward config.
///
/// Share it behind an `Arc`; the ledger and the reward store each carry
/// their own lock.
pub struct InvitedBy {
    ledger: Ledger,
    rewards: RewardStore,
}

impl InvitedBy {
    pub fn start(settings: Settings) -> Self {
        let ledger = Ledger::open(settings.ledger_path);
        let rewards = RewardStore::load(settings.config_path);
        info!(
            ledger = %ledger.path().display(),
            config = %rewards.path().display(),
            "invitedby started"
        );
        Self { ledger, rewards }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn rewards(&self) -> &RewardStore {
        &self.rewards
    }

    pub fn register(
        &self,
        invitee: &PlayerId,
        invitee_name: &str,
        inviter: &PlayerId,
        inviter_name: &str,
    ) -> RegistrationOutcome {
        registration::register(
            &self.ledger,
            &self.rewards,
            invitee,
            invitee_name,
            inviter,
            inviter_name,
        )
    }

    pub fn info(&self, directory: &dyn PlayerDirectory, target: &PlayerId) -> InfoResult {
        admin::info(&self.ledger, directory, target)
    }

    pub fn reset(&self, target: &PlayerId) -> bool {
        admin::reset(&self.ledger, target)
    }

    /// [`InvitedBy::reset`] that also says whether the removal was saved.
    pub fn remove(&self, target: &PlayerId) -> Option<Durability> {
        self.ledger.remove(target)
    }

    pub fn reload_config(&self) -> RewardConfig {
        admin::reload_config(&self.rewards)
    }

    /// Retries the ledger write if the last one failed; otherwise the file
    /// already matches memory and is left untouched.
    pub fn shutdown(self) {
        if !self.ledger.is_durable() {
            if let Err(err) = self.ledger.flush() {
                warn!(%err, "invite ledger not saved on shutdown");
                return;
            }
        }
        info!(entries = self.ledger.len(), "invitedby stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{host::LiveSession, ledger::LedgerError};

    struct NobodyOnline;

    impl PlayerDirectory for NobodyOnline {
        fn display_name(&self, id: &PlayerId) -> String {
            id.to_string()
        }

        fn find_online(&self, _id: &PlayerId) -> Option<LiveSession> {
            None
        }
    }

    #[test]
    fn state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let service = InvitedBy::start(Settings::in_dir(dir.path()));
        service
            .register(&"a".into(), "Alice", &"b".into(), "Bob")
            .unwrap();
        service.shutdown();

        let service = InvitedBy::start(Settings::in_dir(dir.path()));
        assert_eq!(
            service.register(&"a".into(), "Alice", &"c".into(), "Carol"),
            Err(LedgerError::AlreadyRegistered)
        );
        assert_eq!(service.rewards().current(), RewardConfig::builtin());
        assert!(dir.path().join("invitedby-config.json").exists());
    }

    #[test]
    fn read_only_lifecycle_leaves_corrupt_ledger_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::in_dir(dir.path());
        let corrupt = br#"{ "a": "b", oops"#;
        fs::write(&settings.ledger_path, corrupt).unwrap();

        let service = InvitedBy::start(settings.clone());
        assert!(!service.reset(&"nobody".into()));
        assert_eq!(service.info(&NobodyOnline, &"a".into()), InfoResult::NotDeclared);
        service.shutdown();

        assert_eq!(fs::read(&settings.ledger_path).unwrap(), corrupt);
    }

    #[test]
    fn read_only_lifecycle_creates_no_ledger_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::in_dir(dir.path());

        let service = InvitedBy::start(settings.clone());
        service.info(&NobodyOnline, &"a".into());
        service.shutdown();

        assert!(!settings.ledger_path.exists());
    }
}
