use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use invitedby::{
    commands::{self, Request},
    host::{CommandSource, Host, PlayerDirectory},
    roster::{PrintExecutor, Roster},
    settings::DEFAULT_DIR,
    InvitedBy, PlayerId, Settings,
};

//==================== CLI ====================//

const ROSTER_FILE: &str = "players.json";

#[derive(Parser)]
#[command(name = "invitedby", version, about = "Record who invited whom and hand out rewards")]
struct Cli {
    /// Directory holding invitedby.json and invitedby-config.json
    #[arg(long, default_value = DEFAULT_DIR)]
    config_dir: PathBuf,

    /// Player list standing in for the server (ids, names, online flag, op level).
    /// Defaults to players.json inside the config directory
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Player issuing the command, by id or name
    #[arg(long = "as", value_name = "PLAYER")]
    actor: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Declare who invited you
    Register { inviter: String },
    /// Re-read the reward config
    Reload,
    /// Forget a player's inviter
    Reset { player: String },
    /// Show who invited a player
    Info { player: String },
}

impl Cli {
    fn roster_path(&self) -> PathBuf {
        self.roster
            .clone()
            .unwrap_or_else(|| self.config_dir.join(ROSTER_FILE))
    }
}

fn resolve(roster: &Roster, key: &str) -> PlayerId {
    roster
        .lookup(key)
        .map(|p| p.id.clone())
        .unwrap_or_else(|| PlayerId::new(key))
}

//==================== main ====================//

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let roster_path = cli.roster_path();
    let roster = match Roster::load(&roster_path) {
        Ok(roster) => roster,
        Err(err) => {
            error!(path = %roster_path.display(), %err, "cannot read roster");
            return ExitCode::FAILURE;
        }
    };

    let actor = resolve(&roster, &cli.actor);
    let source = CommandSource {
        display_name: roster.display_name(&actor),
        actor,
    };
    let request = match cli.command {
        Command::Register { inviter } => Request::Register {
            inviter: resolve(&roster, &inviter),
        },
        Command::Reload => Request::Reload,
        Command::Reset { player } => Request::Reset {
            target: resolve(&roster, &player),
        },
        Command::Info { player } => Request::Info {
            target: resolve(&roster, &player),
        },
    };

    let service = InvitedBy::start(Settings::in_dir(&cli.config_dir));
    let host = Host {
        directory: &roster,
        authorization: &roster,
        executor: &PrintExecutor,
    };
    let feedback = commands::dispatch(&service, host, &source, request);
    service.shutdown();

    for line in &feedback.lines {
        if feedback.success {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
    if feedback.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
