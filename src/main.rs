use anyhow::Result;
use clap::{Parser, Subcommand};
use keep::areas::repository::Repository;
use keep::artifacts::snapshot::SnapshotId;
use keep::artifacts::snapshot::digest::Digest;
use keep::config::Config;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "keep",
    version = "0.1.0",
    about = "A local, directory-scoped snapshot store",
    long_about = "keep tracks the directory it lives in by taking snapshots of it: \
    file contents are stored once per unique blob, and each snapshot is a small \
    JSON manifest. Snapshots can be taken by hand, or automatically whenever the \
    directory settles down after a burst of changes.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a snapshot store",
        long_about = "This command initializes a snapshot store in the current directory \
        or at the specified path, then records an initial snapshot of the tree."
    )]
    Init {
        #[arg(index = 1, help = "The directory to track")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "snapshot",
        about = "Take a snapshot of the tracked directory",
        long_about = "This command scans the tracked directory and records a snapshot of it. \
        If nothing changed since the last snapshot, it is a no-op."
    )]
    Snapshot {
        #[arg(short, long, help = "The snapshot message")]
        message: Option<String>,
    },
    #[command(name = "log", about = "List all snapshots, newest first")]
    Log,
    #[command(
        name = "show",
        about = "Show one snapshot's metadata and file listing"
    )]
    Show {
        #[arg(index = 1, help = "The snapshot id")]
        id: String,
    },
    #[command(
        name = "diff",
        about = "Compare two snapshots",
        long_about = "This command prints a path-level summary of what changed between two \
        snapshots, followed by a unified diff per changed file. Binary files get a one-line \
        notice instead of a diff."
    )]
    Diff {
        #[arg(index = 1, help = "The snapshot to diff from")]
        a: String,
        #[arg(index = 2, help = "The snapshot to diff to")]
        b: String,
        #[arg(short, long, help = "Diff only this path")]
        path: Option<String>,
    },
    #[command(
        name = "amend",
        about = "Rewrite a snapshot's message",
        long_about = "This command replaces the message of an existing snapshot. \
        Every other field of the snapshot stays untouched."
    )]
    Amend {
        #[arg(index = 1, help = "The snapshot id")]
        id: String,
        #[arg(short, long, help = "The new message")]
        message: String,
    },
    #[command(
        name = "watch",
        about = "Auto-snapshot the tracked directory on change",
        long_about = "This command watches the tracked directory and takes a snapshot \
        whenever it has been quiet for the configured period after a change. \
        Runs until interrupted with Ctrl-C."
    )]
    Watch {
        #[arg(short, long, help = "Quiet period in seconds before an auto snapshot")]
        quiet_period: Option<u64>,
    },
    #[command(
        name = "cat-blob",
        about = "Print the raw content of a blob",
        long_about = "This command prints the stored bytes of a blob. \
        It requires the full digest of the blob to be specified."
    )]
    CatBlob {
        #[arg(index = 1, help = "The blob digest to print")]
        digest: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => open_repository(path)?,
                None => open_repository(&std::env::current_dir()?)?,
            };

            repository.init()?
        }
        Commands::Snapshot { message } => {
            let repository = open_repository(&std::env::current_dir()?)?;

            repository.snapshot(message.as_deref())?
        }
        Commands::Log => {
            let repository = open_repository(&std::env::current_dir()?)?;

            repository.log()?
        }
        Commands::Show { id } => {
            let repository = open_repository(&std::env::current_dir()?)?;

            repository.show(&SnapshotId::try_parse(id.clone())?)?
        }
        Commands::Diff { a, b, path } => {
            let repository = open_repository(&std::env::current_dir()?)?;

            repository.diff(
                &SnapshotId::try_parse(a.clone())?,
                &SnapshotId::try_parse(b.clone())?,
                path.as_deref(),
            )?
        }
        Commands::Amend { id, message } => {
            let repository = open_repository(&std::env::current_dir()?)?;

            repository.amend(&SnapshotId::try_parse(id.clone())?, message)?
        }
        Commands::Watch { quiet_period } => {
            let repository = open_repository(&std::env::current_dir()?)?;
            let quiet_period = match quiet_period {
                Some(secs) => Duration::from_secs(*secs),
                None => Config::load(repository.path())?.quiet_period(),
            };

            repository.watch(quiet_period).await?
        }
        Commands::CatBlob { digest } => {
            let repository = open_repository(&std::env::current_dir()?)?;

            repository.cat_blob(&Digest::try_parse(digest.clone())?)?
        }
    }

    Ok(())
}

fn open_repository(path: &Path) -> Result<Repository> {
    Repository::new(path, Box::new(std::io::stdout()))
}
