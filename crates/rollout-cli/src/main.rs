mod cmd_config;
mod cmd_dispatch;
mod cmd_init;
mod cmd_show;

use std::path::Path;

use clap::{Parser, Subcommand};
use rollout_core::{AvailableRevisionsSelect, Store};
use rollout_store::persist::load_store;
use rollout_store::ConsoleConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollout", version, about = "Release channel console")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .rollout/ workspace
    Init,
    /// Apply a JSON action (or array of actions) to the stored state
    Dispatch {
        /// Path to the actions file
        file: std::path::PathBuf,
    },
    /// Show release history, filtered by the open history panel
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the channel map with staged releases overlaid
    Channels {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show live branches of the current track
    Branches {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show revisions available to release
    Available {
        /// recent, unreleased, launchpad or all (default: stored selection)
        #[arg(long)]
        select: Option<AvailableRevisionsSelect>,
        /// Only revisions built for this architecture
        #[arg(long)]
        arch: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show staged changes by request kind and the requests to send
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage .rollout/config.json
    #[command(subcommand)]
    Config(cmd_config::ConfigCmd),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the stored snapshot with config applied.
pub(crate) fn open_store(root: &Path) -> anyhow::Result<Store> {
    let Some(mut store) = load_store(root)? else {
        anyhow::bail!("No .rollout/ workspace found. Run `rollout init` first.");
    };
    ConsoleConfig::load(root)?.apply(&mut store);
    debug!(
        track = %store.current_track,
        pending = store.pending_releases.len(),
        "opened store"
    );
    Ok(store)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init => cmd_init::execute(&root),
        Command::Dispatch { file } => cmd_dispatch::execute(&root, &file),
        Command::History { json } => cmd_show::history(&root, json),
        Command::Channels { json } => cmd_show::channels(&root, json),
        Command::Branches { json } => cmd_show::branches(&root, json),
        Command::Available { select, arch, json } => {
            cmd_show::available(&root, select, arch.as_deref(), json)
        }
        Command::Pending { json } => cmd_show::pending(&root, json),
        Command::Config(cmd) => cmd_config::run(cmd, &root),
    }
}
