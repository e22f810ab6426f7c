use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use setlist_core::ReorderPolicy;
use tracing::info;

use crate::error::{HarnessError, Result};
use crate::scenario::{ReplayReport, Scenario, replay};

#[derive(Debug, Parser)]
#[command(
    name = "setlist-harness",
    about = "Replay scripted drag scenarios against the setlist reorder engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSON scenario and print the resulting order.
    Replay(ReplayArgs),

    /// Load and validate a reorder policy file.
    #[command(name = "check-policy")]
    CheckPolicy(CheckPolicyArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Scenario file (JSON).
    pub scenario: PathBuf,

    /// Policy file (TOML, or JSON by extension). Defaults apply otherwise.
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckPolicyArgs {
    /// Policy file (TOML, or JSON by extension).
    pub policy: PathBuf,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => {
            let json = args.json;
            let report = run_replay(&args)?;
            println!("{}", render(&report, json)?);
            Ok(())
        }
        Commands::CheckPolicy(args) => {
            let policy = load_policy(&args.policy)?;
            let rendered = serde_json::to_string_pretty(&policy).map_err(HarnessError::Report)?;
            println!("{}: ok\n{rendered}", args.policy.display());
            Ok(())
        }
    }
}

/// Load the scenario and policy named by `args` and replay it.
pub fn run_replay(args: &ReplayArgs) -> Result<ReplayReport> {
    let scenario = Scenario::from_path(&args.scenario)?;
    let policy = match &args.policy {
        Some(path) => load_policy(path)?,
        None => ReorderPolicy::default(),
    };
    info!(scenario = %args.scenario.display(), steps = scenario.steps.len(), "replaying");
    replay(&scenario, &policy)
}

/// Read a policy file and check it validates.
pub fn load_policy(path: &Path) -> Result<ReorderPolicy> {
    if !path.exists() {
        return Err(HarnessError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    Ok(ReorderPolicy::from_file(path)?)
}

fn render(report: &ReplayReport, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(report).map_err(HarnessError::Report)
    } else {
        Ok(report.to_string())
    }
}
