use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};

use shared::stats::Leader;
use shared::{Board, Category, CategoryCounts, CategoryFilter, EntryInput, FileStorage, VoteOutcome};

use crate::config::Config;
use crate::error::CliError;
use crate::utils::{entry_details, entry_line, stats_summary};

pub const DEFAULT_EXPORT_FILE: &str = "hackathon_data.json";

#[derive(Parser, Debug)]
#[command(name = "voteboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and administer a local project voting board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: <config dir>/voteboard/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Board data directory, overrides config and environment
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a new entry
    Submit(SubmitArgs),

    /// List entries in submission order
    List {
        /// Only show one category (project, photo, video)
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Show one entry
    Show {
        id: String,
    },

    /// Vote for an entry
    Vote {
        id: String,
        /// Vote as another device id instead of this board's own
        #[arg(long)]
        device: Option<String>,
    },

    /// Board statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Write entries and this device's votes to a JSON snapshot
    Export {
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Delete all entries and votes
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// Add the demonstration entries to an empty board
    Seed,

    /// Print this board's device id
    Device,

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long = "team")]
    pub team_name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub category: Category,
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long)]
    pub demo_url: Option<String>,
    #[arg(long)]
    pub github_url: Option<String>,
}

impl From<SubmitArgs> for EntryInput {
    fn from(args: SubmitArgs) -> Self {
        EntryInput {
            title: args.title,
            team_name: args.team_name,
            description: args.description,
            image_url: args.image_url,
            demo_url: args.demo_url,
            github_url: args.github_url,
            category: Some(args.category),
        }
    }
}

/// Diagnostic view of the board, keyed the way the browser debug helper reported it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_projects: usize,
    pub total_votes: u64,
    pub user_votes: usize,
    pub device_id: String,
    pub category_breakdown: CategoryCounts,
    pub most_voted: Option<Leader>,
}

#[instrument(skip_all, fields(command = ?command))]
pub async fn run(command: Command, config: &Config, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Config => write!(out, "{}", config.to_toml()?)?,
        Command::Submit(args) => {
            if config.submission.delay_ms > 0 {
                writeln!(out, "Submitting...")?;
                tokio::time::sleep(Duration::from_millis(config.submission.delay_ms)).await;
            }
            // Opened after the delay so writes made meanwhile are not overwritten.
            let entry = open_board(config)?.submit(args.into())?;
            writeln!(out, "🎉 Submitted '{}' with id {}", entry.title, entry.id)?;
        }
        Command::List { category } => {
            let board = open_board(config)?;
            let filter = CategoryFilter::from(category);
            let entries = board.filter(filter);
            if entries.is_empty() {
                writeln!(out, "No projects yet")?;
            }
            let device = board.device().as_str();
            for entry in entries {
                writeln!(out, "{}", entry_line(entry, entry.has_voter(device)))?;
            }
        }
        Command::Show { id } => {
            let board = open_board(config)?;
            match board.find_by_id(&id) {
                Some(entry) => write!(out, "{}", entry_details(entry, entry.has_voter(board.device().as_str())))?,
                None => writeln!(out, "No entry with id {id}")?,
            }
        }
        Command::Vote { id, device } => {
            let mut board = open_board(config)?;
            let device = device.unwrap_or_else(|| board.device().as_str().to_string());
            let message = match board.cast_vote(&id, &device)? {
                VoteOutcome::Cast => {
                    let title = board.find_by_id(&id).map(|e| e.title.as_str()).unwrap_or_default();
                    format!("❤️ Vote recorded for '{title}'")
                }
                VoteOutcome::AlreadyVoted => "You have already voted for this project!".to_string(),
                VoteOutcome::NotFound => format!("No entry with id {id}, nothing changed"),
            };
            writeln!(out, "{message}")?;
        }
        Command::Stats { json } => {
            let board = open_board(config)?;
            let stats = board.statistics();
            if json {
                let report = StatsReport {
                    total_projects: stats.total_entries,
                    total_votes: stats.total_votes,
                    user_votes: stats.device_vote_count,
                    device_id: board.device().to_string(),
                    category_breakdown: stats.category_breakdown,
                    most_voted: stats.leader.clone(),
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write!(out, "{}", stats_summary(&stats))?;
            }
        }
        Command::Export { output, stdout } => {
            let board = open_board(config)?;
            let json = board.export_json()?;
            if stdout {
                writeln!(out, "{json}")?;
            } else {
                std::fs::write(&output, json)?;
                info!("📊 Exported board to {}", output.display());
                writeln!(out, "📊 Exported {} entries to {}", board.list().len(), output.display())?;
            }
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(CliError::NotConfirmed);
            }
            open_board(config)?.reset()?;
            writeln!(out, "All data cleared")?;
        }
        Command::Seed => {
            let added = open_board(config)?.seed_samples()?;
            if added == 0 {
                writeln!(out, "Board already has entries, nothing seeded")?;
            } else {
                writeln!(out, "🌱 Added {added} sample entries")?;
            }
        }
        Command::Device => writeln!(out, "{}", open_board(config)?.device())?,
    }

    Ok(())
}

fn open_board(config: &Config) -> Result<Board<FileStorage>, CliError> {
    debug!("Opening board in {}", config.storage.data_dir.display());
    Ok(Board::open(FileStorage::new(&config.storage.data_dir))?)
}
