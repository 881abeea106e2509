use anyhow::{Context, Result};
use article_pulse::article::ArticleBatch;
use article_pulse::config::Config;
use article_pulse::history::{FileStore, HistoryStore};
use article_pulse::pipeline::{self, AnalysisRequest};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "pulse",
    about = "Topic analytics for WeChat article batches: stats, leaderboards, keyword cloud and insights"
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, default_value = "pulse.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Analyse a batch of article records and print the result as JSON
    Analyze {
        /// JSON file: an array of records or a search API response envelope
        input: PathBuf,

        /// Keyword the batch was searched with
        #[arg(short, long)]
        keyword: String,

        /// Number of records to analyse (defaults to analysis.default_article_count)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Do not record this run in the search history
        #[arg(long)]
        no_history: bool,
    },

    /// Inspect or edit the search history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(clap::Subcommand)]
enum HistoryAction {
    /// List entries, newest first
    List {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one entry
    Show { id: String },
    /// Delete one entry
    Delete { id: String },
    /// Delete every entry
    Clear,
}

fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)?
    } else {
        Config::default()
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("article_pulse=info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let offset = config.analysis.offset()?;
    let mut history = HistoryStore::new(FileStore::new(&config.history.dir), offset);
    debug!(dir = %history.backend().dir().display(), "using history store");

    match cli.command {
        Command::Analyze {
            input,
            keyword,
            count,
            no_history,
        } => {
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let batch = ArticleBatch::from_json(&json)?;
            let request = AnalysisRequest {
                keyword,
                article_count: count.unwrap_or(config.analysis.default_article_count),
            };
            let store = if no_history { None } else { Some(&mut history) };
            let result = pipeline::run_analysis(&batch, &request, offset, store);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::History { action } => match action {
            HistoryAction::List { limit } => {
                let mut entries = history.list();
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            HistoryAction::Show { id } => {
                let entry = history
                    .get(&id)
                    .with_context(|| format!("no search history entry with id {id}"))?;
                println!("{}", serde_json::to_string_pretty(&entry)?);
            }
            HistoryAction::Delete { id } => {
                if !history.delete_by_id(&id) {
                    info!(id = %id, "nothing deleted");
                }
            }
            HistoryAction::Clear => history.clear(),
        },
    }
    Ok(())
}
