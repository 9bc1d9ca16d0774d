use std::path::{Path, PathBuf};
use std::process::ExitCode;

use canvas::doc::{BoardStore, Cluster, DocStore, Note};
use canvas::layout::{arrange_in_clusters, arrange_in_grid};
use canvas::selection::{FitCap, fit_to_content};
use clap::{Parser, Subcommand, ValueEnum};
use insightboard::{BoardConfig, ConfigError, ErrorCode};
use serde::Deserialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid board JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_READ",
            Self::InvalidJson(_) => "E_INVALID_JSON",
            Self::Config(e) => e.error_code(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "insightboard", about = "Research board layout and viewport tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute note positions for a board snapshot.
    Layout {
        board: PathBuf,
        #[arg(long, value_enum, default_value_t = LayoutMode::Clusters)]
        mode: LayoutMode,
    },
    /// Compute the viewport that fits every note.
    Fit {
        board: PathBuf,
        #[arg(long, env = "INSIGHTBOARD_VIEWPORT_WIDTH")]
        width: Option<f64>,
        #[arg(long, env = "INSIGHTBOARD_VIEWPORT_HEIGHT")]
        height: Option<f64>,
        /// Use the fit-to-screen zoom cap instead of the auto-fit one.
        #[arg(long)]
        manual: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutMode {
    Grid,
    Clusters,
}

/// `{"notes": [...], "clusters": [...]}`
#[derive(Deserialize)]
struct BoardSnapshot {
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    clusters: Vec<Cluster>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Layout { board, mode } => run_layout(&board, mode),
        Command::Fit { board, width, height, manual } => run_fit(&board, width, height, manual),
    };
    match result {
        Ok(value) => {
            println!("{value:#}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn load_board(path: &Path) -> Result<DocStore, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })?;
    let snapshot: BoardSnapshot = serde_json::from_str(&raw)?;
    tracing::info!(notes = snapshot.notes.len(), clusters = snapshot.clusters.len(), "board loaded");
    Ok(DocStore::from_parts(snapshot.notes, snapshot.clusters))
}

fn run_layout(path: &Path, mode: LayoutMode) -> Result<serde_json::Value, CliError> {
    let board = load_board(path)?;
    let placements = match mode {
        LayoutMode::Grid => arrange_in_grid(board.notes()),
        LayoutMode::Clusters => {
            let order: Vec<_> = board.clusters().iter().map(|c| c.id).collect();
            arrange_in_clusters(board.notes(), &order)
        }
    };
    Ok(json!({ "placements": placements }))
}

fn run_fit(path: &Path, width: Option<f64>, height: Option<f64>, manual: bool) -> Result<serde_json::Value, CliError> {
    let config = BoardConfig::from_env()?;
    let board = load_board(path)?;
    let cap = if manual { FitCap::Manual } else { FitCap::Auto };
    let width = width.unwrap_or(config.viewport_width);
    let height = height.unwrap_or(config.viewport_height);
    Ok(match fit_to_content(board.notes(), width, height, cap) {
        Some(viewport) => json!({ "viewport": viewport }),
        None => json!({ "viewport": null }),
    })
}
