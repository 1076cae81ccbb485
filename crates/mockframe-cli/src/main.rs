//! Mockframe CLI - headless shell around the editor.
//!
//! Replays a recorded JSON array of editor events against a stored canvas and
//! prints or saves the resulting node array.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mockframe_core::storage::FileStorage;
use mockframe_core::{
    CanvasNode, ConfigError, Editor, EditorConfig, EditorEvent, MemoryStorage, Storage,
    StorageError,
};
use thiserror::Error;

/// Mockframe CLI - replay and inspect wireframe canvases
#[derive(Parser)]
#[command(name = "mockframe")]
#[command(about = "Headless shell for the Mockframe wireframe editor")]
struct Cli {
    /// Directory holding saved canvases (default: platform data dir)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Editor config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded events against the stored canvas
    Replay {
        /// JSON file containing an array of editor events
        events: PathBuf,

        /// Write the resulting nodes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start from an empty canvas and save nothing
        #[arg(long)]
        ephemeral: bool,
    },

    /// Print the stored node array
    Show,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Replay {
            events,
            output,
            ephemeral,
        } => {
            let events = read_events(&events)?;
            let nodes = if ephemeral {
                replay(Arc::new(MemoryStorage::new()), config, events)
            } else {
                replay(Arc::new(open_store(cli.store)?), config, events)
            };
            write_nodes(&nodes, output.as_deref())
        }
        Commands::Show => {
            let storage = open_store(cli.store)?;
            let nodes = match storage.load(&config.storage_key) {
                Err(StorageError::NotFound(_)) => Vec::new(),
                other => other?,
            };
            write_nodes(&nodes, None)
        }
    }
}

fn open_store(dir: Option<PathBuf>) -> Result<FileStorage, StorageError> {
    match dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    }
}

fn read_events(path: &Path) -> Result<Vec<EditorEvent>, CliError> {
    let json = fs::read_to_string(path)?;
    let events: Vec<EditorEvent> = serde_json::from_str(&json)?;
    log::info!("Read {} event(s) from {}", events.len(), path.display());
    Ok(events)
}

/// Run `events` through a fresh editor over `storage` and return the nodes.
fn replay<S: Storage>(
    storage: Arc<S>,
    config: EditorConfig,
    events: Vec<EditorEvent>,
) -> Vec<CanvasNode> {
    let mut editor = Editor::new(storage, config);
    // Recorded streams carry explicit double-click events; wall-clock
    // detection would fire on fast replays.
    editor.input_mut().detect_double_clicks = false;
    editor.load();
    editor.handle_all(events);
    editor.flush();
    editor.canvas().nodes().to_vec()
}

fn write_nodes(nodes: &[CanvasNode], output: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(nodes)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Wrote {} node(s) to {}", nodes.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
