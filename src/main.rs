use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use shadow_reader::app::{App, AppEvent};
use shadow_reader::backend::BackendKind;
use shadow_reader::config::Config;
use shadow_reader::feed::{build_client, HttpFeedReader};
use shadow_reader::history::{HistoryState, SessionHistory};
use shadow_reader::ui;

/// Get the config directory path (~/.config/shadow-reader/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("shadow-reader"))
}

#[derive(Parser, Debug)]
#[command(name = "shadow-reader", about = "Terminal feed reader with a slide-out category menu")]
struct Args {
    /// Feed backend (reddit or guardian); overrides the config file
    #[arg(long)]
    backend: Option<BackendKind>,

    /// Category to open first
    #[arg(long, value_name = "ID")]
    category: Option<String>,

    /// Config file path (default: ~/.config/shadow-reader/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the backend's categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn init_logging(config_dir: &std::path::Path) -> Result<()> {
    // The TUI owns stdout/stderr, so logs go to a file
    let log_path = config_dir.join("reader.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }
    init_logging(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let kind = match args.backend {
        Some(kind) => kind,
        None => config.backend_kind()?,
    };
    let backend = kind.build(config.base_url.as_deref());
    tracing::info!(backend = %kind, "Backend selected");

    if args.list_categories {
        for category in backend.categories().iter() {
            println!("{}\t{}", category.id, category.title);
        }
        return Ok(());
    }

    let requested = args.category.as_deref().or(config.default_category.as_deref());
    if let Some(id) = requested {
        if !backend.categories().contains(id) {
            anyhow::bail!(
                "Unknown category '{}' for {} (see --list-categories)",
                id,
                backend.name()
            );
        }
    }

    let client = build_client().context("Failed to build HTTP client")?;
    let reader = Arc::new(HttpFeedReader::new(client, Arc::clone(&backend)));
    let history = SessionHistory::new(HistoryState {
        category: args.category.clone(),
        article_url: None,
    });

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let mut app = App::new(backend, reader, history, &config, event_tx);
    app.start(config.default_category.as_deref())
        .context("Failed to load initial category")?;

    ui::run(&mut app, event_rx).await?;

    Ok(())
}
