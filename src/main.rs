use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklist::app::TaskApp;
use tasklist::cli::{self, Cli};
use tasklist::config::{Config, LoggingConfig, UiConfig};
use tasklist::state::{AppState, Settings};
use tasklist::store::FileStore;

fn init_logging(logging: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| logging.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_gui(state: AppState<FileStore>, ui: &UiConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([ui.window_width, ui.window_height])
            .with_min_inner_size([360.0, 300.0])
            .with_resizable(true)
            .with_title("Task List")
            .with_app_id("tasklist"),
        ..Default::default()
    };

    eframe::run_native(
        "tasklist",
        options,
        Box::new(|_cc| Ok(Box::new(TaskApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref()).context("loading config")?;
    init_logging(&config.logging);

    let storage_path = config.storage_path();
    tracing::info!("Task store: {}", storage_path.display());
    let mut state = AppState::hydrate(FileStore::new(&storage_path), Settings::from(&config.ui))
        .with_context(|| format!("loading tasks from {}", storage_path.display()))?;

    match cli.command {
        Some(cmd) => {
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            cli::execute(cmd, &mut state, &mut stdout, |question| {
                cli::prompt_yes_no(question, &mut stdin.lock(), &mut io::stderr())
            })
        }
        None => run_gui(state, &config.ui),
    }
}
