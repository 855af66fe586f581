mod action;
mod api;
mod app;
mod config;
mod error;
mod event;
mod fetch;
mod filter;
#[cfg(test)]
mod testing;
mod tui;
mod types;
mod ui;

use std::fs::OpenOptions;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::api::{Catalog, PokeApi};
use crate::app::App;
use crate::config::{Config, LogConfig};
use crate::error::DexError;
use crate::event::Event;
use crate::tui::EventHandler;

/// Browse the PokéAPI catalog as an infinitely scrolling card grid.
#[derive(Parser, Debug)]
#[command(name = "dexgrid", version, about)]
struct Cli {
    /// API root, e.g. https://pokeapi.co/api/v2
    #[arg(long)]
    base_url: Option<String>,

    /// Entries requested per batch
    #[arg(long)]
    page_size: Option<u32>,

    /// Config file (default: <config dir>/dexgrid/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here instead of the default cache location
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log: &LogConfig) -> Result<(), DexError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log.level.as_deref().unwrap_or("warn"))
            .map_err(|e| DexError::Config(format!("invalid log level: {}", e)))?,
    };

    // The TUI owns the terminal, so logs go to a file whenever one can be opened.
    let file = log
        .file
        .clone()
        .or_else(config::default_log_path)
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());

    match file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .with_overrides(cli.base_url, cli.page_size, cli.log_file);

    init_logging(&config.log)?;
    tracing::info!(base_url = %config.api.base_url, page_size = config.api.page_size, "starting");

    let catalog: Arc<dyn Catalog> = Arc::new(PokeApi::new(config.api.base_url.clone())?);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(catalog, config.api.page_size).await;

    tui::restore()?;

    result
}

async fn run(catalog: Arc<dyn Catalog>, page_size: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(catalog, page_size, action_tx.clone());
    let (width, height) = crossterm::terminal::size()?;
    app.update(Action::Resize(width, height));

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
