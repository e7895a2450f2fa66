//! userdir-manager binary entry point.
//!
//! Parses options, sets up logging and the tokio runtime that carries the
//! gateway calls, then runs the TUI in raw mode and restores the terminal on
//! exit.
//!
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use userdir_manager::app::config::ConfigPaths;
use userdir_manager::app::dispatch::Dispatcher;
use userdir_manager::app::{self, AppState, Keymap, Theme};
use userdir_manager::cli::{Cli, init_logging};
use userdir_manager::remote::HttpGateway;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_path(), &cli.log_level)?;
    let base_url = cli.validated_base_url()?;
    tracing::info!(base_url = %base_url, "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let gateway = Arc::new(HttpGateway::new(&base_url));
    let mut dispatcher = Dispatcher::new(gateway, runtime.handle().clone());

    let paths = ConfigPaths::new(cli.config_dir.clone());
    let mut app = AppState::new(Theme::load_or_init(&paths), Keymap::load_or_init(&paths));

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut app, &mut dispatcher);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
