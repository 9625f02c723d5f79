//! zaptv - IPTV channel surfing from the terminal
//!
//! A remote-control style interface: browse a channel grid with the arrow
//! keys, zap with up/down, punch in channel numbers and peek at the
//! mini-guide while the external player shows the video.
//!
//! # Usage
//!
//! ```bash
//! # Remote-control front-end
//! zaptv --playlist channels.m3u
//!
//! # Scripting
//! zaptv channels --category News --json
//! zaptv resolve http://provider.example/live/1
//! zaptv guide news-1
//! ```

use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zaptv::api::StreamResolver;
use zaptv::cli::{Cli, Command, ExitCode, Output};
use zaptv::config::Config;
use zaptv::{commands, input, ui, App, AppState};

/// Raw-mode terminal on stdout
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Resolved stream URL tagged with the request generation
type Resolved = (u64, String);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // Subcommand: run it and exit with its status
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // No subcommand: the remote-control front-end
        let config = cli.load_config();
        run_tui(config).await
    }
}

/// Dispatch a subcommand
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = cli.load_config();

    match cli.command {
        Some(Command::Channels(cmd)) => commands::channels_cmd(cmd, &config, &output),
        Some(Command::Resolve(cmd)) => commands::resolve_cmd(cmd, &config, &output).await,
        Some(Command::Guide(cmd)) => commands::guide_cmd(cmd, &config, &output),
        None => ExitCode::Success,
    }
}

// =============================================================================
// Logging
// =============================================================================

fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("zaptv")
        .join("zaptv.log")
}

/// Log to a file; the terminal belongs to the TUI
fn init_logging() -> Result<()> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,zaptv=debug"));
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Raw mode, alternate screen, mouse reporting on
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Undo everything `init_terminal` did
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    init_logging()?;
    info!("zaptv starting");

    let services = match commands::build_services(&config) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(ExitCode::Error.into());
        }
    };
    let resolver = StreamResolver::new(config.user_agent())?;
    let mut app = App::new(services, &config);

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, resolver).await;

    // The player and terminal are released on error paths too
    app.quit();
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!("event loop failed: {:#}", e);
    }
    info!("zaptv exiting");
    result
}

/// Main event loop - input, timers, async completions, render
async fn run_event_loop(terminal: &mut Tui, app: &mut App, resolver: StreamResolver) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel::<Resolved>();

    while app.running {
        let now = Instant::now();
        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);
        let grid = ui::browse::grid_inner(ui::browse::areas(ui::layout(screen).body).grid);
        app.set_viewport(grid.height as f32, ui::CELL_HEIGHT as f32, now);

        terminal.draw(|frame| ui::render(frame, app, now))?;

        if event::poll(TICK_RATE)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(press) = input::classify(&key) {
                        app.handle_key(press, Instant::now());
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved => app.pointer_moved(),
                    MouseEventKind::Down(MouseButton::Left) if app.state == AppState::Channels => {
                        let now = Instant::now();
                        let hit = app.browser.as_ref().and_then(|browser| {
                            ui::browse::cell_at(
                                grid,
                                browser.columns(),
                                ui::browse::first_row(browser, grid, now),
                                mouse.column,
                                mouse.row,
                            )
                        });
                        match hit {
                            Some(index) => app.pointer_select(index, now),
                            None => app.pointer_moved(),
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        app.tick(Instant::now());

        for request in app.take_resolve_requests() {
            let resolver = resolver.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let url = resolver.resolve_or_original(&request.url).await;
                // The receiver is gone once the loop exits
                let _ = tx.send((request.generation, url));
            });
        }

        while let Ok((generation, url)) = rx.try_recv() {
            app.on_url_resolved(generation, url, Instant::now());
        }
    }

    Ok(())
}
