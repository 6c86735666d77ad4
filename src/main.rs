use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::{mpsc, watch};

use sandbox_market::config::Config;
use sandbox_market::event::AppEvent;
use sandbox_market::input::{parse_main_command, UiCommand};
use sandbox_market::session::MarketSession;
use sandbox_market::ui::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = Config::resolve_path();
    let config = match Config::load_from_path(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("sandbox-market.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    // The subscriber did not exist yet when the config was read.
    if !config_path.exists() {
        tracing::warn!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
    }

    let initial_selection = config.market.selection();
    tracing::info!(
        selection = %initial_selection,
        history_len = config.market.history_len,
        tick_ms = config.market.tick_ms,
        seeded = config.generator.seed.is_some(),
        "Starting sandbox-market"
    );

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    let loading = Duration::from_millis(config.ui.loading_ms);
    let mut session = MarketSession::new(config.session_config(), app_tx.clone());
    let mut app_state = AppState::new(initial_selection, config.market.history_len);
    let epoch = session.start(initial_selection);
    app_state.begin_selection(initial_selection, epoch, Some(Instant::now() + loading));

    let mut terminal = ratatui::init();

    loop {
        terminal.draw(|frame| ui::render(frame, &app_state))?;

        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c'))
                {
                    let _ = shutdown_tx.send(true);
                } else if let Some(cmd) = parse_main_command(&key.code) {
                    if cmd == UiCommand::Quit {
                        tracing::info!("User quit");
                        let _ = shutdown_tx.send(true);
                    } else if let Some(next) = cmd.next_selection(app_state.selection) {
                        let epoch = session.start(next);
                        app_state.begin_selection(next, epoch, Some(Instant::now() + loading));
                    }
                }
            }
        }

        while let Ok(evt) = app_rx.try_recv() {
            app_state.apply(evt);
        }

        if *shutdown_rx.borrow() {
            break;
        }
    }

    session.stop();
    ratatui::restore();
    tracing::info!(
        dropped_stale_events = app_state.dropped_events,
        "Shutdown complete"
    );
    println!("Goodbye! Check sandbox-market.log for details.");
    Ok(())
}
