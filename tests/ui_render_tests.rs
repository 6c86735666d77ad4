use std::time::{Duration, Instant};

use ratatui::backend::TestBackend;
use ratatui::Terminal;

use sandbox_market::event::AppEvent;
use sandbox_market::generator::{GeneratorParams, RngSource, SeriesGenerator};
use sandbox_market::model::instrument::{Instrument, Interval, Selection};
use sandbox_market::ui::{self, AppState};

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn loaded_state(selection: Selection, epoch: u64) -> AppState {
    let mut gen = SeriesGenerator::new(
        GeneratorParams {
            history_len: 120,
            ..GeneratorParams::default()
        },
        RngSource::seeded(5),
    );
    let series = gen.reselect(selection, 1_700_000_000_000);
    let mut state = AppState::new(selection, 120);
    state.begin_selection(selection, epoch, None);
    state.apply(AppEvent::SeriesReset {
        epoch,
        selection,
        candles: series.to_vec(),
    });
    state
}

#[test]
/// Verifies the live chart route:
/// a loaded series renders the instrument title and the price in the status bar.
fn render_live_chart_with_title_and_price() {
    let backend = TestBackend::new(120, 30);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let state = loaded_state(Selection::new(Instrument::Eth, Interval::M5), 1);

    terminal
        .draw(|frame| ui::render(frame, &state))
        .expect("render should succeed");

    let text = buffer_text(&terminal);
    assert!(text.contains("Live ETH Chart (5m)"));
    assert!(text.contains("LIVE"));
    let price = format!("${:.2}", state.last_price().unwrap());
    assert!(text.contains(&price), "status bar should show {}", price);
    assert!(!text.contains("Loading"));
}

#[test]
/// Verifies the loading overlay:
/// while the loading window is open the chart shows a placeholder, not candles.
fn render_loading_overlay_while_loading() {
    let backend = TestBackend::new(100, 24);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let selection = Selection::new(Instrument::Sol, Interval::H1);
    let mut state = loaded_state(selection, 3);
    state.loading_until = Some(Instant::now() + Duration::from_secs(60));

    terminal
        .draw(|frame| ui::render(frame, &state))
        .expect("render should succeed");

    let text = buffer_text(&terminal);
    assert!(text.contains("Live SOL Chart (1h)"));
    assert!(text.contains("Loading"));
    assert!(text.contains("LOADING"));
}

#[test]
/// Verifies an empty window is treated as loading rather than drawn blank.
fn empty_state_counts_as_loading() {
    let state = AppState::new(Selection::default(), 10);
    assert!(state.is_loading(Instant::now()));
    assert_eq!(state.last_price(), None);
    assert_eq!(state.change_pct(), None);
}

#[test]
/// Verifies the consumer window bound and stale-epoch filtering in AppState::apply.
fn app_state_bounds_window_and_drops_stale_events() {
    let selection = Selection::new(Instrument::Btc, Interval::M15);
    let mut state = loaded_state(selection, 4);
    assert_eq!(state.candles.len(), 120);

    let last = *state.candles.last().unwrap();
    let next = sandbox_market::model::candle::Candle {
        timestamp_ms: last.timestamp_ms + 1_500,
        open: last.close,
        high: last.close + 1.0,
        low: last.close - 1.0,
        close: last.close + 0.5,
    };
    state.apply(AppEvent::CandleAppended {
        epoch: 4,
        candle: next,
    });
    assert_eq!(state.candles.len(), 120);
    assert_eq!(state.tick_count, 1);
    assert_eq!(state.candles.last(), Some(&next));

    state.apply(AppEvent::CandleAppended {
        epoch: 3,
        candle: next,
    });
    state.apply(AppEvent::SeriesReset {
        epoch: 2,
        selection: Selection::default(),
        candles: Vec::new(),
    });
    assert_eq!(state.dropped_events, 2);
    assert_eq!(state.selection, selection);
    assert_eq!(state.candles.len(), 120);

    state.apply(AppEvent::LogMessage("hello".to_string()));
    assert_eq!(state.log_messages.last().map(String::as_str), Some("hello"));
}
