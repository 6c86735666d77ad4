use std::time::Duration;

use tokio::sync::mpsc;
use tokio_test::assert_err;

use sandbox_market::event::AppEvent;
use sandbox_market::generator::GeneratorParams;
use sandbox_market::model::instrument::{Instrument, Interval, Selection};
use sandbox_market::session::{MarketSession, SessionConfig};
use sandbox_market::ui::AppState;

fn test_config() -> SessionConfig {
    SessionConfig {
        params: GeneratorParams {
            history_len: 100,
            ..GeneratorParams::default()
        },
        tick_ms: 1500,
        seed: Some(11),
    }
}

fn drain(rx: &mut mpsc::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut out = Vec::new();
    while let Ok(evt) = rx.try_recv() {
        out.push(evt);
    }
    out
}

#[tokio::test(start_paused = true)]
/// Verifies the feed lifecycle:
/// start publishes the full history first, then one bar per tick period.
async fn session_publishes_reset_then_one_bar_per_tick() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut session = MarketSession::new(test_config(), tx);
    let selection = Selection::new(Instrument::Eth, Interval::M5);
    let epoch = session.start(selection);
    assert_eq!(epoch, 1);
    assert!(session.is_running());
    assert_eq!(session.selection(), Some(selection));

    let first = rx.recv().await.expect("reset event");
    let last_close = match first {
        AppEvent::SeriesReset {
            epoch: e,
            selection: s,
            candles,
        } => {
            assert_eq!(e, 1);
            assert_eq!(s, selection);
            assert_eq!(candles.len(), 100);
            assert!((candles[0].open - 2500.0).abs() < 1e-9);
            candles.last().unwrap().close
        }
        other => panic!("expected SeriesReset, got {:?}", other),
    };

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    let events = drain(&mut rx);
    assert_eq!(events.len(), 2, "two ticks in 3.1s at 1.5s cadence");
    match &events[0] {
        AppEvent::CandleAppended { epoch, candle } => {
            assert_eq!(*epoch, 1);
            assert!((candle.open - last_close).abs() < 1e-9);
        }
        other => panic!("expected CandleAppended, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
/// Verifies selection switching:
/// events still queued from the old feed are dropped by the consumer, and the
/// new window starts from the new instrument's base price.
async fn switching_selection_discards_stale_events() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut session = MarketSession::new(test_config(), tx);
    let mut state = AppState::new(Selection::default(), 100);

    let eth = Selection::new(Instrument::Eth, Interval::M5);
    let epoch = session.start(eth);
    state.begin_selection(eth, epoch, None);
    tokio::time::sleep(Duration::from_millis(1_600)).await;

    // Switch before the consumer has drained anything from the ETH feed.
    let btc = Selection::new(Instrument::Btc, Interval::M15);
    let epoch = session.start(btc);
    assert_eq!(epoch, 2);
    state.begin_selection(btc, epoch, None);
    tokio::time::sleep(Duration::from_millis(1_600)).await;

    let events = drain(&mut rx);
    let first_new = events
        .iter()
        .position(|e| e.epoch() == Some(2))
        .expect("events from the new feed");
    assert!(events[first_new..].iter().all(|e| e.epoch() == Some(2)));
    assert!(matches!(
        &events[first_new - 1],
        AppEvent::LogMessage(msg) if msg.contains("ETH/5m")
    ));
    match &events[first_new] {
        AppEvent::SeriesReset { candles, .. } => {
            assert!((candles[0].open - 30_000.0).abs() < 1e-9);
        }
        other => panic!("expected SeriesReset, got {:?}", other),
    }

    for evt in events {
        state.apply(evt);
    }
    assert_eq!(state.dropped_events, 2);
    assert!(state
        .log_messages
        .iter()
        .any(|m| m.starts_with("Stopped ETH/5m feed")));
    assert_eq!(state.selection, btc);
    assert_eq!(state.candles.len(), 100);
    assert_eq!(state.tick_count, 1);
    assert!(state
        .candles
        .windows(2)
        .all(|w| (w[1].open - w[0].close).abs() < 1e-9));
}

#[tokio::test(start_paused = true)]
/// Verifies stop semantics:
/// stop reports itself once on the event channel, nothing else follows, and
/// stop is idempotent.
async fn stop_halts_the_feed() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut session = MarketSession::new(test_config(), tx);
    session.start(Selection::default());
    let _reset = rx.recv().await.expect("reset event");

    session.stop();
    session.stop();
    assert!(!session.is_running());
    assert_eq!(session.selection(), None);

    match rx.try_recv() {
        Ok(AppEvent::LogMessage(msg)) => assert_eq!(msg, "Stopped ETH/5m feed (epoch 1)"),
        other => panic!("expected stop LogMessage, got {:?}", other),
    }

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_err!(rx.try_recv());
}

#[tokio::test(start_paused = true)]
/// Verifies the feed task exits on its own once the consumer goes away.
async fn feed_exits_when_receiver_dropped() {
    let (tx, rx) = mpsc::channel(64);
    let mut session = MarketSession::new(test_config(), tx);
    drop(rx);
    session.start(Selection::default());

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!session.is_running());
}
