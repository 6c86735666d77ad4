pub mod chart;
pub mod dashboard;

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::event::AppEvent;
use crate::model::candle::Candle;
use crate::model::instrument::Selection;

use chart::CandleChart;
use dashboard::{KeybindBar, LogPanel, StatusBar};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub selection: Selection,
    /// Epoch of the most recent `MarketSession::start`; events from any other epoch are stale.
    pub epoch: u64,
    pub candles: Vec<Candle>,
    pub history_len: usize,
    pub tick_count: u64,
    pub dropped_events: u64,
    pub loading_until: Option<Instant>,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(selection: Selection, history_len: usize) -> Self {
        Self {
            selection,
            epoch: 0,
            candles: Vec::with_capacity(history_len),
            history_len,
            tick_count: 0,
            dropped_events: 0,
            loading_until: None,
            log_messages: Vec::new(),
        }
    }

    /// Switch to a freshly started feed. The old window is discarded immediately.
    pub fn begin_selection(
        &mut self,
        selection: Selection,
        epoch: u64,
        loading_until: Option<Instant>,
    ) {
        self.selection = selection;
        self.epoch = epoch;
        self.candles.clear();
        self.tick_count = 0;
        self.loading_until = loading_until;
        self.push_log(format!("Switched to {}", selection));
    }

    pub fn is_loading(&self, now: Instant) -> bool {
        self.candles.is_empty() || self.loading_until.is_some_and(|until| now < until)
    }

    pub fn last_price(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    /// Percent change from the first visible open to the last close.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.candles.first()?;
        let last = self.candles.last()?;
        if first.open <= f64::EPSILON {
            return None;
        }
        Some((last.close - first.open) / first.open * 100.0)
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        if let Some(epoch) = event.epoch() {
            if epoch != self.epoch {
                self.dropped_events += 1;
                tracing::debug!(
                    event_epoch = epoch,
                    current_epoch = self.epoch,
                    "Dropping stale market event"
                );
                return;
            }
        }

        match event {
            AppEvent::SeriesReset {
                selection, candles, ..
            } => {
                self.selection = selection;
                self.candles = candles;
                if self.candles.len() > self.history_len {
                    let excess = self.candles.len() - self.history_len;
                    self.candles.drain(..excess);
                }
            }
            AppEvent::CandleAppended { candle, .. } => {
                self.tick_count += 1;
                self.candles.push(candle);
                if self.candles.len() > self.history_len {
                    self.candles.remove(0);
                }
            }
            AppEvent::LogMessage(msg) => self.push_log(msg),
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let loading = state.is_loading(Instant::now());
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // chart
            Constraint::Length(5), // system log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            selection: state.selection,
            last_price: state.last_price(),
            change_pct: state.change_pct(),
            loading,
            tick_count: state.tick_count,
        },
        outer[0],
    );

    frame.render_widget(
        CandleChart::new(&state.candles, state.selection).loading(loading),
        outer[1],
    );

    frame.render_widget(LogPanel::new(&state.log_messages), outer[2]);

    frame.render_widget(KeybindBar, outer[3]);
}
