use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::event::AppEvent;
use crate::generator::{GeneratorParams, RandomSource, RngSource, SeriesGenerator};
use crate::model::candle::Candle;
use crate::model::instrument::Selection;
use crate::model::series::CandleSeries;

pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// One selection's series together with the generator that extends it.
#[derive(Debug)]
pub struct MarketFeed<S> {
    selection: Selection,
    generator: SeriesGenerator<S>,
    series: CandleSeries,
}

impl<S: RandomSource> MarketFeed<S> {
    pub fn new(selection: Selection, params: GeneratorParams, source: S, now_ms: u64) -> Self {
        let mut generator = SeriesGenerator::new(params, source);
        let series = generator.reselect(selection, now_ms);
        Self {
            selection,
            generator,
            series,
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> Candle {
        self.generator.step(&mut self.series, now_ms)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn candles(&self) -> &CandleSeries {
        &self.series
    }

    pub fn last_close(&self) -> Option<f64> {
        self.series.last().map(|c| c.close)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub params: GeneratorParams,
    pub tick_ms: u64,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            params: GeneratorParams::default(),
            tick_ms: 1500,
            seed: None,
        }
    }
}

struct ActiveFeed {
    selection: Selection,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the running feed task. `start` replaces whatever was running; events
/// carry the epoch of the `start` call that produced them so a consumer can
/// drop anything left over from a previous selection.
pub struct MarketSession {
    config: SessionConfig,
    events: mpsc::Sender<AppEvent>,
    epoch: u64,
    active: Option<ActiveFeed>,
}

impl MarketSession {
    pub fn new(config: SessionConfig, events: mpsc::Sender<AppEvent>) -> Self {
        Self {
            config,
            events,
            epoch: 0,
            active: None,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, selection: Selection) -> u64 {
        self.stop();
        self.epoch += 1;
        let epoch = self.epoch;

        let source = RngSource::from_seed_opt(self.config.seed.map(|s| s.wrapping_add(epoch)));
        let feed = MarketFeed::new(selection, self.config.params, source, now_ms());
        let period = Duration::from_millis(self.config.tick_ms.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_feed(
            feed,
            epoch,
            period,
            self.events.clone(),
            shutdown_rx,
        ));

        tracing::info!(
            epoch,
            selection = %selection,
            tick_ms = self.config.tick_ms,
            "Market feed started"
        );
        self.active = Some(ActiveFeed {
            selection,
            shutdown_tx,
            handle,
        });
        epoch
    }

    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.shutdown_tx.send(true);
            active.handle.abort();
            tracing::info!(
                epoch = self.epoch,
                selection = %active.selection,
                "Market feed stopped"
            );
            // Best effort: a full or closed channel only loses the panel line.
            let _ = self.events.try_send(AppEvent::LogMessage(format!(
                "Stopped {} feed (epoch {})",
                active.selection, self.epoch
            )));
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.active.as_ref().map(|a| a.selection)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.handle.is_finished())
    }
}

impl Drop for MarketSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_feed<S>(
    mut feed: MarketFeed<S>,
    epoch: u64,
    period: Duration,
    events: mpsc::Sender<AppEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    S: RandomSource + Send + 'static,
{
    let reset = AppEvent::SeriesReset {
        epoch,
        selection: feed.selection(),
        candles: feed.candles().to_vec(),
    };
    if events.send(reset).await.is_err() {
        return;
    }

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let candle = feed.tick(now_ms());
                if events.send(AppEvent::CandleAppended { epoch, candle }).await.is_err() {
                    tracing::debug!(epoch, "Event receiver dropped, feed exiting");
                    break;
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
}
