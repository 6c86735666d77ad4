//! Synthetic candlestick generation.
//!
//! Prices follow a trending random walk: a segment of bars shares one direction
//! and one strength bound, then a new segment is drawn. Each bar is O(1) and the
//! series it extends is a fixed-size window.

pub mod source;
pub mod trend;

pub use source::{RandomSource, RngSource};
pub use trend::{Direction, TrendBounds, TrendState};

use crate::error::AppError;
use crate::model::candle::{round_price, Candle};
use crate::model::instrument::Selection;
use crate::model::series::CandleSeries;

pub const PRICE_DECIMALS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    pub trend: TrendBounds,
    /// Upper bound of each wick beyond the candle body.
    pub wick_jitter: f64,
    /// Prices never go below this.
    pub price_floor: f64,
    /// Bars produced by `reselect`, and the window size of the resulting series.
    pub history_len: usize,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            trend: TrendBounds::default(),
            wick_jitter: 15.0,
            price_floor: 0.01,
            history_len: 500,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), AppError> {
        let t = &self.trend;
        if t.len_min == 0 {
            return Err(AppError::Config("trend_len_min must be > 0".to_string()));
        }
        if t.len_min > t.len_max {
            return Err(AppError::Config(format!(
                "trend_len_min ({}) must be <= trend_len_max ({})",
                t.len_min, t.len_max
            )));
        }
        if !(t.strength_min.is_finite() && t.strength_max.is_finite()) || t.strength_min < 0.0 {
            return Err(AppError::Config(
                "trend strength bounds must be finite and non-negative".to_string(),
            ));
        }
        if t.strength_min > t.strength_max {
            return Err(AppError::Config(format!(
                "strength_min ({}) must be <= strength_max ({})",
                t.strength_min, t.strength_max
            )));
        }
        if !self.wick_jitter.is_finite() || self.wick_jitter < 0.0 {
            return Err(AppError::Config(
                "wick_jitter must be finite and >= 0".to_string(),
            ));
        }
        if !self.price_floor.is_finite() || self.price_floor < 0.01 {
            return Err(AppError::Config(
                "price_floor must be at least one price tick (0.01)".to_string(),
            ));
        }
        if round_price(self.price_floor, PRICE_DECIMALS) != self.price_floor {
            return Err(AppError::Config(format!(
                "price_floor ({}) must be a whole number of price ticks (0.01)",
                self.price_floor
            )));
        }
        if self.history_len == 0 {
            return Err(AppError::Config("history_len must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Build the next candle from the previous close under `trend`.
/// Consumes three draws: body, upper wick, lower wick.
///
/// `params.price_floor` is expected to sit on the price grid (see `validate`),
/// so rounding a clamped price never takes it back under the floor.
pub fn next_candle<S: RandomSource>(
    prev_close: f64,
    trend: &TrendState,
    params: &GeneratorParams,
    source: &mut S,
    timestamp_ms: u64,
) -> Candle {
    let open = round_price(prev_close.max(params.price_floor), PRICE_DECIMALS);
    let raw_close = open + trend.direction.sign() * trend.strength * source.unit();
    if raw_close < params.price_floor {
        tracing::debug!(
            raw_close,
            floor = params.price_floor,
            "Close clamped to price floor"
        );
    }
    let close = round_price(raw_close.max(params.price_floor), PRICE_DECIMALS);

    let high = round_price(
        open.max(close) + source.unit() * params.wick_jitter,
        PRICE_DECIMALS,
    );
    let low = round_price(
        open.min(close) - source.unit() * params.wick_jitter,
        PRICE_DECIMALS,
    )
    .max(params.price_floor)
    .min(open.min(close));

    Candle {
        timestamp_ms,
        open,
        high,
        low,
        close,
    }
}

/// Owns the trend state for one series and extends it bar by bar.
#[derive(Debug, Clone)]
pub struct SeriesGenerator<S> {
    params: GeneratorParams,
    source: S,
    trend: TrendState,
    base_price: f64,
    bar_spacing_ms: u64,
}

impl<S: RandomSource> SeriesGenerator<S> {
    pub fn new(params: GeneratorParams, source: S) -> Self {
        Self {
            params,
            source,
            trend: TrendState::exhausted(),
            base_price: params.price_floor,
            bar_spacing_ms: 60_000,
        }
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn bar_spacing_ms(&self) -> u64 {
        self.bar_spacing_ms
    }

    /// Produce `count` bars starting at `base_price`, the last one a spacing before `now_ms`.
    /// The trend is redrawn so no state leaks in from a previous series.
    ///
    /// A clock too early to fit the whole history is pushed forward so the first
    /// bar lands at 0 and timestamps stay strictly increasing.
    pub fn initialize(&mut self, base_price: f64, count: usize, now_ms: u64) -> CandleSeries {
        self.base_price = base_price.max(self.params.price_floor);
        self.trend = TrendState::draw(&self.params.trend, &mut self.source);

        let span = (count as u64).saturating_mul(self.bar_spacing_ms);
        let end_ms = now_ms.max(span);
        let mut series = CandleSeries::with_capacity(count.max(1));
        let mut prev_close = self.base_price;
        for i in 0..count {
            let back = (count - i) as u64 * self.bar_spacing_ms;
            let timestamp_ms = end_ms - back;
            let candle = self.generate(prev_close, timestamp_ms);
            prev_close = candle.close;
            series.push(candle);
        }
        series
    }

    /// Append one bar continuing from the last close, evicting the oldest if full.
    /// An empty series continues from the base price.
    pub fn step(&mut self, series: &mut CandleSeries, now_ms: u64) -> Candle {
        let (prev_close, timestamp_ms) = match series.last() {
            Some(last) => (last.close, now_ms.max(last.timestamp_ms + 1)),
            None => (self.base_price, now_ms),
        };
        let candle = self.generate(prev_close, timestamp_ms);
        series.push(candle);
        candle
    }

    /// Discard whatever came before and start a fresh history for `selection`.
    pub fn reselect(&mut self, selection: Selection, now_ms: u64) -> CandleSeries {
        self.bar_spacing_ms = selection.interval.duration_ms();
        self.initialize(
            selection.instrument.base_price(),
            self.params.history_len,
            now_ms,
        )
    }

    fn generate(&mut self, prev_close: f64, timestamp_ms: u64) -> Candle {
        let active = self.trend.refreshed(&self.params.trend, &mut self.source);
        let candle = next_candle(
            prev_close,
            &active,
            &self.params,
            &mut self.source,
            timestamp_ms,
        );
        self.trend = active.consumed();
        candle
    }
}
