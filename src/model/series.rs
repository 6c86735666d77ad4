use std::collections::VecDeque;

use super::candle::Candle;

/// Fixed-capacity FIFO window of candles in ascending time order.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    capacity: usize,
    candles: VecDeque<Candle>,
}

impl CandleSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "series capacity must be > 0");
        Self {
            capacity,
            candles: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a candle, returning the evicted oldest candle when the window was full.
    pub fn push(&mut self, candle: Candle) -> Option<Candle> {
        let evicted = if self.candles.len() >= self.capacity {
            self.candles.pop_front()
        } else {
            None
        };
        self.candles.push_back(candle);
        evicted
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.front()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.candles.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }

    pub fn to_vec(&self) -> Vec<Candle> {
        self.candles.iter().copied().collect()
    }
}
