#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp_ms: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// `(timestamp_ms, open, high, low, close)`, the row shape chart surfaces consume.
    pub fn as_tuple(&self) -> (u64, f64, f64, f64, f64) {
        (self.timestamp_ms, self.open, self.high, self.low, self.close)
    }

    /// True when high/low bracket both the open and the close.
    pub fn is_well_formed(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}

/// Round a price to `decimals` places. Monotonic, so ordering between prices survives it.
pub fn round_price(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
