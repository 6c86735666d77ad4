use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Instrument {
    #[default]
    Eth,
    Btc,
    Sol,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [Instrument::Eth, Instrument::Btc, Instrument::Sol];

    pub fn label(self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Btc => "BTC",
            Self::Sol => "SOL",
        }
    }

    /// Price the synthetic series starts from.
    pub fn base_price(self) -> f64 {
        match self {
            Self::Eth => 2_500.0,
            Self::Btc => 30_000.0,
            Self::Sol => 40.0,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|inst| inst.label().eq_ignore_ascii_case(s))
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    #[default]
    M5,
    M15,
    H1,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::M5, Interval::M15, Interval::H1];

    pub fn label(self) -> &'static str {
        match self {
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
        }
    }

    pub fn duration_ms(self) -> u64 {
        match self {
            Self::M5 => 5 * 60_000,
            Self::M15 => 15 * 60_000,
            Self::H1 => 3_600_000,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|intv| intv.label().eq_ignore_ascii_case(s))
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The (instrument, interval) pair a series is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub instrument: Instrument,
    pub interval: Interval,
}

impl Selection {
    pub fn new(instrument: Instrument, interval: Interval) -> Self {
        Self {
            instrument,
            interval,
        }
    }

    /// Resolve user-supplied labels. Unsupported values fall back to the default
    /// for that half of the pair instead of failing.
    pub fn parse_or_default(instrument: &str, interval: &str) -> Self {
        let inst = Instrument::parse(instrument).unwrap_or_else(|| {
            tracing::warn!(
                requested = %instrument,
                fallback = %Instrument::default(),
                "Unsupported instrument, using default"
            );
            Instrument::default()
        });
        let intv = Interval::parse(interval).unwrap_or_else(|| {
            tracing::warn!(
                requested = %interval,
                fallback = %Interval::default(),
                "Unsupported interval, using default"
            );
            Interval::default()
        });
        Self::new(inst, intv)
    }

    pub fn with_instrument(self, instrument: Instrument) -> Self {
        Self { instrument, ..self }
    }

    pub fn with_interval(self, interval: Interval) -> Self {
        Self { interval, ..self }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.instrument, self.interval)
    }
}
