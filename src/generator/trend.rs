use super::source::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Ranges a trend segment is drawn from. Lengths are inclusive on both ends,
/// strength is `[strength_min, strength_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendBounds {
    pub len_min: u32,
    pub len_max: u32,
    pub strength_min: f64,
    pub strength_max: f64,
}

impl Default for TrendBounds {
    fn default() -> Self {
        Self {
            len_min: 10,
            len_max: 29,
            strength_min: 20.0,
            strength_max: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendState {
    pub direction: Direction,
    pub remaining: u32,
    pub strength: f64,
}

impl TrendState {
    /// A used-up segment; the next bar triggers a redraw.
    pub fn exhausted() -> Self {
        Self {
            direction: Direction::Up,
            remaining: 0,
            strength: 0.0,
        }
    }

    /// Draw a fresh segment. Consumes three draws: direction, length, strength.
    pub fn draw<S: RandomSource>(bounds: &TrendBounds, source: &mut S) -> Self {
        let direction = if source.unit() > 0.5 {
            Direction::Up
        } else {
            Direction::Down
        };
        let span = bounds.len_max.saturating_sub(bounds.len_min) + 1;
        let offset = ((source.unit() * span as f64) as u32).min(span - 1);
        let remaining = bounds.len_min + offset;
        let strength =
            bounds.strength_min + source.unit() * (bounds.strength_max - bounds.strength_min);
        Self {
            direction,
            remaining,
            strength,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// State to generate the next bar with: a redraw once the segment is used up,
    /// otherwise unchanged.
    pub fn refreshed<S: RandomSource>(self, bounds: &TrendBounds, source: &mut S) -> Self {
        if self.is_exhausted() {
            let next = Self::draw(bounds, source);
            tracing::debug!(
                direction = ?next.direction,
                remaining = next.remaining,
                strength = next.strength,
                "Trend redrawn"
            );
            next
        } else {
            self
        }
    }

    /// State after one bar has been generated under it.
    pub fn consumed(self) -> Self {
        Self {
            remaining: self.remaining.saturating_sub(1),
            ..self
        }
    }
}
