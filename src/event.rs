use crate::model::candle::Candle;
use crate::model::instrument::Selection;

/// Messages from the market session to the consumer. `epoch` identifies the
/// `MarketSession::start` call that produced them.
#[derive(Debug, Clone)]
pub enum AppEvent {
    SeriesReset {
        epoch: u64,
        selection: Selection,
        candles: Vec<Candle>,
    },
    CandleAppended {
        epoch: u64,
        candle: Candle,
    },
    LogMessage(String),
}

impl AppEvent {
    pub fn epoch(&self) -> Option<u64> {
        match self {
            Self::SeriesReset { epoch, .. } | Self::CandleAppended { epoch, .. } => Some(*epoch),
            Self::LogMessage(_) => None,
        }
    }
}
