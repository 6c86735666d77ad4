use crossterm::event::KeyCode;

use crate::model::instrument::{Instrument, Interval, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    CycleInstrument,
    CycleInterval,
    SelectInstrument(Instrument),
    SelectInterval(Interval),
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Tab => Some(UiCommand::CycleInstrument),
        KeyCode::Char('5') => Some(UiCommand::SelectInterval(Interval::M5)),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            't' => Some(UiCommand::CycleInstrument),
            'i' => Some(UiCommand::CycleInterval),
            'e' => Some(UiCommand::SelectInstrument(Instrument::Eth)),
            'b' => Some(UiCommand::SelectInstrument(Instrument::Btc)),
            's' => Some(UiCommand::SelectInstrument(Instrument::Sol)),
            'f' => Some(UiCommand::SelectInterval(Interval::M15)),
            'h' => Some(UiCommand::SelectInterval(Interval::H1)),
            _ => None,
        },
        _ => None,
    }
}

impl UiCommand {
    /// Selection this command switches to, or `None` if it leaves the selection alone.
    pub fn next_selection(self, current: Selection) -> Option<Selection> {
        let next = match self {
            Self::Quit => return None,
            Self::CycleInstrument => current.with_instrument(current.instrument.next()),
            Self::CycleInterval => current.with_interval(current.interval.next()),
            Self::SelectInstrument(inst) => current.with_instrument(inst),
            Self::SelectInterval(intv) => current.with_interval(intv),
        };
        (next != current).then_some(next)
    }
}
