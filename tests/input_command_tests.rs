use crossterm::event::KeyCode;
use sandbox_market::input::{parse_main_command, UiCommand};
use sandbox_market::model::instrument::{Instrument, Interval, Selection};

#[test]
fn parse_main_command_maps_case_insensitive_char_keys() {
    assert_eq!(parse_main_command(&KeyCode::Char('q')), Some(UiCommand::Quit));
    assert_eq!(parse_main_command(&KeyCode::Char('Q')), Some(UiCommand::Quit));
    assert_eq!(
        parse_main_command(&KeyCode::Char('T')),
        Some(UiCommand::CycleInstrument)
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('i')),
        Some(UiCommand::CycleInterval)
    );
    assert_eq!(parse_main_command(&KeyCode::Char('x')), None);
    assert_eq!(parse_main_command(&KeyCode::Up), None);
}

#[test]
fn parse_main_command_maps_direct_selection_keys() {
    assert_eq!(
        parse_main_command(&KeyCode::Char('e')),
        Some(UiCommand::SelectInstrument(Instrument::Eth))
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('B')),
        Some(UiCommand::SelectInstrument(Instrument::Btc))
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('s')),
        Some(UiCommand::SelectInstrument(Instrument::Sol))
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('5')),
        Some(UiCommand::SelectInterval(Interval::M5))
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('F')),
        Some(UiCommand::SelectInterval(Interval::M15))
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('h')),
        Some(UiCommand::SelectInterval(Interval::H1))
    );
}

#[test]
fn next_selection_only_reports_real_changes() {
    let current = Selection::new(Instrument::Eth, Interval::M5);
    assert_eq!(
        UiCommand::CycleInstrument.next_selection(current),
        Some(Selection::new(Instrument::Btc, Interval::M5))
    );
    assert_eq!(
        UiCommand::CycleInterval.next_selection(current),
        Some(Selection::new(Instrument::Eth, Interval::M15))
    );
    assert_eq!(
        UiCommand::SelectInstrument(Instrument::Eth).next_selection(current),
        None
    );
    assert_eq!(UiCommand::Quit.next_selection(current), None);
}
