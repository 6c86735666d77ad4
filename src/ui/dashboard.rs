use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::model::instrument::Selection;

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let visible = block.inner(area).height as usize;

        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|m| Line::from(Span::styled(m.as_str(), Style::default().fg(Color::Gray))))
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct StatusBar {
    pub selection: Selection,
    pub last_price: Option<f64>,
    pub change_pct: Option<f64>,
    pub loading: bool,
    pub tick_count: u64,
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let feed_status = if self.loading {
            Span::styled(
                " LOADING ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" LIVE ", Style::default().fg(Color::Green))
        };

        let price = self
            .last_price
            .map(|p| format!("${:.2}", p))
            .unwrap_or_else(|| "---".to_string());
        let (change, change_color) = match self.change_pct {
            Some(pct) if pct >= 0.0 => (format!("+{:.2}%", pct), Color::Green),
            Some(pct) => (format!("{:.2}%", pct), Color::Red),
            None => ("---".to_string(), Color::DarkGray),
        };

        let line = Line::from(vec![
            Span::styled(
                " sandbox-market ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.selection.instrument.label(),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" ", Style::default()),
            Span::styled(
                self.selection.interval.label(),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(price, Style::default().fg(Color::White)),
            Span::styled(" ", Style::default()),
            Span::styled(change, Style::default().fg(change_color)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            feed_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("ticks: {}", self.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(Color::Yellow);
        let text = Style::default().fg(Color::DarkGray);
        let line = Line::from(vec![
            Span::styled(" [Q]", key),
            Span::styled("uit  ", text),
            Span::styled("[T]", key),
            Span::styled("oken  ", text),
            Span::styled("[I]", key),
            Span::styled("nterval  ", text),
            Span::styled("[E]", key),
            Span::styled("TH ", text),
            Span::styled("[B]", key),
            Span::styled("TC ", text),
            Span::styled("[S]", key),
            Span::styled("OL  ", text),
            Span::styled("[5]", key),
            Span::styled("m ", text),
            Span::styled("[F]", key),
            Span::styled("15m ", text),
            Span::styled("[H]", key),
            Span::styled("1h ", text),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
