use chrono::{TimeZone, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::model::candle::Candle;
use crate::model::instrument::Selection;

const UP_COLOR: Color = Color::Rgb(0, 227, 150);
const DOWN_COLOR: Color = Color::Rgb(255, 69, 96);

pub struct CandleChart<'a> {
    candles: &'a [Candle],
    selection: Selection,
    loading: bool,
}

impl<'a> CandleChart<'a> {
    pub fn new(candles: &'a [Candle], selection: Selection) -> Self {
        Self {
            candles,
            selection,
            loading: false,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

/// Row (0 = top) for `price` in a chart `height` rows tall spanning `[min, min + range]`.
fn price_row(price: f64, min: f64, range: f64, height: usize) -> usize {
    let normalized = ((price - min) / range).clamp(0.0, 1.0);
    let offset = ((normalized * (height - 1) as f64).round() as usize).min(height - 1);
    height - 1 - offset
}

fn format_time(timestamp_ms: u64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms as i64)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " Live {} Chart ({}) ",
            self.selection.instrument, self.selection.interval
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.loading || self.candles.is_empty() {
            if inner.height > 0 {
                let mid = Rect {
                    y: inner.y + inner.height / 2,
                    height: 1,
                    ..inner
                };
                Paragraph::new("Loading…")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(UP_COLOR).add_modifier(Modifier::BOLD))
                    .render(mid, buf);
            }
            return;
        }

        if inner.height < 3 || inner.width < 4 {
            return;
        }

        let chart_height = inner.height.saturating_sub(1) as usize; // bottom row holds axis labels
        let chart_width = inner.width as usize;

        let start = self.candles.len().saturating_sub(chart_width);
        let visible = &self.candles[start..];

        let min_price = visible.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let max_price = visible
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = max_price - min_price;
        let range = if range < 0.01 { 1.0 } else { range };

        for (i, candle) in visible.iter().enumerate() {
            let x = inner.x + i as u16;
            let color = if candle.is_bullish() {
                UP_COLOR
            } else {
                DOWN_COLOR
            };
            let style = Style::default().fg(color);

            let high_row = price_row(candle.high, min_price, range, chart_height);
            let low_row = price_row(candle.low, min_price, range, chart_height);
            let body_top = price_row(candle.open.max(candle.close), min_price, range, chart_height);
            let body_bottom =
                price_row(candle.open.min(candle.close), min_price, range, chart_height);

            for row in high_row..=low_row {
                let glyph = if (body_top..=body_bottom).contains(&row) {
                    "┃"
                } else {
                    "│"
                };
                buf.set_string(x, inner.y + row as u16, glyph, style);
            }
        }

        let label_style = Style::default().fg(Color::DarkGray);
        let label_y = inner.y + inner.height - 1;
        buf.set_string(inner.x, inner.y, format!("${:.2}", max_price), label_style);
        buf.set_string(inner.x, label_y, format!("${:.2}", min_price), label_style);

        if let Some(last) = visible.last() {
            let time_label = format_time(last.timestamp_ms);
            let width = time_label.chars().count() as u16;
            if width < inner.width {
                buf.set_string(
                    inner.x + inner.width - width,
                    label_y,
                    time_label,
                    label_style,
                );
            }
        }
    }
}
