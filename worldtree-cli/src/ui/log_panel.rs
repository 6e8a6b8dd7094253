use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::LogBuffer;

fn level_style(level: log::Level) -> Style {
    match level {
        log::Level::Error => Style::default().fg(Color::Red).bold(),
        log::Level::Warn => Style::default().fg(Color::Yellow),
        log::Level::Info => Style::default().fg(Color::Green),
        log::Level::Debug => Style::default().fg(Color::Blue),
        log::Level::Trace => Style::default().fg(Color::DarkGray),
    }
}

pub fn render(frame: &mut Frame, log: &LogBuffer, area: Rect, title: &str) {
    let visible = area.height.saturating_sub(2) as usize;
    // Show the window ending at the scroll position.
    let end = (log.scroll_offset + 1).min(log.lines.len());
    let start = end.saturating_sub(visible);

    let lines: Vec<Line> = log.lines[start..end]
        .iter()
        .map(|line| {
            Line::from(vec![
                Span::styled(
                    line.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{:<5} ", line.level), level_style(line.level)),
                Span::raw(line.text.clone()),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}
