pub mod log_panel;
pub mod preview_view;

use ratatui::prelude::*;

use crate::state::PreviewState;

/// Map and stats on top, log panel below.
pub fn render(frame: &mut Frame, state: &mut PreviewState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(8)])
        .split(frame.area());

    preview_view::render(frame, state, rows[0]);
    log_panel::render(frame, &state.log, rows[1], " Log ");
}
