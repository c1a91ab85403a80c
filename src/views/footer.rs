use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::styles;

pub fn render(frame: &mut Frame, rect: Rect, watched: usize, cached: usize) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rect);

    let mut spans = Vec::with_capacity(8);
    for (key, action) in [("/", "search"), ("↑↓", "select"), ("?", "help"), ("q", "quit")] {
        spans.push(Span::styled(format!(" {key} "), styles::primary()));
        spans.push(Span::styled(format!("{action}  "), styles::dark_gray()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    // records still being fetched show up as the gap between the two counts
    let status = if cached < watched {
        format!("loading {cached}/{watched} ")
    } else {
        format!("{watched} watched ")
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status, styles::label())).alignment(Alignment::Right),
        chunks[1],
    );
}
