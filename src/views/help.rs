use ratatui::{
    prelude::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use crate::ui::styles;

const KEYS: &[(&str, &str)] = &[
    ("/", "Search the catalog and add a stock"),
    ("↑ ↓", "Move the selection"),
    ("Enter", "Add the highlighted search result"),
    ("Esc", "Close the popup"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

pub fn render(frame: &mut Frame, rect: Rect) {
    let rect = crate::ui::rect::centered(60, 16, rect);

    let mut lines = vec![
        Line::from(""),
        Line::styled(
            concat!("Stock Watch v", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];
    lines.extend(KEYS.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("{key:>6}  "), styles::primary()),
            Span::styled(*action, styles::text()),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!("Logs: {}", crate::logger::active_log_dir().display()),
        styles::dark_gray(),
    ));

    let paragraph = Paragraph::new(lines).style(styles::popup()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .padding(Padding::horizontal(2))
            .title(Span::styled(" Help ", styles::title())),
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}
