use std::sync::Arc;

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::data::DetailRecord;
use crate::helper::{format_percent, format_price, Sign};
use crate::ui::styles;

const COLUMNS: [Constraint; 3] = [
    Constraint::Length(10),
    Constraint::Length(12),
    Constraint::Length(10),
];

/// Watched symbols with a cached record, sorted by symbol
pub fn render(frame: &mut Frame, rect: Rect, records: &[Arc<DetailRecord>], table: &mut TableState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(" Watchlist ", styles::title()));

    if records.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::styled("No stocks watched yet.", styles::label()),
            Line::styled("Press / to search and add one.", styles::dark_gray()),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(hint, rect);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Symbol"),
        Cell::from(Line::from("Close").alignment(Alignment::Right)),
        Cell::from(Line::from("Change").alignment(Alignment::Right)),
    ])
    .style(styles::header());

    let rows = records
        .iter()
        .map(|record| {
            let badge = Span::styled(
                format!(" {} ", format_percent(record.percentage)),
                styles::badge(record.percentage.sign()),
            );
            Row::new(vec![
                Cell::from(record.symbol.to_string()),
                Cell::from(Line::from(format_price(record.close)).alignment(Alignment::Right)),
                Cell::from(Line::from(badge).alignment(Alignment::Right)),
            ])
        })
        .collect::<Vec<_>>();

    let table_widget = Table::new(rows)
        .header(header)
        .block(block)
        .highlight_style(styles::text_selected())
        .widths(&COLUMNS)
        .column_spacing(2);

    frame.render_stateful_widget(table_widget, rect, table);
}
