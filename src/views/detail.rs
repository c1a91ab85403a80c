use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::data::DetailRecord;
use crate::helper::{format_percent, format_price, format_volume, Sign};
use crate::ui::{styles, text::truncate};

pub fn render(frame: &mut Frame, rect: Rect, record: Option<&DetailRecord>) {
    let Some(record) = record else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .title(Span::styled(" Detail ", styles::title()));
        frame.render_widget(
            Paragraph::new(Line::styled("Nothing selected", styles::dark_gray())).block(block),
            rect,
        );
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .padding(Padding::horizontal(1))
        .title(Span::styled(
            format!(
                " {} ",
                truncate(record.display_name(), usize::from(rect.width.saturating_sub(4)))
            ),
            styles::primary(),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)].as_ref())
        .split(inner);

    let change = Line::from(vec![
        Span::styled(record.symbol.to_string(), styles::label()),
        Span::raw("  "),
        Span::styled(format_price(record.close), styles::up(record.percentage.sign())),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", format_percent(record.percentage)),
            styles::badge(record.percentage.sign()),
        ),
    ]);
    frame.render_widget(Paragraph::new(change), chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);

    let left = Paragraph::new(vec![
        price_line("OPEN", record.open),
        price_line("CLOSE", record.close),
        Line::from(vec![
            Span::styled(format!("{:<7}", "VOLUME"), styles::label()),
            Span::styled(format_volume(record.volume), styles::text()),
        ]),
    ]);
    let right = Paragraph::new(vec![price_line("LOW", record.low), price_line("HIGH", record.high)]);
    frame.render_widget(left, columns[0]);
    frame.render_widget(right, columns[1]);
}

fn price_line(label: &'static str, value: Decimal) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<7}"), styles::label()),
        Span::styled(format_price(value), styles::text()),
    ])
}
