use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::ui::{styles, text::truncate};
use crate::widgets::CatalogSearch;

pub const PROMPT: &str = "Type a company name or stock symbol:";

fn safe_cursor_x(chunk_x: u16, visual_cursor: usize) -> u16 {
    let offset = u16::try_from(visual_cursor).unwrap_or(u16::MAX - 1);
    chunk_x.saturating_add(offset).saturating_add(1)
}

pub fn render(frame: &mut Frame, rect: Rect, search: &mut CatalogSearch, catalog_len: usize) {
    const MAX_SIZE: (u16, u16) = (60, 24);
    let rect = crate::ui::rect::centered(MAX_SIZE.0, MAX_SIZE.1, rect);
    frame.render_widget(Clear, rect);

    let chunks = Layout::default()
        .margin(1)
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Percentage(100)].as_ref())
        .split(rect);

    let input = &search.input;
    // one line, without scroll
    let paragraph = Paragraph::new(input.value()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .title(Span::styled(PROMPT, styles::title())),
    );
    frame.render_widget(paragraph, chunks[0]);
    frame.set_cursor(
        safe_cursor_x(chunks[0].x, input.visual_cursor()),
        chunks[0].y + 1,
    );

    let title = if catalog_len == 0 {
        " Loading catalog… ".to_string()
    } else if search.query().is_empty() {
        String::new()
    } else {
        format!(" {} matches ", search.options().len())
    };

    // symbol column, spacing and borders
    let name_width = usize::from(rect.width.saturating_sub(14));
    let rows = search
        .options()
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(Span::styled(entry.symbol.to_string(), styles::popup())),
                Cell::from(Span::styled(
                    truncate(&entry.name, name_width).into_owned(),
                    styles::label(),
                )),
            ])
        })
        .collect::<Vec<_>>();

    let column_constraints = [Constraint::Length(8), Constraint::Min(20)];
    let table = Table::new(rows)
        .block(
            Block::default()
                .borders(Borders::all())
                .border_style(styles::border())
                .title(Span::styled(title, styles::dark_gray())),
        )
        .highlight_style(styles::text_selected())
        .widths(&column_constraints)
        .column_spacing(2);

    frame.render_stateful_widget(table, chunks[1], &mut search.table);
}

#[cfg(test)]
mod tests {
    use super::safe_cursor_x;

    #[test]
    fn cursor_stays_inside_u16() {
        assert_eq!(safe_cursor_x(4, 3), 8);
        assert_eq!(safe_cursor_x(u16::MAX - 2, 10), u16::MAX);
        assert_eq!(safe_cursor_x(0, usize::MAX), u16::MAX);
    }
}
