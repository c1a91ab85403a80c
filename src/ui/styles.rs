use std::cmp::Ordering;

use ratatui::style::{Color, Modifier, Style};

#[inline]
pub fn header() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn dark_gray() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn label() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn text() -> Style {
    Style::default().fg(Color::Reset)
}

#[inline]
pub fn primary() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

#[inline]
pub fn text_selected() -> Style {
    text().add_modifier(Modifier::REVERSED)
}

#[inline]
pub fn popup() -> Style {
    text()
}

#[inline]
pub fn title() -> Style {
    text()
}

#[inline]
pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Gains and unchanged prices are green, losses red
#[inline]
pub fn up(val: Ordering) -> Style {
    Style::default().fg(up_color(val))
}

#[inline]
pub fn up_color(val: Ordering) -> Color {
    match val {
        Ordering::Less => Color::LightRed,
        Ordering::Equal | Ordering::Greater => Color::LightGreen,
    }
}

/// Percentage badge: dark text on the up/down color
#[inline]
pub fn badge(val: Ordering) -> Style {
    Style::default().fg(Color::Black).bg(up_color(val))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_counts_as_gain() {
        assert_eq!(up_color(Ordering::Equal), up_color(Ordering::Greater));
        assert_ne!(up_color(Ordering::Less), up_color(Ordering::Greater));
        assert_eq!(badge(Ordering::Less).bg, Some(Color::LightRed));
    }
}
