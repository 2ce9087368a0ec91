use crate::app::App;
use crate::nav::{Card, Focus};
use crate::util::truncate_to_width;
use chrono::{TimeZone, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the card column.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let cards = app.nav.cards();
    if cards.is_empty() {
        let msg = if app.nav.is_loading() {
            "Loading..."
        } else {
            "No stories"
        };
        f.render_widget(
            Paragraph::new(msg)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let focused = match app.nav.focus() {
        Focus::Card(i) => Some(i),
        _ => None,
    };
    let start = first_visible(cards, app.nav.scroll(), focused, area.height);

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (i, card) in cards.iter().enumerate().skip(start) {
        if y >= bottom {
            break;
        }
        let height = card.height().min(bottom - y);
        let rect = Rect::new(area.x, y, area.width, height);
        render_card(f, card, focused == Some(i), rect);
        y += height;
    }
}

/// First card index to draw so the focused card is on screen.
fn first_visible(cards: &[Card], scroll: usize, focused: Option<usize>, height: u16) -> usize {
    let mut start = scroll.min(cards.len().saturating_sub(1));
    let Some(focused) = focused else {
        return start;
    };
    if focused < start {
        return focused;
    }
    let span = |from: usize| -> u32 {
        cards[from..=focused]
            .iter()
            .map(|c| u32::from(c.height()))
            .sum()
    };
    while start < focused && span(start) > u32::from(height) {
        start += 1;
    }
    start
}

fn render_card(f: &mut Frame, card: &Card, focused: bool, area: Rect) {
    let mut border = Style::default().fg(Color::Gray);
    let mut text = Style::default();
    if card.is_loading() {
        border = Style::default().fg(Color::DarkGray);
        text = text.add_modifier(Modifier::DIM);
    } else if focused {
        border = Style::default().fg(Color::Yellow);
    }

    let mut lines: Vec<Line> = Vec::with_capacity(card.title_lines().len() + card.body_lines().len() + 1);
    if let Some(image) = &card.entry().image {
        let label = truncate_to_width(image, area.width.saturating_sub(4) as usize);
        lines.push(Line::styled(
            format!("[img] {}", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    for line in card.title_lines() {
        lines.push(Line::styled(line.as_str(), text.add_modifier(Modifier::BOLD)));
    }
    for line in card.body_lines() {
        lines.push(Line::styled(line.as_str(), text));
    }

    let mut block = Block::default().borders(Borders::ALL).border_style(border);
    if let Some(age) = card.entry().published.and_then(format_age) {
        block = block.title_bottom(Line::from(age).right_aligned());
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Relative age of a unix timestamp, e.g. "5m", "3h", "2d".
fn format_age(timestamp: i64) -> Option<String> {
    let published = Utc.timestamp_opt(timestamp, 0).single()?;
    let minutes = (Utc::now() - published).num_minutes().max(0);
    Some(match minutes {
        0..=59 => format!("{}m", minutes),
        60..=1439 => format!("{}h", minutes / 60),
        _ => format!("{}d", minutes / 1440),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Entry;
    use crate::nav::Viewport;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| {
                Card::new(
                    Entry {
                        title: format!("story {}", i),
                        description: "body".to_string(),
                        ..Default::default()
                    },
                    Viewport::new(40, 20),
                )
            })
            .collect()
    }

    #[test]
    fn test_first_visible_keeps_focus_on_screen() {
        // Each card is 4 rows tall
        let cards = cards(10);
        assert_eq!(first_visible(&cards, 0, Some(0), 12), 0);
        assert_eq!(first_visible(&cards, 0, Some(2), 12), 0);
        assert_eq!(first_visible(&cards, 0, Some(5), 12), 3);
        assert_eq!(first_visible(&cards, 6, Some(2), 12), 2);
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now().timestamp();
        assert_eq!(format_age(now - 120).as_deref(), Some("2m"));
        assert_eq!(format_age(now - 3 * 3600).as_deref(), Some("3h"));
        assert_eq!(format_age(now - 2 * 86400).as_deref(), Some("2d"));
    }
}
