//! Render functions for the TUI.

use crate::app::{App, SPINNER_FRAMES};
use crate::nav::{Viewport, MENU_WIDTH_PX};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{cards, menu, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 30;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Header and status bar rows around the card column.
const CHROME_ROWS: u16 = 2;

const SPINNER: [&str; SPINNER_FRAMES] = ["|", "/", "-", "\\", "|", "/", "-", "\\", "|", "/"];

/// Viewport the cards are laid out in for a terminal of `width` x `height`.
pub(super) fn body_viewport(width: u16, height: u16) -> Viewport {
    Viewport::new(width, height.saturating_sub(CHROME_ROWS))
}

/// Main render function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    cards::render(f, app, chunks[1]);

    let menu_width = menu_columns(app.nav.reveal_px(), app.drag_scale, chunks[1].width);
    if menu_width > 0 {
        let menu_area = Rect::new(chunks[1].x, chunks[1].y, menu_width, chunks[1].height);
        menu::render(f, app, menu_area);
    }

    status::render(f, app, chunks[2]);
}

/// Columns the menu covers when `reveal_px` of it is showing.
fn menu_columns(reveal_px: i32, px_per_column: i32, available: u16) -> u16 {
    let full = (MENU_WIDTH_PX / px_per_column.max(1)).max(1);
    let cols = reveal_px.clamp(0, MENU_WIDTH_PX) * full / MENU_WIDTH_PX;
    (cols as u16).min(available.saturating_sub(available / 4))
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.backend.name()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled(
            app.nav.category_title().to_string(),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if app.nav.is_loading() {
        spans.push(Span::raw(format!(" {}", SPINNER[app.spinner_frame % SPINNER_FRAMES])));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_columns_scale_with_reveal() {
        assert_eq!(menu_columns(0, 8, 100), 0);
        assert_eq!(menu_columns(200, 8, 100), 25);
        assert_eq!(menu_columns(100, 8, 100), 12);
    }

    #[test]
    fn test_menu_columns_leave_room_for_cards() {
        assert_eq!(menu_columns(200, 1, 40), 30);
    }

    #[test]
    fn test_body_viewport_excludes_chrome() {
        assert_eq!(body_viewport(80, 24), Viewport::new(80, 22));
        assert_eq!(body_viewport(80, 1), Viewport::new(80, 0));
    }
}
