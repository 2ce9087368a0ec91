use crate::app::App;
use crate::nav::Focus;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

/// Render the slide-out category menu over the left edge of `area`.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let focused = match app.nav.focus() {
        Focus::Menu(i) => Some(i),
        _ => None,
    };

    let items: Vec<ListItem> = app
        .nav
        .menu()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if item.active { "* " } else { "  " };
            let mut style = Style::default();
            if item.active {
                style = style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
            }
            // Unfocusable items render dimmed; keyboard focus never lands on them
            if !item.focusable {
                style = style.add_modifier(Modifier::DIM);
            } else if focused == Some(i) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(item.category.title.as_str(), style),
            ]))
        })
        .collect();

    let border_style = if app.nav.menu_visible() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(app.backend.name()),
    );

    let mut state = ListState::default().with_selected(focused);
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}
