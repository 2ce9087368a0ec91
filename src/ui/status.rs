use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_str())
    } else if app.nav.menu_visible() {
        Cow::Borrowed("[j/k]move [Enter]open category [m/Esc]close menu [q]uit")
    } else {
        Cow::Borrowed("[m]enu [j/k]move [Enter]open [r]eload [[/]]history [q]uit")
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
