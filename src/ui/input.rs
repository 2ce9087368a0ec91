//! Input handling for the TUI.
//!
//! Keys drive focus, the menu and history; left-button mouse drags drive the
//! menu slide gesture.

use crate::app::App;
use crate::history::Traversal;
use crate::nav::DragOutcome;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::Action;

/// Main key dispatch function.
pub(super) fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Esc => {
            if app.nav.menu_visible() {
                app.nav.hide();
            } else {
                return Ok(Action::Quit);
            }
        }
        KeyCode::Char('m') | KeyCode::Tab => app.nav.toggle(),
        KeyCode::Char('j') | KeyCode::Down => app.nav.focus_next(),
        KeyCode::Char('k') | KeyCode::Up => app.nav.focus_prev(),
        KeyCode::Enter => {
            if let Some(url) = app.activate_focused()? {
                tracing::info!(url = %url, "Opening article in browser");
                if let Err(e) = open::that_detached(url.as_str()) {
                    app.set_status(format!("Failed to open browser: {}", e));
                }
            }
        }
        KeyCode::Char('r') => app.reload()?,
        KeyCode::Char('[') => {
            if !app.traverse(Traversal::Back)? {
                app.set_status("No earlier history");
            }
        }
        KeyCode::Char(']') => {
            if !app.traverse(Traversal::Forward)? {
                app.set_status("No later history");
            }
        }
        _ => {}
    }

    Ok(Action::Continue)
}

/// Translate left-button mouse drags into the menu slide gesture.
pub(super) fn handle_mouse(app: &mut App, event: MouseEvent) {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.drag_origin = Some(event.column);
            app.nav.drag_start();
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(origin) = app.drag_origin {
                let columns = i32::from(event.column) - i32::from(origin);
                app.nav.drag_move(columns.saturating_mul(app.drag_scale));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.drag_origin.take().is_some() {
                if let DragOutcome::Committed { menu_visible } = app.nav.drag_stop() {
                    tracing::debug!(menu_visible, "Menu toggled by drag");
                }
            }
        }
        _ => {}
    }
}
