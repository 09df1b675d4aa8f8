//! Keyboard input dispatch: overlays first, then dashboard keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, ViewMode};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::AddTickers => {
            handle_add_overlay(app, key);
            return;
        }
        Overlay::RemoveTicker => {
            handle_remove_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Dashboard keys.
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char(']') => app.raise_min_drawdown(),
        KeyCode::Char('[') => app.lower_min_drawdown(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_tab(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.prev_tab(),
        KeyCode::Char('j') | KeyCode::Down => {
            let max = scroll_limit(app);
            app.scroll_down(max);
        }
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('c') => app.toggle_chart(),
        KeyCode::Char('t') => app.toggle_table(),
        KeyCode::Char('e') => app.export(),
        KeyCode::Char('r') => {
            if app.is_loading() {
                app.set_warning("Load already in progress");
            } else {
                app.request_refresh();
            }
        }
        KeyCode::Char('a') => {
            app.input.clear();
            app.overlay = Overlay::AddTickers;
        }
        KeyCode::Char('x') => {
            if app.filters.has_extras() {
                app.remove_cursor = 0;
                app.overlay = Overlay::RemoveTicker;
            } else {
                app.set_warning("No added tickers to remove");
            }
        }
        _ => {}
    }
}

/// Scroll positions available for the current body: card rows or table rows.
fn scroll_limit(app: &AppState) -> usize {
    let items = app.current_items().len();
    match app.view_mode {
        ViewMode::Cards => items.div_ceil(drawdown_runner::view::CARDS_PER_ROW),
        ViewMode::Table => items,
    }
}

fn handle_add_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.input.clear();
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.input);
            app.overlay = Overlay::None;
            if !input.trim().is_empty() {
                app.add_tickers(&input);
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c)
            if c.is_ascii_alphanumeric() || matches!(c, ',' | ' ' | '.' | '-' | '^' | '=') =>
        {
            app.input.push(c);
        }
        _ => {}
    }
}

fn handle_remove_overlay(app: &mut AppState, key: KeyEvent) {
    let count = app.filters.extra_tickers().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.remove_cursor + 1 < count {
                app.remove_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.remove_cursor = app.remove_cursor.saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char('d') | KeyCode::Delete => {
            app.remove_extra(app.remove_cursor);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerCommand;
    use drawdown_core::catalog::Catalog;
    use drawdown_runner::SessionFilters;
    use std::path::PathBuf;
    use std::sync::mpsc;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> (AppState, mpsc::Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let app = AppState::new(
            Catalog::builtin(),
            SessionFilters::default(),
            "synthetic",
            PathBuf::from("."),
            cmd_tx,
            resp_rx,
        );
        (app, cmd_rx)
    }

    #[test]
    fn quit_and_help() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.overlay, Overlay::Help);
        // Any key closes help without acting.
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn typing_tickers_adds_them() {
        let (mut app, rx) = app();
        press(&mut app, KeyCode::Char('a'));
        for c in "pltr, uber".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.filters.extra_tickers(), ["PLTR", "UBER"]);
        assert!(matches!(rx.try_recv(), Ok(WorkerCommand::Load { .. })));
    }

    #[test]
    fn remove_overlay_needs_extras() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.overlay, Overlay::None);

        app.filters.add_tickers("UBER, HOOD");
        app.recompute();
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.overlay, Overlay::RemoveTicker);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filters.extra_tickers(), ["UBER"]);
        press(&mut app, KeyCode::Enter);
        assert!(app.filters.extra_tickers().is_empty());
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn filter_keys_step_through_stops() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.filters.min_drawdown.pct(), 10);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.filters.min_drawdown.pct(), 5);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.view_mode, ViewMode::Table);
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx) = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }
}
