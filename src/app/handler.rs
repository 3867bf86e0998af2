//! Input handling: maps key/mouse events to engine calls and state mutations.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::settings::SETTINGS_ITEMS;
use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Grid => handle_grid_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
    }
    state.needs_frame = true;
}

// ── Grid view ───────────────────────────────────────────────────

fn handle_grid_key(state: &mut AppState, key: KeyEvent) {
    let page_rows = state.engine.state().capacity.rows as f32;
    let animate_zoom = state.config.animate_zoom;

    match key.code {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Char('?') => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => page(state, -1.0),
        KeyCode::Down | KeyCode::Char('j') => page(state, 1.0),
        KeyCode::PageUp => page(state, -page_rows),
        KeyCode::PageDown => page(state, page_rows),
        KeyCode::Home => state.engine.scroll_to(0.0),
        KeyCode::End => state.engine.scroll_to(state.engine.max_position() as f32),
        KeyCode::Left | KeyCode::Char('h') => move_selection(state, -1),
        KeyCode::Right | KeyCode::Char('l') => move_selection(state, 1),
        KeyCode::Enter => {
            if let Some(index) = state.engine.state().selected {
                state.status_message = Some(format!("Launching {}", state.label(index)));
            }
        }
        KeyCode::Esc => {
            state.engine.set_selected_icon(None);
            state.status_message = None;
        }
        KeyCode::Char('z') => toggle_zoom(state, animate_zoom),
        KeyCode::Char('Z') => toggle_zoom(state, !animate_zoom),
        _ => {}
    }
}

/// Ease to the row `rows` away from the nearest whole row, or from the
/// pending target while a page animation is still running.
fn page(state: &mut AppState, rows: f32) {
    let max = state.engine.max_position() as f32;
    let from = state
        .engine
        .scroll_to_target()
        .unwrap_or_else(|| state.engine.scroll_position().round());
    let target = (from + rows).clamp(0.0, max);
    state.engine.scroll_to(target);
}

fn move_selection(state: &mut AppState, step: isize) {
    let count = state.labels.len();
    if count == 0 {
        return;
    }
    let next = match state.engine.state().selected {
        Some(index) => index.saturating_add_signed(step).min(count - 1),
        None => 0,
    };
    select(state, next);

    // Bring the selected row into view.
    let columns = state.engine.state().capacity.columns.max(1);
    let row = (next / columns) as f32;
    let max = state.engine.max_position() as f32;
    let first_visible = state.engine.scroll_position().round();
    let rows = state.engine.state().capacity.rows.max(1) as f32;
    if row < first_visible {
        state.engine.scroll_to(row.min(max));
    } else if row >= first_visible + rows {
        state.engine.scroll_to((row - rows + 1.0).clamp(0.0, max));
    }
}

fn select(state: &mut AppState, index: usize) {
    state.engine.set_selected_icon(Some(index));
    state.status_message = Some(format!("Selected {}", state.label(index)));
}

fn toggle_zoom(state: &mut AppState, animate: bool) {
    let target = if state.engine.zoom_target() > 0.5 { 0.0 } else { 1.0 };
    state.engine.set_zoom(target, animate);
}

// ── Settings popup ──────────────────────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Grid;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                item.activate(state);
            }
        }
        _ => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.  Vertical pointer motion drives the scroll.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Grid {
        return;
    }
    let now = Instant::now();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(y) = drag_coordinate(state, mouse.row) else {
                return;
            };
            let area = state.last_frame.area;
            if mouse.column < area.x || mouse.column >= area.right() {
                return;
            }
            state.drag.begin(now, y);
            state.engine.on_drag_move(y);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if !state.drag.is_active() {
                return;
            }
            let Some(y) = drag_coordinate(state, mouse.row) else {
                return;
            };
            state.drag.push(now, y);
            state.engine.on_drag_move(y);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if !state.drag.is_active() {
                return;
            }
            let moved = state.drag.travel() > 0.0;
            let velocity = state.drag.finish(now);
            if moved {
                let y = drag_coordinate(state, mouse.row).unwrap_or(0.0);
                state.engine.on_fling(y, velocity);
            } else {
                state.engine.on_touch_up();
                if let Some(index) = state.last_frame.icon_at(mouse.column, mouse.row) {
                    select(state, index);
                }
            }
        }
        MouseEventKind::ScrollDown => page(state, 1.0),
        MouseEventKind::ScrollUp => page(state, -1.0),
        _ => return,
    }
    state.needs_frame = true;
}

/// Pointer row as a fraction of the grid height.
fn drag_coordinate(state: &AppState, row: u16) -> Option<f32> {
    let area = state.last_frame.area;
    if area.height == 0 {
        return None;
    }
    let row = row.clamp(area.y, area.bottom().saturating_sub(1));
    Some((row - area.y) as f32 / area.height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::engine::{Engine, SystemClock};
    use ratatui::layout::Rect;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 22,
    };

    /// Sixty icons, zoomed in, one frame drawn.  Landscape 6x3, max row 7.
    fn app() -> AppState {
        let config = AppConfig::default();
        let mut engine = Engine::new(SystemClock::new(), config.policy());
        engine.set_icon_count(60);
        engine.set_zoom(1.0, false);
        let labels = (1..=60).map(|i| format!("App {i:02}")).collect();
        let mut state = AppState::new(engine, labels, config);
        state.tick_engine(AREA);
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn first_frame_sets_up_the_grid() {
        let state = app();
        assert_eq!(state.engine.max_position(), 7);
        assert!(!state.last_frame.sprites.is_empty());
        assert!(state.needs_frame);
    }

    #[test]
    fn quit_keys() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Char('q')));
        assert!(state.should_quit);

        let mut state = app();
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }

    #[test]
    fn arrows_page_by_one_row() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Down));
        assert!(state.engine.is_scroll_to_active());
        assert_eq!(state.engine.state().scroll_to.target(), 1.0);

        // Already at the top: paging up clamps to row 0.
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.engine.state().scroll_to.target(), 0.0);
    }

    #[test]
    fn end_and_page_down_stop_at_the_last_row() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::End));
        assert_eq!(state.engine.state().scroll_to.target(), 7.0);

        let mut state = app();
        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.engine.state().scroll_to.target(), 3.0);
    }

    #[test]
    fn zoom_toggle_respects_the_animate_setting() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Char('Z')));
        // Instant toggle lands immediately.
        assert_eq!(state.engine.zoom(), 0.0);

        handle_key(&mut state, key(KeyCode::Char('z')));
        assert_eq!(state.engine.zoom_target(), 1.0);
        assert_eq!(state.engine.zoom(), 0.0);
    }

    #[test]
    fn settings_popup_navigation() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Char('?')));
        assert_eq!(state.active_view, ActiveView::SettingsMenu);

        for _ in 0..SETTINGS_ITEMS.len() + 3 {
            handle_key(&mut state, key(KeyCode::Down));
        }
        assert_eq!(state.settings_selected, SETTINGS_ITEMS.len() - 1);

        // Grid keys are ignored while the popup is open.
        handle_key(&mut state, key(KeyCode::End));
        assert!(!state.engine.is_scroll_to_active());

        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Grid);
    }

    #[test]
    fn selection_moves_and_scrolls_into_view() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Right));
        assert_eq!(state.engine.state().selected, Some(0));

        // Icon 18 sits on row 3, just past the three visible rows.
        for _ in 0..18 {
            handle_key(&mut state, key(KeyCode::Right));
        }
        assert_eq!(state.engine.state().selected, Some(18));
        assert_eq!(state.engine.state().scroll_to.target(), 1.0);

        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.engine.state().selected, None);
    }

    #[test]
    fn click_selects_the_icon_under_the_pointer() {
        let mut state = app();
        let (column, row) = (0..AREA.height)
            .flat_map(|r| (0..AREA.width).map(move |c| (c, r)))
            .find(|&(c, r)| state.last_frame.icon_at(c, r) == Some(7))
            .expect("icon 7 is on screen");

        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert!(state.engine.is_dragging());
        handle_mouse(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), column, row));

        assert!(!state.engine.is_dragging());
        assert_eq!(state.engine.state().selected, Some(7));
    }

    #[test]
    fn dragging_up_scrolls_forward() {
        let mut state = app();
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 40, 15));
        handle_mouse(&mut state, mouse(MouseEventKind::Drag(MouseButton::Left), 40, 10));
        assert!(state.engine.scroll_position() > 1.0);

        handle_mouse(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), 40, 10));
        assert!(!state.engine.is_dragging());
        assert!(!state.drag.is_active());
        assert_eq!(state.engine.state().selected, None);
    }

    #[test]
    fn repeated_paging_builds_on_the_pending_target() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.engine.scroll_to_target(), Some(3.0));

        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.engine.scroll_to_target(), Some(2.0));
    }

    #[test]
    fn wheel_pages() {
        let mut state = app();
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 10, 10));
        assert_eq!(state.engine.state().scroll_to.target(), 1.0);
    }

    #[test]
    fn stray_release_is_ignored() {
        let mut state = app();
        state.needs_frame = false;
        handle_mouse(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), 10, 10));
        assert!(!state.needs_frame);
    }
}
