//! Key handling for the settings page.

use std::sync::Mutex;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use promptdesk::settings::{SettingsState, lock_state};

use crate::PageCommand;
use crate::app::App;
use crate::editor;

/// Lines moved by PageUp / PageDown.
const PAGE_LINES: usize = 10;

/// Apply a key press to the buffer, returning an action to dispatch.
///
/// While a request is in flight the buffer is read-only and no action is
/// returned; the cursor can still move.
pub(crate) fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    state: &Mutex<SettingsState>,
) -> Option<PageCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => {
                app.should_quit = true;
                None
            }
            KeyCode::Char('s') => enabled(state, PageCommand::Save),
            KeyCode::Char('r') => enabled(state, PageCommand::Reset),
            KeyCode::Char('l') => enabled(state, PageCommand::Reload),
            _ => None,
        };
    }

    let mut s = lock_state(state);
    let editable = s.actions_enabled();
    let text = &mut s.prompt;
    let cursor = &mut app.cursor;
    editor::clamp(text, cursor);

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(c) if editable => editor::insert(text, cursor, c),
        KeyCode::Enter if editable => editor::insert(text, cursor, '\n'),
        KeyCode::Backspace if editable => editor::backspace(text, cursor),
        KeyCode::Delete if editable => editor::delete(text, cursor),
        KeyCode::Left => editor::left(text, cursor),
        KeyCode::Right => editor::right(text, cursor),
        KeyCode::Up => editor::up(text, cursor),
        KeyCode::Down => editor::down(text, cursor),
        KeyCode::Home => editor::home(text, cursor),
        KeyCode::End => editor::end(text, cursor),
        KeyCode::PageUp => (0..PAGE_LINES).for_each(|_| editor::up(text, cursor)),
        KeyCode::PageDown => (0..PAGE_LINES).for_each(|_| editor::down(text, cursor)),
        _ => {}
    }
    None
}

fn enabled(state: &Mutex<SettingsState>, command: PageCommand) -> Option<PageCommand> {
    lock_state(state).actions_enabled().then_some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdesk::settings::{PageAction, RequestState};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_edits_shared_buffer() {
        let state = Mutex::new(SettingsState::default());
        let mut app = App::new();
        for c in "Hi".chars() {
            handle_key_event(press(KeyCode::Char(c)), &mut app, &state);
        }
        handle_key_event(press(KeyCode::Enter), &mut app, &state);
        handle_key_event(press(KeyCode::Char('!')), &mut app, &state);
        handle_key_event(press(KeyCode::Left), &mut app, &state);
        handle_key_event(press(KeyCode::Backspace), &mut app, &state);

        assert_eq!(lock_state(&state).prompt, "Hi!");
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn save_and_reset_dispatch_when_idle() {
        let state = Mutex::new(SettingsState::default());
        let mut app = App::new();
        assert_eq!(
            handle_key_event(ctrl('s'), &mut app, &state),
            Some(PageCommand::Save)
        );
        assert_eq!(
            handle_key_event(ctrl('r'), &mut app, &state),
            Some(PageCommand::Reset)
        );
        assert_eq!(lock_state(&state).prompt, "");
    }

    #[test]
    fn actions_disabled_while_in_flight() {
        let state = Mutex::new(SettingsState {
            request: RequestState::InFlight(PageAction::Reset),
            ..Default::default()
        });
        let mut app = App::new();
        assert_eq!(handle_key_event(ctrl('s'), &mut app, &state), None);
        assert_eq!(handle_key_event(ctrl('r'), &mut app, &state), None);
        assert_eq!(handle_key_event(ctrl('l'), &mut app, &state), None);
    }

    #[test]
    fn reload_dispatches_when_idle() {
        let state = Mutex::new(SettingsState::default());
        let mut app = App::new();
        assert_eq!(
            handle_key_event(ctrl('l'), &mut app, &state),
            Some(PageCommand::Reload)
        );
    }

    #[test]
    fn buffer_is_read_only_while_in_flight() {
        let state = Mutex::new(SettingsState {
            prompt: "draft".into(),
            request: RequestState::InFlight(PageAction::Save),
            ..Default::default()
        });
        let mut app = App::new();
        app.cursor = 5;

        handle_key_event(press(KeyCode::Char('x')), &mut app, &state);
        handle_key_event(press(KeyCode::Enter), &mut app, &state);
        handle_key_event(press(KeyCode::Backspace), &mut app, &state);
        assert_eq!(lock_state(&state).prompt, "draft");

        handle_key_event(press(KeyCode::Home), &mut app, &state);
        assert_eq!(app.cursor, 0);
        handle_key_event(press(KeyCode::Delete), &mut app, &state);
        assert_eq!(lock_state(&state).prompt, "draft");

        lock_state(&state).request = RequestState::Idle;
        handle_key_event(press(KeyCode::Delete), &mut app, &state);
        assert_eq!(lock_state(&state).prompt, "raft");
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let state = Mutex::new(SettingsState::default());
        let mut app = App::new();
        handle_key_event(press(KeyCode::Esc), &mut app, &state);
        assert!(app.should_quit);

        let mut app = App::new();
        handle_key_event(ctrl('c'), &mut app, &state);
        assert!(app.should_quit);
    }

    #[test]
    fn cursor_is_clamped_after_external_change() {
        let state = Mutex::new(SettingsState {
            prompt: "long text from server".into(),
            ..Default::default()
        });
        let mut app = App::new();
        app.cursor = 21;
        lock_state(&state).prompt.clear();

        handle_key_event(press(KeyCode::Char('x')), &mut app, &state);
        assert_eq!(lock_state(&state).prompt, "x");
        assert_eq!(app.cursor, 1);
    }
}
