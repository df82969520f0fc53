//! Rendering for the settings page.

use std::sync::Mutex;

use promptdesk::UserId;
use promptdesk::settings::{Messages, RequestState, SettingsState, ToastVariant, lock_state};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, VisibleToast};
use crate::editor;

/// What a frame needs from `SettingsState`.
///
/// Cloned in one shot so the state lock is never held while widgets are
/// built or drawn.
struct RenderSnapshot {
    user: Option<UserId>,
    prompt: String,
    request: RequestState,
}

fn snapshot(state: &Mutex<SettingsState>) -> RenderSnapshot {
    let s = lock_state(state);
    RenderSnapshot {
        user: s.user.clone(),
        prompt: s.prompt.clone(),
        request: s.request,
    }
}

pub(crate) fn render(
    frame: &mut Frame,
    state: &Mutex<SettingsState>,
    app: &mut App,
    messages: &Messages,
) {
    let snap = snapshot(state);

    // [4] heading | [flex] editor | [toasts] | [1] actions.
    let toast_height = (app.toasts.len() as u16).min(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(toast_height),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], messages);
    render_editor(frame, chunks[1], &snap, app, messages);
    render_toasts(frame, chunks[2], &app.toasts);
    render_actions(frame, chunks[3], &snap, messages);
}

fn render_header(frame: &mut Frame, area: Rect, messages: &Messages) {
    let text = vec![
        Line::from(Span::styled(
            messages.heading,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            messages.intro,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(paragraph, area);
}

fn render_editor(
    frame: &mut Frame,
    area: Rect,
    snap: &RenderSnapshot,
    app: &mut App,
    messages: &Messages,
) {
    let title = match snap.user {
        Some(ref user) => format!(" {user} "),
        None => format!(" {} ", messages.not_logged_in.title),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(title);
    let inner = block.inner(area);

    if snap.prompt.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            messages.placeholder,
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        app.scroll_row = 0;
        app.scroll_col = 0;
        frame.set_cursor_position((inner.x, inner.y));
        return;
    }

    // Cursor cell: row in lines, column in display cells (CJK is 2 wide).
    editor::clamp(&snap.prompt, &mut app.cursor);
    let (row, _) = editor::position(&snap.prompt, app.cursor);
    let col = Span::raw(editor::line_prefix(&snap.prompt, app.cursor)).width();
    let (row, col) = (to_cell(row), to_cell(col));
    app.follow_cursor(row, col, inner.height, inner.width);

    let lines: Vec<Line> = snap.prompt.split('\n').map(Line::raw).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.scroll_row, app.scroll_col));
    frame.render_widget(paragraph, area);

    frame.set_cursor_position((
        inner.x.saturating_add(col - app.scroll_col),
        inner.y.saturating_add(row - app.scroll_row),
    ));
}

/// Terminal coordinates are u16; anything further out pins to the edge.
fn to_cell(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[VisibleToast]) {
    if area.height == 0 {
        return;
    }
    let skip = toasts.len().saturating_sub(area.height as usize);
    let lines: Vec<Line> = toasts
        .iter()
        .skip(skip)
        .map(|t| {
            let (marker, style) = match t.toast.variant {
                ToastVariant::Success => ("✓", Style::default().fg(Color::Green)),
                ToastVariant::Error => (
                    "✗",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            };
            Line::from(vec![
                Span::styled(format!(" {marker} {}", t.toast.title), style),
                Span::raw("  "),
                Span::styled(
                    t.toast.description.clone(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_actions(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, messages: &Messages) {
    let enabled = snap.request.is_idle();
    let button = |key: &'static str, label: &'static str| {
        let style = if enabled {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        vec![
            Span::styled(format!(" {key} "), Style::default().fg(Color::DarkGray)),
            Span::styled(format!(" {label} "), style),
            Span::raw("  "),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(button("^S", messages.save_label));
    spans.extend(button("^R", messages.reset_label));
    if let RequestState::InFlight(action) = snap.request {
        spans.push(Span::styled(
            format!("{action:?}…"),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        "^L reload  Esc quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdesk::settings::Locale;
    use ratatui::backend::TestBackend;

    #[test]
    fn to_cell_saturates() {
        assert_eq!(to_cell(12), 12);
        assert_eq!(to_cell(usize::from(u16::MAX) + 1), u16::MAX);
        assert_eq!(to_cell(usize::MAX), u16::MAX);
    }

    #[test]
    fn renders_line_wider_than_u16() {
        let long = "x".repeat(usize::from(u16::MAX) + 10);
        let state = Mutex::new(SettingsState {
            prompt: long.clone(),
            ..Default::default()
        });
        let mut app = App::new();
        app.cursor = long.len();
        let messages = Messages::for_locale(Locale::En);
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();

        terminal
            .draw(|frame| render(frame, &state, &mut app, messages))
            .unwrap();
        assert!(app.scroll_col > 0);
    }
}
