//! TUI-local state (not shared with the controller).

use std::time::{Duration, Instant};

use promptdesk::settings::Toast;

/// A toast on screen, with the moment it appeared.
pub(crate) struct VisibleToast {
    pub(crate) toast: Toast,
    pub(crate) shown_at: Instant,
}

pub(crate) struct App {
    /// Byte offset of the cursor in the edit buffer.
    pub(crate) cursor: usize,
    /// First visible row / column of the editor viewport.
    pub(crate) scroll_row: u16,
    pub(crate) scroll_col: u16,
    /// Toasts still within their display time, oldest first.
    pub(crate) toasts: Vec<VisibleToast>,
    pub(crate) should_quit: bool,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            cursor: 0,
            scroll_row: 0,
            scroll_col: 0,
            toasts: Vec::new(),
            should_quit: false,
        }
    }

    pub(crate) fn push_toasts(&mut self, toasts: Vec<Toast>, now: Instant) {
        self.toasts
            .extend(toasts.into_iter().map(|toast| VisibleToast {
                toast,
                shown_at: now,
            }));
    }

    /// Drop toasts older than `ttl`.
    pub(crate) fn expire_toasts(&mut self, ttl: Duration, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < ttl);
    }

    /// Adjust the viewport so the cursor cell stays visible.
    ///
    /// Afterwards `scroll_row <= row` and `scroll_col <= col`.
    pub(crate) fn follow_cursor(&mut self, row: u16, col: u16, height: u16, width: u16) {
        self.scroll_row = follow(self.scroll_row, row, height);
        self.scroll_col = follow(self.scroll_col, col, width);
    }
}

fn follow(scroll: u16, pos: u16, extent: u16) -> u16 {
    if pos < scroll {
        pos
    } else if extent > 0 && pos - scroll >= extent {
        pos - (extent - 1)
    } else {
        scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdesk::settings::Notice;

    const NOTICE: Notice = Notice {
        title: "保存成功",
        description: "提示词已更新",
    };

    #[test]
    fn app_defaults() {
        let app = App::new();
        assert!(!app.should_quit);
        assert_eq!(app.cursor, 0);
        assert_eq!((app.scroll_row, app.scroll_col), (0, 0));
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn toasts_expire_after_ttl() {
        let mut app = App::new();
        let start = Instant::now();
        app.push_toasts(vec![Toast::success(NOTICE)], start);

        app.expire_toasts(Duration::from_secs(4), start + Duration::from_secs(3));
        assert_eq!(app.toasts.len(), 1);
        app.expire_toasts(Duration::from_secs(4), start + Duration::from_secs(4));
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn viewport_follows_cursor() {
        let mut app = App::new();
        app.follow_cursor(12, 0, 10, 40);
        assert_eq!(app.scroll_row, 3);
        app.follow_cursor(1, 0, 10, 40);
        assert_eq!(app.scroll_row, 1);
        app.follow_cursor(1, 45, 10, 40);
        assert_eq!(app.scroll_col, 6);
    }

    #[test]
    fn viewport_follows_cursor_at_u16_limit() {
        let mut app = App::new();
        app.follow_cursor(u16::MAX, u16::MAX, 10, 40);
        assert_eq!(app.scroll_row, u16::MAX - 9);
        assert_eq!(app.scroll_col, u16::MAX - 39);
    }
}
