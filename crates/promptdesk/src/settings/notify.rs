//! Transient toast notifications.
//!
//! The page controller reports each terminal outcome through a
//! [`Notifier`]. [`ToastBuffer`] is the stock implementation: a bounded,
//! shared queue that a frontend drains at its own pace. It has its own
//! mutex, separate from `SettingsState`, so notifying never contends with
//! rendering.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;

use super::messages::Notice;

/// Maximum toasts kept before the oldest are dropped.
pub const MAX_TOASTS: usize = 64;
/// Trim to this many when the cap is exceeded.
pub const TOAST_TRIM_TO: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Error,
}

/// One user-visible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    /// Wall-clock time the toast was raised, `HH:MM:SS`.
    pub time: String,
}

impl Toast {
    pub fn success(notice: Notice) -> Self {
        Self::new(notice, ToastVariant::Success)
    }

    pub fn error(notice: Notice) -> Self {
        Self::new(notice, ToastVariant::Error)
    }

    fn new(notice: Notice, variant: ToastVariant) -> Self {
        Self {
            title: notice.title.to_string(),
            description: notice.description.to_string(),
            variant,
            time: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == ToastVariant::Error
    }
}

/// Sink for toasts raised by the settings page.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// A shared buffer of pending toasts.
#[derive(Clone, Default)]
pub struct ToastBuffer(Arc<Mutex<Vec<Toast>>>);

impl ToastBuffer {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::with_capacity(8))))
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panicking frontend must not swallow later toasts.
    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for ToastBuffer {
    fn notify(&self, toast: Toast) {
        let mut buf = self.lock();
        buf.push(toast);
        if buf.len() > MAX_TOASTS {
            let trim_to = buf.len() - TOAST_TRIM_TO;
            buf.drain(..trim_to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTICE: Notice = Notice {
        title: "保存成功",
        description: "提示词已更新",
    };

    #[test]
    fn drain_empties_the_buffer() {
        let buf = ToastBuffer::new();
        buf.notify(Toast::success(NOTICE));
        buf.notify(Toast::error(NOTICE));
        assert_eq!(buf.len(), 2);

        let toasts = buf.drain();
        assert_eq!(toasts.len(), 2);
        assert!(!toasts[0].is_error());
        assert!(toasts[1].is_error());
        assert!(buf.is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let buf = ToastBuffer::new();
        let handle = buf.clone();
        handle.notify(Toast::success(NOTICE));
        assert_eq!(buf.drain()[0].title, "保存成功");
    }

    #[test]
    fn buffer_is_bounded() {
        let buf = ToastBuffer::new();
        for _ in 0..=MAX_TOASTS {
            buf.notify(Toast::success(NOTICE));
        }
        assert_eq!(buf.len(), TOAST_TRIM_TO);
    }

    #[test]
    fn poisoned_buffer_still_records_toasts() {
        let buf = ToastBuffer::new();
        let inner = buf.0.clone();
        let _ = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("frontend crashed while holding the toast lock");
        })
        .join();
        assert!(buf.0.is_poisoned());

        buf.notify(Toast::error(NOTICE));
        assert_eq!(buf.len(), 1);
        assert!(!buf.is_empty());
        assert_eq!(buf.drain().len(), 1);
    }

    #[test]
    fn toast_time_is_clock_formatted() {
        let toast = Toast::success(NOTICE);
        assert_eq!(toast.time.len(), 8);
        assert_eq!(toast.time.matches(':').count(), 2);
    }
}
