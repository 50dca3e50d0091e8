// ── Process-wide state, explicitly owned ──────────────────────────────────────
//
// Everything a backend would otherwise keep in globals: which window has
// focus, whether the window class is registered, and where errors go.  Shared
// by reference between the platform object and its windows; all mutation
// goes through `Cell`/`RefCell` because the window procedure re-enters while
// the caller is still inside `poll_events`.

use std::cell::{Cell, RefCell};

use crate::error::{ErrorCategory, SashError};

/// Identifies a window for the lifetime of its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u64);

type ErrorCallback = Box<dyn FnMut(ErrorCategory, &str)>;

/// Owned replacement for the library's global state.
pub struct Context {
    focused: Cell<Option<WindowId>>,
    class_registered: Cell<bool>,
    next_id: Cell<u64>,
    error_callback: RefCell<Option<ErrorCallback>>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            focused: Cell::new(None),
            class_registered: Cell::new(false),
            next_id: Cell::new(1),
            error_callback: RefCell::new(None),
        }
    }

    /// The window that currently has keyboard focus, if it is one of ours.
    pub fn focused_window(&self) -> Option<WindowId> {
        self.focused.get()
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn set_focused_window(&self, id: Option<WindowId>) {
        self.focused.set(id);
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn class_registered(&self) -> bool {
        self.class_registered.get()
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn set_class_registered(&self, registered: bool) {
        self.class_registered.set(registered);
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn allocate_window_id(&self) -> WindowId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        WindowId(id)
    }

    /// Install the callback that receives every reported failure.
    pub fn set_error_callback<F>(&self, callback: F)
    where
        F: FnMut(ErrorCategory, &str) + 'static,
    {
        *self.error_callback.borrow_mut() = Some(Box::new(callback));
    }

    /// Log `err`, hand it to the error callback, and give it back so the
    /// caller can return it.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn report(&self, err: SashError) -> SashError {
        log::error!("{err}");
        // A failure raised from inside the callback itself is only logged.
        if let Ok(mut slot) = self.error_callback.try_borrow_mut() {
            if let Some(callback) = slot.as_mut() {
                callback(err.category(), &err.to_string());
            }
        }
        err
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn ids_are_unique() {
        let ctx = Context::new();
        let a = ctx.allocate_window_id();
        let b = ctx.allocate_window_id();
        assert_ne!(a, b);
    }

    #[test]
    fn report_invokes_callback_with_category() {
        let ctx = Context::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctx.set_error_callback(move |category, msg| {
            sink.borrow_mut().push((category, msg.to_owned()));
        });

        let err = ctx.report(SashError::Win32 {
            function: "RegisterClassExW",
            code: 1410,
        });
        assert_eq!(err.category(), ErrorCategory::PlatformError);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, ErrorCategory::PlatformError);
        assert!(seen[0].1.contains("RegisterClassExW"));
    }

    #[test]
    fn report_without_callback_still_returns_error() {
        let ctx = Context::new();
        let err = ctx.report(SashError::OutOfMemory("converting icon"));
        assert_eq!(err.category(), ErrorCategory::OutOfMemory);
    }

    #[test]
    fn focus_and_class_flags() {
        let ctx = Context::new();
        assert_eq!(ctx.focused_window(), None);
        assert!(!ctx.class_registered());

        let id = ctx.allocate_window_id();
        ctx.set_focused_window(Some(id));
        ctx.set_class_registered(true);
        assert_eq!(ctx.focused_window(), Some(id));
        assert!(ctx.class_registered());
    }
}
