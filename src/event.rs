// ── Outbound event surface ────────────────────────────────────────────────────
//
// `InputSink` is the contract every backend reports through: one method per
// callback, each with a no-op default.  `Event` is the same surface as a
// tagged union, used to queue events inside the window procedure and to
// record them in tests.

use crate::input::{Action, Key, MouseButton};

/// Receiver for everything a window reports.
///
/// Methods are called on the thread that pumps messages, from inside
/// `poll_events` / `wait_events`.
pub trait InputSink {
    fn key(&mut self, _key: Key, _action: Action) {}
    fn character(&mut self, _ch: char) {}
    fn mouse_click(&mut self, _button: MouseButton, _action: Action) {}
    /// Client-area position in normal mode; accumulated virtual position
    /// when the cursor is captured.
    fn cursor_motion(&mut self, _x: f64, _y: f64) {}
    fn cursor_enter(&mut self, _entered: bool) {}
    fn scroll(&mut self, _x: f64, _y: f64) {}
    /// New client-area size.
    fn window_size(&mut self, _width: i32, _height: i32) {}
    /// New client-area origin in screen coordinates.
    fn window_pos(&mut self, _x: i32, _y: i32) {}
    fn window_focus(&mut self, _focused: bool) {}
    fn window_iconify(&mut self, _iconified: bool) {}
    fn window_visibility(&mut self, _visible: bool) {}
    fn window_close_request(&mut self) {}
    fn window_damage(&mut self) {}
    fn monitor_change(&mut self) {}
}

/// One call on an `InputSink`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Key(Key, Action),
    Char(char),
    MouseClick(MouseButton, Action),
    CursorMotion(f64, f64),
    CursorEnter(bool),
    Scroll(f64, f64),
    WindowSize(i32, i32),
    WindowPos(i32, i32),
    WindowFocus(bool),
    WindowIconify(bool),
    WindowVisibility(bool),
    WindowCloseRequest,
    WindowDamage,
    MonitorChange,
}

impl Event {
    /// Invoke the matching `InputSink` method.
    pub fn deliver<S: InputSink + ?Sized>(self, sink: &mut S) {
        match self {
            Self::Key(key, action) => sink.key(key, action),
            Self::Char(ch) => sink.character(ch),
            Self::MouseClick(button, action) => sink.mouse_click(button, action),
            Self::CursorMotion(x, y) => sink.cursor_motion(x, y),
            Self::CursorEnter(entered) => sink.cursor_enter(entered),
            Self::Scroll(x, y) => sink.scroll(x, y),
            Self::WindowSize(w, h) => sink.window_size(w, h),
            Self::WindowPos(x, y) => sink.window_pos(x, y),
            Self::WindowFocus(focused) => sink.window_focus(focused),
            Self::WindowIconify(iconified) => sink.window_iconify(iconified),
            Self::WindowVisibility(visible) => sink.window_visibility(visible),
            Self::WindowCloseRequest => sink.window_close_request(),
            Self::WindowDamage => sink.window_damage(),
            Self::MonitorChange => sink.monitor_change(),
        }
    }
}

/// Records every callback in order.
impl InputSink for Vec<Event> {
    fn key(&mut self, key: Key, action: Action) {
        self.push(Event::Key(key, action));
    }
    fn character(&mut self, ch: char) {
        self.push(Event::Char(ch));
    }
    fn mouse_click(&mut self, button: MouseButton, action: Action) {
        self.push(Event::MouseClick(button, action));
    }
    fn cursor_motion(&mut self, x: f64, y: f64) {
        self.push(Event::CursorMotion(x, y));
    }
    fn cursor_enter(&mut self, entered: bool) {
        self.push(Event::CursorEnter(entered));
    }
    fn scroll(&mut self, x: f64, y: f64) {
        self.push(Event::Scroll(x, y));
    }
    fn window_size(&mut self, width: i32, height: i32) {
        self.push(Event::WindowSize(width, height));
    }
    fn window_pos(&mut self, x: i32, y: i32) {
        self.push(Event::WindowPos(x, y));
    }
    fn window_focus(&mut self, focused: bool) {
        self.push(Event::WindowFocus(focused));
    }
    fn window_iconify(&mut self, iconified: bool) {
        self.push(Event::WindowIconify(iconified));
    }
    fn window_visibility(&mut self, visible: bool) {
        self.push(Event::WindowVisibility(visible));
    }
    fn window_close_request(&mut self) {
        self.push(Event::WindowCloseRequest);
    }
    fn window_damage(&mut self) {
        self.push(Event::WindowDamage);
    }
    fn monitor_change(&mut self) {
        self.push(Event::MonitorChange);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliver_into_recorder_roundtrips() {
        let events = [
            Event::Key(Key::A, Action::Press),
            Event::Char('é'),
            Event::MouseClick(MouseButton::Button5, Action::Release),
            Event::CursorMotion(1.5, -2.0),
            Event::CursorEnter(true),
            Event::Scroll(0.0, -1.0),
            Event::WindowSize(640, 480),
            Event::WindowPos(-10, 20),
            Event::WindowFocus(false),
            Event::WindowIconify(true),
            Event::WindowVisibility(true),
            Event::WindowCloseRequest,
            Event::WindowDamage,
            Event::MonitorChange,
        ];
        let mut recorded: Vec<Event> = Vec::new();
        for ev in events {
            ev.deliver(&mut recorded);
        }
        assert_eq!(recorded, events);
    }

    #[test]
    fn default_methods_are_no_ops() {
        struct OnlyClose(u32);
        impl InputSink for OnlyClose {
            fn window_close_request(&mut self) {
                self.0 += 1;
            }
        }

        let mut sink = OnlyClose(0);
        Event::Key(Key::Escape, Action::Press).deliver(&mut sink);
        Event::WindowCloseRequest.deliver(&mut sink);
        assert_eq!(sink.0, 1);
    }
}
