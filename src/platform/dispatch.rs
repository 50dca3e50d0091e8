// ── Message translator ────────────────────────────────────────────────────────
//
// The body of the window procedure, minus the FFI.  `WindowState::handle_message`
// turns one raw Win32 message into zero or more queued `Event`s and tells the
// caller whether `DefWindowProc` should still run.  OS side effects (mouse
// capture, cursor clipping, leave tracking) go through `WindowHost` so the
// focus/iconify and stuck-key workarounds can be driven by synthetic messages.

use std::collections::{BTreeSet, VecDeque};

use crate::event::{Event, InputSink};
use crate::input::translate::{translate_key, KeyboardHost};
use crate::input::{Action, CursorMode, Key, MouseButton};
use crate::platform::context::WindowId;
use crate::platform::messages::*;

/// OS operations the translator may trigger on its window.
pub trait WindowHost: KeyboardHost {
    /// `SetCapture`
    fn set_capture(&mut self);
    /// `ReleaseCapture`
    fn release_capture(&mut self);
    /// Arm `TrackMouseEvent(TME_LEAVE)` so a `WM_MOUSELEAVE` follows.
    fn track_mouse_leave(&mut self);
    /// Re-clip the cursor to the current client rectangle.
    fn update_clip_rect(&mut self);
    /// Hide, clip and capture the cursor.
    fn capture_cursor(&mut self);
    /// Undo `capture_cursor`.
    fn show_cursor(&mut self);
}

/// What the window procedure should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Return this `LRESULT` without default processing.
    Handled(isize),
    /// Forward to `DefWindowProc`.
    Default,
}

/// Per-window input state.
#[derive(Debug)]
pub struct WindowState {
    id: WindowId,
    cursor_mode: CursorMode,
    /// Last raw client-area cursor position seen in `WM_MOUSEMOVE`.
    old_cursor: (i32, i32),
    /// Position last reported through `cursor_motion`.
    cursor_pos: (f64, f64),
    cursor_inside: bool,
    cursor_centered: bool,
    iconified: bool,
    size: Option<(i32, i32)>,
    pos: Option<(i32, i32)>,
    should_close: bool,
    keys: BTreeSet<Key>,
    buttons: BTreeSet<MouseButton>,
    high_surrogate: Option<u16>,
    pending: VecDeque<Event>,
}

impl WindowState {
    /// Fresh state for a window whose cursor is at `cursor` (client
    /// coordinates).
    pub fn new(id: WindowId, cursor: (i32, i32)) -> Self {
        Self {
            id,
            cursor_mode: CursorMode::Normal,
            old_cursor: cursor,
            cursor_pos: (f64::from(cursor.0), f64::from(cursor.1)),
            cursor_inside: false,
            cursor_centered: false,
            iconified: false,
            size: None,
            pos: None,
            should_close: false,
            keys: BTreeSet::new(),
            buttons: BTreeSet::new(),
            high_surrogate: None,
            pending: VecDeque::new(),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    pub fn cursor_pos(&self) -> (f64, f64) {
        self.cursor_pos
    }

    pub fn is_iconified(&self) -> bool {
        self.iconified
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Reset the cursor cache to `cursor` without reporting motion.
    pub fn seed_cursor(&mut self, cursor: (i32, i32)) {
        self.old_cursor = cursor;
        self.cursor_pos = (f64::from(cursor.0), f64::from(cursor.1));
    }

    pub fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Remove and return the next queued event.
    pub fn next_event(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    /// Drain every queued event into `sink`.
    pub fn flush_into<S: InputSink + ?Sized>(&mut self, sink: &mut S) {
        while let Some(event) = self.pending.pop_front() {
            event.deliver(sink);
        }
    }

    // ── Message dispatch ──────────────────────────────────────────────────────

    /// Translate one message.  `focus` is the context's focused window and is
    /// updated when focus changes.
    pub fn handle_message<H>(
        &mut self,
        msg: RawMessage,
        focus: &mut Option<WindowId>,
        host: &mut H,
    ) -> Disposition
    where
        H: WindowHost + ?Sized,
    {
        let RawMessage { wparam, lparam, .. } = msg;

        match msg.message {
            WM_ACTIVATE => {
                let mut focused = usize::from(loword(wparam)) != WA_INACTIVE;
                let iconified = hiword(wparam) != 0;

                // Iconifying from the taskbar reports "focused and iconified"
                // and never follows up with a deactivation.
                if focused && iconified {
                    focused = false;
                }

                let is_current = *focus == Some(self.id);
                if !focused && is_current {
                    if self.cursor_mode == CursorMode::Captured {
                        host.show_cursor();
                    }
                } else if focused && !is_current && self.cursor_mode == CursorMode::Captured {
                    host.capture_cursor();
                }

                self.input_focus(focused, focus);
                self.input_iconify(iconified);
                Disposition::Handled(0)
            }

            WM_SHOWWINDOW => {
                self.pending.push_back(Event::WindowVisibility(wparam != 0));
                Disposition::Default
            }

            WM_SYSCOMMAND => {
                // Swallow Alt/F10 so the (absent) window menu does not steal
                // keyboard input.
                if wparam & SC_MASK == SC_KEYMENU {
                    Disposition::Handled(0)
                } else {
                    Disposition::Default
                }
            }

            WM_CLOSE => {
                self.request_close();
                Disposition::Handled(0)
            }

            WM_KEYDOWN | WM_SYSKEYDOWN => {
                if let Some(key) = translate_key(wparam, lparam, &*host) {
                    self.input_key(key, Action::Press);
                }
                Disposition::Default
            }

            WM_CHAR => {
                self.input_char(loword(wparam));
                Disposition::Handled(0)
            }

            WM_KEYUP | WM_SYSKEYUP => {
                // Windows sends a single VK_SHIFT release when both shifts
                // were held; release whichever we believe is down.
                if wparam == usize::from(VK_SHIFT) {
                    self.input_key(Key::LeftShift, Action::Release);
                    self.input_key(Key::RightShift, Action::Release);
                } else if let Some(key) = translate_key(wparam, lparam, &*host) {
                    self.input_key(key, Action::Release);
                }
                Disposition::Default
            }

            WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN => {
                host.set_capture();
                self.input_mouse_click(standard_button(msg.message), Action::Press);
                Disposition::Handled(0)
            }

            WM_LBUTTONUP | WM_RBUTTONUP | WM_MBUTTONUP => {
                host.release_capture();
                self.input_mouse_click(standard_button(msg.message), Action::Release);
                Disposition::Handled(0)
            }

            WM_XBUTTONDOWN => {
                if let Some(button) = extra_button(wparam) {
                    host.set_capture();
                    self.input_mouse_click(button, Action::Press);
                }
                // XBUTTON messages expect TRUE.
                Disposition::Handled(1)
            }

            WM_XBUTTONUP => {
                if let Some(button) = extra_button(wparam) {
                    host.release_capture();
                    self.input_mouse_click(button, Action::Release);
                }
                Disposition::Handled(1)
            }

            WM_MOUSEMOVE => {
                let new_cursor = (get_x_lparam(lparam), get_y_lparam(lparam));

                if new_cursor != self.old_cursor {
                    let (x, y) = if self.cursor_mode == CursorMode::Captured {
                        if *focus != Some(self.id) {
                            return Disposition::Handled(0);
                        }
                        (new_cursor.0 - self.old_cursor.0, new_cursor.1 - self.old_cursor.1)
                    } else {
                        new_cursor
                    };

                    self.old_cursor = new_cursor;
                    self.cursor_centered = false;
                    self.input_cursor_motion(x, y);
                }

                if !self.cursor_inside {
                    host.track_mouse_leave();
                    self.cursor_inside = true;
                    self.pending.push_back(Event::CursorEnter(true));
                }

                Disposition::Handled(0)
            }

            WM_MOUSELEAVE => {
                self.cursor_inside = false;
                self.pending.push_back(Event::CursorEnter(false));
                Disposition::Handled(0)
            }

            WM_MOUSEWHEEL => {
                let delta = f64::from(hiword(wparam) as i16) / WHEEL_DELTA;
                self.pending.push_back(Event::Scroll(0.0, delta));
                Disposition::Handled(0)
            }

            WM_MOUSEHWHEEL => {
                let delta = f64::from(hiword(wparam) as i16) / WHEEL_DELTA;
                self.pending.push_back(Event::Scroll(delta, 0.0));
                Disposition::Handled(0)
            }

            WM_SIZE => {
                if self.cursor_mode == CursorMode::Captured {
                    host.update_clip_rect();
                }
                let size = (
                    i32::from(loword(lparam as usize)),
                    i32::from(hiword(lparam as usize)),
                );
                self.input_size(size);
                Disposition::Handled(0)
            }

            WM_MOVE => {
                if self.cursor_mode == CursorMode::Captured {
                    host.update_clip_rect();
                }
                // Client origin; negative on monitors left of / above the
                // primary one.
                self.input_pos((get_x_lparam(lparam), get_y_lparam(lparam)));
                Disposition::Handled(0)
            }

            WM_PAINT => {
                self.pending.push_back(Event::WindowDamage);
                Disposition::Default
            }

            WM_DEVICECHANGE => {
                if wparam == DBT_DEVNODES_CHANGED {
                    self.pending.push_back(Event::MonitorChange);
                    Disposition::Handled(1)
                } else {
                    Disposition::Default
                }
            }

            _ => Disposition::Default,
        }
    }

    // ── Poll cycle ────────────────────────────────────────────────────────────

    /// Called on the focused window before the queue is drained: the raw
    /// cursor cache restarts from the client centre, which is where the
    /// previous cycle left a captured cursor.
    pub fn begin_poll(&mut self, client_size: (i32, i32)) {
        self.cursor_centered = false;
        self.old_cursor = (client_size.0 / 2, client_size.1 / 2);
    }

    /// Release shift keys that the OS reports as up but we still hold down.
    /// Key-up messages for shift are occasionally never delivered.
    pub fn fix_stuck_shift(&mut self, left_down: bool, right_down: bool) {
        let stuck: Vec<Key> = self
            .keys
            .iter()
            .copied()
            .filter(|key| key.is_shift())
            .filter(|&key| !if key == Key::LeftShift { left_down } else { right_down })
            .collect();
        for key in stuck {
            log::debug!("{:?}: releasing stuck {key:?}", self.id);
            self.input_key(key, Action::Release);
        }
    }

    /// `true` when a captured cursor has moved and should be warped back to
    /// the client centre.
    pub fn wants_recenter(&self) -> bool {
        self.cursor_mode == CursorMode::Captured && !self.cursor_centered
    }

    pub fn mark_centered(&mut self) {
        self.cursor_centered = true;
    }

    /// Switch cursor modes.  The OS cursor is only captured while this window
    /// has focus; an unfocused window is captured by its next activation.
    pub fn set_cursor_mode<H>(&mut self, mode: CursorMode, focus: Option<WindowId>, host: &mut H)
    where
        H: WindowHost + ?Sized,
    {
        if mode == self.cursor_mode {
            return;
        }
        if focus == Some(self.id) {
            match mode {
                CursorMode::Captured => host.capture_cursor(),
                CursorMode::Normal | CursorMode::Hidden => {
                    if self.cursor_mode == CursorMode::Captured {
                        host.show_cursor();
                    }
                }
            }
        }
        self.cursor_centered = false;
        self.cursor_mode = mode;
    }

    /// Queue a close request and raise the close flag.
    pub fn request_close(&mut self) {
        self.should_close = true;
        self.pending.push_back(Event::WindowCloseRequest);
    }

    // ── Input rules ───────────────────────────────────────────────────────────

    fn input_key(&mut self, key: Key, action: Action) {
        let action = match action {
            Action::Release => {
                if !self.keys.remove(&key) {
                    return;
                }
                Action::Release
            }
            Action::Press | Action::Repeat => {
                if self.keys.insert(key) {
                    Action::Press
                } else {
                    Action::Repeat
                }
            }
        };
        self.pending.push_back(Event::Key(key, action));
    }

    fn input_mouse_click(&mut self, button: MouseButton, action: Action) {
        let changed = match action {
            Action::Release => self.buttons.remove(&button),
            Action::Press | Action::Repeat => self.buttons.insert(button),
        };
        if changed {
            let action = if action == Action::Release {
                Action::Release
            } else {
                Action::Press
            };
            self.pending.push_back(Event::MouseClick(button, action));
        }
    }

    fn input_char(&mut self, unit: u16) {
        let ch = match unit {
            0xD800..=0xDBFF => {
                self.high_surrogate = Some(unit);
                return;
            }
            0xDC00..=0xDFFF => {
                let Some(high) = self.high_surrogate.take() else {
                    return;
                };
                char::decode_utf16([high, unit]).next().and_then(|r| r.ok())
            }
            _ => {
                self.high_surrogate = None;
                char::from_u32(u32::from(unit))
            }
        };

        let Some(ch) = ch else {
            return;
        };
        let code = u32::from(ch);
        if code < 32 || (127..160).contains(&code) {
            return;
        }
        self.pending.push_back(Event::Char(ch));
    }

    fn input_cursor_motion(&mut self, x: i32, y: i32) {
        let (x, y) = (f64::from(x), f64::from(y));
        if self.cursor_mode == CursorMode::Captured {
            if x == 0.0 && y == 0.0 {
                return;
            }
            self.cursor_pos.0 += x;
            self.cursor_pos.1 += y;
        } else {
            if self.cursor_pos == (x, y) {
                return;
            }
            self.cursor_pos = (x, y);
        }
        self.pending
            .push_back(Event::CursorMotion(self.cursor_pos.0, self.cursor_pos.1));
    }

    fn input_focus(&mut self, focused: bool, focus: &mut Option<WindowId>) {
        if focused {
            if *focus != Some(self.id) {
                *focus = Some(self.id);
                self.pending.push_back(Event::WindowFocus(true));
            }
        } else if *focus == Some(self.id) {
            *focus = None;
            self.pending.push_back(Event::WindowFocus(false));

            // Releases that happen while unfocused never reach us.
            let keys: Vec<Key> = self.keys.iter().copied().collect();
            for key in keys {
                self.input_key(key, Action::Release);
            }
            let buttons: Vec<MouseButton> = self.buttons.iter().copied().collect();
            for button in buttons {
                self.input_mouse_click(button, Action::Release);
            }
        }
    }

    fn input_iconify(&mut self, iconified: bool) {
        if self.iconified != iconified {
            self.iconified = iconified;
            self.pending.push_back(Event::WindowIconify(iconified));
        }
    }

    fn input_size(&mut self, size: (i32, i32)) {
        if self.size != Some(size) {
            self.size = Some(size);
            self.pending.push_back(Event::WindowSize(size.0, size.1));
        }
    }

    fn input_pos(&mut self, pos: (i32, i32)) {
        if self.pos != Some(pos) {
            self.pos = Some(pos);
            self.pending.push_back(Event::WindowPos(pos.0, pos.1));
        }
    }
}

fn standard_button(message: u32) -> MouseButton {
    match message {
        WM_RBUTTONDOWN | WM_RBUTTONUP => MouseButton::Right,
        WM_MBUTTONDOWN | WM_MBUTTONUP => MouseButton::Middle,
        _ => MouseButton::Left,
    }
}

fn extra_button(wparam: usize) -> Option<MouseButton> {
    match hiword(wparam) {
        XBUTTON1 => Some(MouseButton::Button4),
        XBUTTON2 => Some(MouseButton::Button5),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::translate::tests::{key_lparam, FakeKeyboard};

    /// Records the side effects the translator asks for.
    #[derive(Default)]
    struct FakeHost {
        keyboard: FakeKeyboard,
        calls: Vec<&'static str>,
    }

    impl FakeHost {
        /// Net `ShowCursor(FALSE)` calls still outstanding.
        fn hide_count(&self) -> i32 {
            let count = |name| self.calls.iter().filter(|&&c| c == name).count() as i32;
            count("capture_cursor") - count("show_cursor")
        }
    }

    impl KeyboardHost for FakeHost {
        fn scan_code_to_vk(&self, scan_code: u32) -> u16 {
            self.keyboard.scan_code_to_vk(scan_code)
        }
        fn vk_to_scan_code(&self, vk: u16) -> u32 {
            self.keyboard.vk_to_scan_code(vk)
        }
        fn message_time(&self) -> u32 {
            self.keyboard.message_time()
        }
        fn peek_message(&self) -> Option<RawMessage> {
            self.keyboard.peek_message()
        }
    }

    impl WindowHost for FakeHost {
        fn set_capture(&mut self) {
            self.calls.push("set_capture");
        }
        fn release_capture(&mut self) {
            self.calls.push("release_capture");
        }
        fn track_mouse_leave(&mut self) {
            self.calls.push("track_mouse_leave");
        }
        fn update_clip_rect(&mut self) {
            self.calls.push("update_clip_rect");
        }
        fn capture_cursor(&mut self) {
            self.calls.push("capture_cursor");
        }
        fn show_cursor(&mut self) {
            self.calls.push("show_cursor");
        }
    }

    struct Harness {
        state: WindowState,
        focus: Option<WindowId>,
        host: FakeHost,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                state: WindowState::new(WindowId(1), (0, 0)),
                focus: None,
                host: FakeHost::default(),
            }
        }

        fn send(&mut self, message: u32, wparam: usize, lparam: isize) -> Disposition {
            let msg = RawMessage::new(message, wparam, lparam);
            self.state.handle_message(msg, &mut self.focus, &mut self.host)
        }

        fn events(&mut self) -> Vec<Event> {
            let mut out = Vec::new();
            self.state.flush_into(&mut out);
            out
        }

        fn set_cursor_mode(&mut self, mode: CursorMode) {
            self.state.set_cursor_mode(mode, self.focus, &mut self.host);
        }

        fn focus(&mut self) {
            self.send(WM_ACTIVATE, 1, 0);
            self.events();
        }

        fn key_down(&mut self, vk: u16, scan: u32, extended: bool) {
            self.send(WM_KEYDOWN, usize::from(vk), key_lparam(scan, extended));
        }

        fn key_up(&mut self, vk: u16, scan: u32, extended: bool) {
            self.send(WM_KEYUP, usize::from(vk), key_lparam(scan, extended));
        }
    }

    fn activate_wparam(state: usize, minimized: bool) -> usize {
        state | if minimized { 1 << 16 } else { 0 }
    }

    // ── Focus & iconify ───────────────────────────────────────────────────────

    #[test]
    fn activation_reports_focus_once() {
        let mut h = Harness::new();
        assert_eq!(h.send(WM_ACTIVATE, activate_wparam(1, false), 0), Disposition::Handled(0));
        assert_eq!(h.focus, Some(WindowId(1)));
        assert_eq!(h.events(), vec![Event::WindowFocus(true)]);

        h.send(WM_ACTIVATE, activate_wparam(2, false), 0);
        assert!(h.events().is_empty());
    }

    #[test]
    fn taskbar_iconify_is_treated_as_defocus() {
        let mut h = Harness::new();
        h.focus();

        h.send(WM_ACTIVATE, activate_wparam(1, true), 0);
        assert_eq!(h.focus, None);
        assert_eq!(
            h.events(),
            vec![Event::WindowFocus(false), Event::WindowIconify(true)]
        );
    }

    #[test]
    fn restore_reports_focus_and_deiconify() {
        let mut h = Harness::new();
        h.focus();
        h.send(WM_ACTIVATE, activate_wparam(1, true), 0);
        h.events();

        h.send(WM_ACTIVATE, activate_wparam(1, false), 0);
        assert_eq!(
            h.events(),
            vec![Event::WindowFocus(true), Event::WindowIconify(false)]
        );
    }

    #[test]
    fn defocus_of_other_window_is_ignored() {
        let mut h = Harness::new();
        h.focus = Some(WindowId(7));
        h.send(WM_ACTIVATE, activate_wparam(WA_INACTIVE, false), 0);
        assert_eq!(h.focus, Some(WindowId(7)));
        assert!(h.events().is_empty());
    }

    #[test]
    fn defocus_releases_held_keys_and_buttons() {
        let mut h = Harness::new();
        h.focus();
        h.key_down(0x41, 0x1E, false);
        h.send(WM_LBUTTONDOWN, 0, 0);
        h.events();

        h.send(WM_ACTIVATE, activate_wparam(WA_INACTIVE, false), 0);
        assert_eq!(
            h.events(),
            vec![
                Event::WindowFocus(false),
                Event::Key(Key::A, Action::Release),
                Event::MouseClick(MouseButton::Left, Action::Release),
            ]
        );
        assert!(!h.state.is_key_pressed(Key::A));
    }

    #[test]
    fn captured_cursor_follows_focus() {
        let mut h = Harness::new();
        h.focus();
        h.set_cursor_mode(CursorMode::Captured);
        assert_eq!(h.host.calls, vec!["capture_cursor"]);

        h.send(WM_ACTIVATE, activate_wparam(WA_INACTIVE, false), 0);
        h.send(WM_ACTIVATE, activate_wparam(1, false), 0);
        assert_eq!(
            h.host.calls,
            vec!["capture_cursor", "show_cursor", "capture_cursor"]
        );
    }

    #[test]
    fn capture_requested_while_unfocused_waits_for_activation() {
        let mut h = Harness::new();
        h.set_cursor_mode(CursorMode::Captured);
        assert!(h.host.calls.is_empty());

        h.send(WM_ACTIVATE, activate_wparam(1, false), 0);
        h.send(WM_ACTIVATE, activate_wparam(WA_INACTIVE, false), 0);
        assert_eq!(h.host.calls, vec!["capture_cursor", "show_cursor"]);
        assert_eq!(h.host.hide_count(), 0);
    }

    #[test]
    fn leaving_captured_mode_while_unfocused_leaves_cursor_alone() {
        let mut h = Harness::new();
        h.focus();
        h.set_cursor_mode(CursorMode::Captured);
        h.send(WM_ACTIVATE, activate_wparam(WA_INACTIVE, false), 0);
        h.set_cursor_mode(CursorMode::Normal);
        h.send(WM_ACTIVATE, activate_wparam(1, false), 0);
        assert_eq!(h.host.calls, vec!["capture_cursor", "show_cursor"]);
        assert_eq!(h.host.hide_count(), 0);
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    #[test]
    fn key_press_repeat_release() {
        let mut h = Harness::new();
        assert_eq!(
            h.send(WM_KEYDOWN, 0x41, key_lparam(0x1E, false)),
            Disposition::Default
        );
        h.key_down(0x41, 0x1E, false);
        h.key_up(0x41, 0x1E, false);
        h.key_up(0x41, 0x1E, false);
        assert_eq!(
            h.events(),
            vec![
                Event::Key(Key::A, Action::Press),
                Event::Key(Key::A, Action::Repeat),
                Event::Key(Key::A, Action::Release),
            ]
        );
    }

    #[test]
    fn syskey_messages_translate_like_keys() {
        let mut h = Harness::new();
        h.send(WM_SYSKEYDOWN, usize::from(VK_MENU), key_lparam(0x38, false));
        h.send(WM_SYSKEYUP, usize::from(VK_MENU), key_lparam(0x38, false));
        assert_eq!(
            h.events(),
            vec![
                Event::Key(Key::LeftAlt, Action::Press),
                Event::Key(Key::LeftAlt, Action::Release),
            ]
        );
    }

    #[test]
    fn shift_up_releases_both_shifts() {
        let mut h = Harness::new();
        h.key_down(VK_SHIFT, 0x2A, false);
        h.key_down(VK_SHIFT, 0x36, false);
        h.events();

        // One VK_SHIFT release, carrying the left scan code.
        h.key_up(VK_SHIFT, 0x2A, false);
        assert_eq!(
            h.events(),
            vec![
                Event::Key(Key::LeftShift, Action::Release),
                Event::Key(Key::RightShift, Action::Release),
            ]
        );
    }

    #[test]
    fn shift_up_only_reports_held_shift() {
        let mut h = Harness::new();
        h.key_down(VK_SHIFT, 0x36, false);
        h.events();
        h.key_up(VK_SHIFT, 0x36, false);
        assert_eq!(h.events(), vec![Event::Key(Key::RightShift, Action::Release)]);
    }

    #[test]
    fn alt_gr_delivers_only_right_alt() {
        let mut h = Harness::new();
        let right_alt =
            RawMessage::new(WM_KEYDOWN, usize::from(VK_MENU), key_lparam(0x38, true)).at(42);
        h.host.keyboard = FakeKeyboard::with_next(right_alt, 42);

        h.key_down(VK_CONTROL, 0x1D, false);
        h.host.keyboard.queue.borrow_mut().clear();
        h.key_down(VK_MENU, 0x38, true);

        assert_eq!(h.events(), vec![Event::Key(Key::RightAlt, Action::Press)]);
        assert!(!h.state.is_key_pressed(Key::LeftControl));
    }

    #[test]
    fn stuck_shift_fixup() {
        let mut h = Harness::new();
        h.key_down(VK_SHIFT, 0x2A, false);
        h.key_down(VK_SHIFT, 0x36, false);
        h.events();

        // OS says left is up, right still down.
        h.state.fix_stuck_shift(false, true);
        assert_eq!(h.events(), vec![Event::Key(Key::LeftShift, Action::Release)]);
        assert!(h.state.is_key_pressed(Key::RightShift));

        // Nothing believed down: nothing to release.
        h.state.fix_stuck_shift(false, false);
        h.state.fix_stuck_shift(false, false);
        assert_eq!(h.events(), vec![Event::Key(Key::RightShift, Action::Release)]);
    }

    #[test]
    fn stuck_shift_fixup_ignores_other_held_keys() {
        let mut h = Harness::new();
        h.key_down(VK_CONTROL, 0x1D, true);
        h.key_down(VK_SHIFT, 0x2A, false);
        h.events();

        h.state.fix_stuck_shift(false, false);
        assert_eq!(h.events(), vec![Event::Key(Key::LeftShift, Action::Release)]);
        assert!(h.state.is_key_pressed(Key::RightControl));
    }

    #[test]
    fn characters_filter_controls_and_join_surrogates() {
        let mut h = Harness::new();
        for unit in [0x41, 0x08, 0x7F, 0x85, 0xE9, 0xD83D, 0xDE00, 0xDE00] {
            assert_eq!(h.send(WM_CHAR, unit, 0), Disposition::Handled(0));
        }
        assert_eq!(
            h.events(),
            vec![Event::Char('A'), Event::Char('é'), Event::Char('😀')]
        );
    }

    // ── Mouse ─────────────────────────────────────────────────────────────────

    #[test]
    fn buttons_capture_and_release() {
        let mut h = Harness::new();
        assert_eq!(h.send(WM_RBUTTONDOWN, 0, 0), Disposition::Handled(0));
        assert_eq!(h.send(WM_RBUTTONUP, 0, 0), Disposition::Handled(0));
        h.send(WM_MBUTTONDOWN, 0, 0);
        assert_eq!(h.host.calls, vec!["set_capture", "release_capture", "set_capture"]);
        assert_eq!(
            h.events(),
            vec![
                Event::MouseClick(MouseButton::Right, Action::Press),
                Event::MouseClick(MouseButton::Right, Action::Release),
                Event::MouseClick(MouseButton::Middle, Action::Press),
            ]
        );
    }

    #[test]
    fn extra_buttons_return_true() {
        let mut h = Harness::new();
        assert_eq!(h.send(WM_XBUTTONDOWN, 1 << 16, 0), Disposition::Handled(1));
        assert_eq!(h.send(WM_XBUTTONUP, 1 << 16, 0), Disposition::Handled(1));
        assert_eq!(h.send(WM_XBUTTONDOWN, 2 << 16, 0), Disposition::Handled(1));
        assert_eq!(h.send(WM_XBUTTONDOWN, 3 << 16, 0), Disposition::Handled(1));
        assert_eq!(
            h.events(),
            vec![
                Event::MouseClick(MouseButton::Button4, Action::Press),
                Event::MouseClick(MouseButton::Button4, Action::Release),
                Event::MouseClick(MouseButton::Button5, Action::Press),
            ]
        );
    }

    #[test]
    fn first_motion_enters_and_arms_leave_tracking() {
        let mut h = Harness::new();
        h.send(WM_MOUSEMOVE, 0, make_lparam(10, 20));
        h.send(WM_MOUSEMOVE, 0, make_lparam(11, 20));
        assert_eq!(h.host.calls, vec!["track_mouse_leave"]);
        assert_eq!(
            h.events(),
            vec![
                Event::CursorMotion(10.0, 20.0),
                Event::CursorEnter(true),
                Event::CursorMotion(11.0, 20.0),
            ]
        );

        assert_eq!(h.send(WM_MOUSELEAVE, 0, 0), Disposition::Handled(0));
        h.send(WM_MOUSEMOVE, 0, make_lparam(11, 20));
        assert_eq!(
            h.events(),
            vec![Event::CursorEnter(false), Event::CursorEnter(true)]
        );
    }

    #[test]
    fn captured_motion_accumulates_deltas() {
        let mut h = Harness::new();
        h.focus();
        h.set_cursor_mode(CursorMode::Captured);
        h.state.begin_poll((200, 100));

        h.send(WM_MOUSEMOVE, 0, make_lparam(105, 50));
        h.send(WM_MOUSEMOVE, 0, make_lparam(103, 47));
        assert_eq!(
            h.events(),
            vec![
                Event::CursorMotion(5.0, 0.0),
                Event::CursorEnter(true),
                Event::CursorMotion(3.0, -3.0),
            ]
        );
        assert!(h.state.wants_recenter());
        h.state.mark_centered();
        assert!(!h.state.wants_recenter());
    }

    #[test]
    fn seeded_cursor_is_the_first_delta_origin() {
        let mut h = Harness::new();
        h.state.seed_cursor((40, 30));
        assert_eq!(h.state.cursor_pos(), (40.0, 30.0));

        h.focus();
        h.set_cursor_mode(CursorMode::Captured);
        h.send(WM_MOUSEMOVE, 0, make_lparam(42, 29));
        assert_eq!(h.events()[0], Event::CursorMotion(42.0, 29.0));
    }

    #[test]
    fn captured_motion_ignored_without_focus() {
        let mut h = Harness::new();
        h.set_cursor_mode(CursorMode::Captured);
        h.send(WM_MOUSEMOVE, 0, make_lparam(5, 5));
        assert!(h.events().is_empty());
    }

    #[test]
    fn negative_coordinates() {
        let mut h = Harness::new();
        h.send(WM_MOUSEMOVE, 0, make_lparam(-3, -4));
        h.send(WM_MOVE, 0, make_lparam(-1920, 10));
        assert_eq!(
            h.events(),
            vec![
                Event::CursorMotion(-3.0, -4.0),
                Event::CursorEnter(true),
                Event::WindowPos(-1920, 10),
            ]
        );
    }

    #[test]
    fn wheel_is_signed_and_scaled() {
        let mut h = Harness::new();
        let down = ((-240i16) as u16 as usize) << 16;
        h.send(WM_MOUSEWHEEL, down, 0);
        h.send(WM_MOUSEHWHEEL, 120 << 16, 0);
        assert_eq!(
            h.events(),
            vec![Event::Scroll(0.0, -2.0), Event::Scroll(1.0, 0.0)]
        );
    }

    // ── Window ────────────────────────────────────────────────────────────────

    #[test]
    fn size_and_move_reported_on_change() {
        let mut h = Harness::new();
        h.send(WM_SIZE, 0, make_lparam(640, 480));
        h.send(WM_SIZE, 0, make_lparam(640, 480));
        h.send(WM_MOVE, 0, make_lparam(100, 50));
        h.send(WM_MOVE, 0, make_lparam(100, 50));
        assert_eq!(
            h.events(),
            vec![Event::WindowSize(640, 480), Event::WindowPos(100, 50)]
        );
        assert!(h.host.calls.is_empty());
    }

    #[test]
    fn captured_resize_updates_clip_rect() {
        let mut h = Harness::new();
        h.set_cursor_mode(CursorMode::Captured);
        h.host.calls.clear();
        h.send(WM_SIZE, 0, make_lparam(10, 10));
        h.send(WM_MOVE, 0, make_lparam(10, 10));
        assert_eq!(h.host.calls, vec!["update_clip_rect", "update_clip_rect"]);
    }

    #[test]
    fn close_paint_visibility_and_devices() {
        let mut h = Harness::new();
        assert_eq!(h.send(WM_CLOSE, 0, 0), Disposition::Handled(0));
        assert_eq!(h.send(WM_PAINT, 0, 0), Disposition::Default);
        assert_eq!(h.send(WM_SHOWWINDOW, 1, 0), Disposition::Default);
        assert_eq!(
            h.send(WM_DEVICECHANGE, DBT_DEVNODES_CHANGED, 0),
            Disposition::Handled(1)
        );
        assert_eq!(h.send(WM_DEVICECHANGE, 0x8000, 0), Disposition::Default);
        assert_eq!(
            h.events(),
            vec![
                Event::WindowCloseRequest,
                Event::WindowDamage,
                Event::WindowVisibility(true),
                Event::MonitorChange,
            ]
        );
        assert!(h.state.should_close());
    }

    #[test]
    fn keymenu_syscommand_is_swallowed() {
        let mut h = Harness::new();
        assert_eq!(h.send(WM_SYSCOMMAND, SC_KEYMENU | 0x3, 0), Disposition::Handled(0));
        assert_eq!(h.send(WM_SYSCOMMAND, 0xF020, 0), Disposition::Default);
    }

    #[test]
    fn unknown_messages_fall_through() {
        let mut h = Harness::new();
        assert_eq!(h.send(WM_CREATE, 0, 0), Disposition::Default);
        assert_eq!(h.send(0x7FFF, 0, 0), Disposition::Default);
        assert!(h.events().is_empty());
    }

    #[test]
    fn leaving_captured_mode_shows_cursor_once() {
        let mut h = Harness::new();
        h.focus();
        h.set_cursor_mode(CursorMode::Hidden);
        h.set_cursor_mode(CursorMode::Captured);
        h.set_cursor_mode(CursorMode::Captured);
        h.set_cursor_mode(CursorMode::Normal);
        h.set_cursor_mode(CursorMode::Hidden);
        assert_eq!(h.host.calls, vec!["capture_cursor", "show_cursor"]);
    }
}
