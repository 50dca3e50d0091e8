// ── Native windows ────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the window class (once per context).
//   • Create and destroy top-level windows.
//   • The window procedure: route each message through `WindowState` and
//     deliver the resulting events to the window's `InputSink`.
//   • Window operations: title, position, size, icons, visibility, cursor.

#![allow(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::rc::Rc;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, BOOL, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        Graphics::Gdi::{ClientToScreen, ScreenToClient},
        UI::{
            Input::KeyboardAndMouse::SetFocus,
            WindowsAndMessaging::{
                AdjustWindowRectEx, BringWindowToTop, CreateWindowExW, DefWindowProcW,
                DestroyIcon, DestroyWindow, GetClientRect, GetCursorPos, GetMessageTime,
                GetSystemMetrics, GetWindowLongPtrW, LoadCursorW, LoadIconW, RegisterClassExW,
                SendMessageW, SetCursorPos, SetForegroundWindow, SetWindowLongPtrW,
                SetWindowPos, SetWindowTextW, ShowWindow, CREATESTRUCTW, CS_HREDRAW, CS_OWNDC,
                CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, HICON, HMENU, HWND_TOP, ICON_BIG,
                ICON_SMALL, IDC_ARROW, IDI_WINLOGO, SM_CXICON, SM_CXSMICON, SM_CYICON,
                SM_CYSMICON, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOOWNERZORDER, SWP_NOSIZE,
                SWP_NOZORDER, SW_HIDE, SW_MINIMIZE, SW_RESTORE, SW_SHOWNORMAL, WINDOW_EX_STYLE,
                WINDOW_STYLE, WM_NCCREATE, WM_SETICON, WNDCLASSEXW, WS_CAPTION,
                WS_CLIPCHILDREN, WS_CLIPSIBLINGS, WS_EX_APPWINDOW, WS_EX_WINDOWEDGE,
                WS_MAXIMIZEBOX, WS_MINIMIZEBOX, WS_SIZEBOX, WS_SYSMENU,
            },
        },
    },
};

use crate::config::WindowConfig;
use crate::error::{Result, SashError};
use crate::event::InputSink;
use crate::icon::{best_fit, Image};
use crate::input::{CursorMode, Key, MouseButton};
use crate::platform::context::{Context, WindowId};
use crate::platform::dispatch::{Disposition, WindowState};
use crate::platform::messages::RawMessage;
use crate::platform::wide_null;

use super::host::Win32Host;
use super::icon::create_icon;

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the window class.
pub(crate) const CLASS_NAME: PCWSTR = w!("SashWindow");

/// Optional icon resource an application can link into its executable.
const ICON_RESOURCE: PCWSTR = w!("SASH_ICON");

// ── Window class registration ─────────────────────────────────────────────────

/// Register the shared window class unless this context already has.
pub(crate) fn ensure_class(ctx: &Context, hinstance: HINSTANCE) -> Result<()> {
    if ctx.class_registered() {
        return Ok(());
    }

    // SAFETY: LoadIconW with our own module looks up a resource by name and
    // fails cleanly when it is absent; IDI_WINLOGO always exists.
    let icon = unsafe { LoadIconW(hinstance, ICON_RESOURCE) }
        .or_else(|_| unsafe { LoadIconW(None, IDI_WINLOGO) })
        .map_err(|e| ctx.report(e.into()))?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(|e| ctx.report(e.into()))?;

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~80 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // CS_OWNDC: a private DC per window, as GL contexts expect.
        style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        // No background brush: the client area is owned by the renderer.
        hbrBackground: Default::default(),
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: HICON::default(),
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(ctx.report(last_error("RegisterClassExW")));
    }

    log::debug!("registered window class");
    ctx.set_class_registered(true);
    Ok(())
}

// ── Per-window shared state ───────────────────────────────────────────────────

/// Everything the window procedure needs, reachable from `GWLP_USERDATA`.
pub(crate) struct WindowCell {
    pub(crate) ctx: Rc<Context>,
    id: WindowId,
    hwnd: Cell<HWND>,
    style: WINDOW_STYLE,
    ex_style: WINDOW_EX_STYLE,
    state: RefCell<WindowState>,
    sink: RefCell<Box<dyn InputSink>>,
    /// Big and small icons currently attached with `WM_SETICON`.
    icons: Cell<Option<(HICON, HICON)>>,
}

impl WindowCell {
    pub(crate) fn id(&self) -> WindowId {
        self.id
    }

    pub(crate) fn hwnd(&self) -> HWND {
        self.hwnd.get()
    }

    /// Run `f` on the input state unless it is already borrowed further up
    /// the stack.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut WindowState) -> R) -> Option<R> {
        self.state.try_borrow_mut().ok().map(|mut state| f(&mut state))
    }

    /// Translate one message.  A message that arrives while the state is
    /// already borrowed (sent synchronously by an API we called while
    /// handling another message) gets default processing.
    fn dispatch(&self, hwnd: HWND, msg: RawMessage) -> Disposition {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            log::trace!("re-entrant message {:#06x} left to DefWindowProc", msg.message);
            return Disposition::Default;
        };

        let mut focus = self.ctx.focused_window();
        let mut host = Win32Host::new(hwnd, msg.time);
        let disposition = state.handle_message(msg, &mut focus, &mut host);
        self.ctx.set_focused_window(focus);
        disposition
    }

    /// Hand queued events to the sink.  When the sink is already running
    /// (a handler called back into us), the outer delivery loop picks the
    /// new events up instead.
    pub(crate) fn deliver_pending(&self) {
        let Ok(mut sink) = self.sink.try_borrow_mut() else {
            return;
        };
        while let Some(event) = self.with_state(|s| s.next_event()).flatten() {
            event.deliver(&mut **sink);
        }
    }

    /// Current client-area size.
    pub(crate) fn client_size(&self) -> (i32, i32) {
        let mut rect = RECT::default();
        // SAFETY: hwnd is valid while the cell is registered; rect is a valid
        // out-pointer.  On failure the rect stays zeroed.
        unsafe {
            let _ = GetClientRect(self.hwnd(), &mut rect);
        }
        (rect.right, rect.bottom)
    }

    /// Move the OS cursor to client coordinates `(x, y)`.
    pub(crate) fn warp_cursor(&self, x: i32, y: i32) {
        let mut pos = POINT { x, y };
        // SAFETY: hwnd is valid; pos is a valid in/out pointer.
        unsafe {
            let _ = ClientToScreen(self.hwnd(), &mut pos);
            let _ = SetCursorPos(pos.x, pos.y);
        }
    }

    /// Convert a client size into the outer window size for our styles.
    fn full_size(&self, width: i32, height: i32) -> (i32, i32) {
        full_window_size(self.style, self.ex_style, width, height)
    }

    fn destroy_icons(&self) {
        if let Some((big, small)) = self.icons.take() {
            // SAFETY: both icons were created by `create_icon` and are no
            // longer attached to a live window (replaced or window gone).
            unsafe {
                let _ = DestroyIcon(big);
                let _ = DestroyIcon(small);
            }
        }
    }
}

// ── Public handle ─────────────────────────────────────────────────────────────

/// A native top-level window.  Dropping it destroys the OS window.
pub struct Window {
    pub(crate) cell: Rc<WindowCell>,
}

impl Window {
    /// Create a window described by `config`, reporting to `sink`.
    pub(crate) fn create(
        ctx: &Rc<Context>,
        hinstance: HINSTANCE,
        config: &WindowConfig,
        sink: Box<dyn InputSink>,
    ) -> Result<Self> {
        config.validate().map_err(|e| ctx.report(e))?;
        ensure_class(ctx, hinstance)?;

        let (style, ex_style) = window_styles(config.resizable);
        // validate() guarantees both fit in i32.
        let (full_width, full_height) =
            full_window_size(style, ex_style, config.width as i32, config.height as i32);
        let title = wide_null(&config.title).map_err(|e| ctx.report(e))?;

        let id = ctx.allocate_window_id();
        let cell = Rc::new(WindowCell {
            ctx: Rc::clone(ctx),
            id,
            hwnd: Cell::new(HWND::default()),
            style,
            ex_style,
            state: RefCell::new(WindowState::new(id, (0, 0))),
            sink: RefCell::new(sink),
            icons: Cell::new(None),
        });

        // SAFETY: CLASS_NAME is registered; title is NUL-terminated and lives
        // across the call; the cell pointer passed as lpParam stays valid for
        // as long as the HWND exists because `Window` owns the Rc and destroys
        // the HWND before releasing it.
        let hwnd = unsafe {
            CreateWindowExW(
                ex_style,
                CLASS_NAME,
                PCWSTR(title.as_ptr()),
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                full_width,
                full_height,
                HWND::default(),
                HMENU::default(),
                hinstance,
                Some(Rc::as_ptr(&cell) as *const c_void),
            )
        }
        .map_err(|e| ctx.report(e.into()))?;

        if hwnd.is_invalid() {
            return Err(ctx.report(last_error("CreateWindowExW")));
        }
        cell.hwnd.set(hwnd);

        // Seed the cursor cache so the first WM_MOUSEMOVE is not reported as
        // a jump from the origin.
        let mut cursor = POINT::default();
        // SAFETY: cursor is a valid out-pointer; hwnd was just created.
        unsafe {
            let _ = GetCursorPos(&mut cursor);
            let _ = ScreenToClient(hwnd, &mut cursor);
        }
        cell.with_state(|s| s.seed_cursor((cursor.x, cursor.y)));

        log::info!(
            "created {id:?} \"{}\" ({}x{})",
            config.title,
            config.width,
            config.height
        );

        let window = Self { cell };
        if config.visible {
            window.show();
        }
        // After show(): a focused window captures now, an unfocused one on
        // its first activation.
        if config.cursor_mode != CursorMode::Normal {
            window.set_cursor_mode(config.cursor_mode);
        }
        Ok(window)
    }

    pub fn id(&self) -> WindowId {
        self.cell.id()
    }

    /// The native handle, for interop with rendering APIs.
    pub fn hwnd(&self) -> HWND {
        self.cell.hwnd()
    }

    /// Set once a close request arrives (title bar X, Alt-F4, `WM_QUIT`).
    pub fn should_close(&self) -> bool {
        self.cell.with_state(|s| s.should_close()).unwrap_or(false)
    }

    pub fn set_should_close(&self, value: bool) {
        self.cell.with_state(|s| s.set_should_close(value));
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.cell.with_state(|s| s.is_key_pressed(key)).unwrap_or(false)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.cell
            .with_state(|s| s.is_button_pressed(button))
            .unwrap_or(false)
    }

    pub fn is_iconified(&self) -> bool {
        self.cell.with_state(|s| s.is_iconified()).unwrap_or(false)
    }

    /// Last position reported through `cursor_motion`.
    pub fn cursor_pos(&self) -> (f64, f64) {
        self.cell.with_state(|s| s.cursor_pos()).unwrap_or_default()
    }

    pub fn set_title(&self, title: &str) -> Result<()> {
        let wide = wide_null(title).map_err(|e| self.cell.ctx.report(e))?;
        // SAFETY: wide is NUL-terminated and outlives the call.
        unsafe { SetWindowTextW(self.hwnd(), PCWSTR(wide.as_ptr())) }
            .map_err(|e| self.cell.ctx.report(e.into()))
    }

    /// Screen position of the client area's top-left corner.
    pub fn pos(&self) -> (i32, i32) {
        let mut pos = POINT::default();
        // SAFETY: hwnd is valid; pos is a valid in/out pointer.
        unsafe {
            let _ = ClientToScreen(self.hwnd(), &mut pos);
        }
        (pos.x, pos.y)
    }

    /// Move the window so its client area starts at `(x, y)`.
    pub fn set_pos(&self, x: i32, y: i32) {
        let mut rect = RECT {
            left: x,
            top: y,
            right: x,
            bottom: y,
        };
        // SAFETY: rect is a valid in/out pointer; hwnd is valid.
        unsafe {
            let _ = AdjustWindowRectEx(
                &mut rect,
                self.cell.style,
                BOOL::from(false),
                self.cell.ex_style,
            );
            let _ = SetWindowPos(
                self.hwnd(),
                HWND::default(),
                rect.left,
                rect.top,
                0,
                0,
                SWP_NOACTIVATE | SWP_NOZORDER | SWP_NOSIZE,
            );
        }
    }

    /// Client-area size.
    pub fn size(&self) -> (i32, i32) {
        self.cell.client_size()
    }

    /// Resize so the client area is `width`×`height`.
    pub fn set_size(&self, width: i32, height: i32) {
        let (full_width, full_height) = self.cell.full_size(width, height);
        // SAFETY: hwnd is valid.
        unsafe {
            let _ = SetWindowPos(
                self.hwnd(),
                HWND_TOP,
                0,
                0,
                full_width,
                full_height,
                SWP_NOOWNERZORDER | SWP_NOMOVE | SWP_NOZORDER,
            );
        }
    }

    /// Attach the best-fitting images as the big (Alt-Tab) and small
    /// (title bar) icons.  An empty slice leaves the class icon in place.
    pub fn set_icons(&self, images: &[Image]) -> Result<()> {
        let ctx = &self.cell.ctx;
        // SAFETY: GetSystemMetrics reads static system configuration.
        let (big_size, small_size) = unsafe {
            (
                (GetSystemMetrics(SM_CXICON), GetSystemMetrics(SM_CYICON)),
                (GetSystemMetrics(SM_CXSMICON), GetSystemMetrics(SM_CYSMICON)),
            )
        };

        let pick = |(w, h): (i32, i32)| {
            best_fit(images, w.max(1) as u32, h.max(1) as u32)
        };
        let (Some(big), Some(small)) = (pick(big_size), pick(small_size)) else {
            return Ok(());
        };

        let big = create_icon(big).map_err(|e| ctx.report(e))?;
        let small = match create_icon(small) {
            Ok(icon) => icon,
            Err(e) => {
                // SAFETY: big was just created and never attached.
                unsafe {
                    let _ = DestroyIcon(big);
                }
                return Err(ctx.report(e));
            }
        };

        // SAFETY: hwnd is valid; WM_SETICON takes the HICON by value in
        // LPARAM and does not take ownership.
        unsafe {
            SendMessageW(
                self.hwnd(),
                WM_SETICON,
                WPARAM(ICON_BIG as usize),
                LPARAM(big.0 as isize),
            );
            SendMessageW(
                self.hwnd(),
                WM_SETICON,
                WPARAM(ICON_SMALL as usize),
                LPARAM(small.0 as isize),
            );
        }

        self.cell.destroy_icons();
        self.cell.icons.set(Some((big, small)));
        Ok(())
    }

    pub fn iconify(&self) {
        // SAFETY: hwnd is valid.
        unsafe {
            let _ = ShowWindow(self.hwnd(), SW_MINIMIZE);
        }
    }

    pub fn restore(&self) {
        // SAFETY: hwnd is valid.
        unsafe {
            let _ = ShowWindow(self.hwnd(), SW_RESTORE);
        }
    }

    /// Show, raise and focus the window.
    pub fn show(&self) {
        let hwnd = self.hwnd();
        // SAFETY: hwnd is valid; each call's result only reports whether the
        // shell allowed the change, which is not an error for us.
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOWNORMAL);
            let _ = BringWindowToTop(hwnd);
            let _ = SetForegroundWindow(hwnd);
            let _ = SetFocus(hwnd);
        }
        self.cell.deliver_pending();
    }

    pub fn hide(&self) {
        // SAFETY: hwnd is valid.
        unsafe {
            let _ = ShowWindow(self.hwnd(), SW_HIDE);
        }
        self.cell.deliver_pending();
    }

    /// Move the OS cursor to client coordinates `(x, y)`.
    pub fn set_cursor_pos(&self, x: i32, y: i32) {
        self.cell.warp_cursor(x, y);
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cell
            .with_state(|s| s.cursor_mode())
            .unwrap_or_default()
    }

    pub fn set_cursor_mode(&self, mode: CursorMode) {
        let mut host = Win32Host::new(self.hwnd(), 0);
        let focus = self.cell.ctx.focused_window();
        self.cell
            .with_state(|s| s.set_cursor_mode(mode, focus, &mut host));
        if mode == CursorMode::Captured && focus == Some(self.id()) {
            let (width, height) = self.cell.client_size();
            self.cell.warp_cursor(width / 2, height / 2);
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        let hwnd = self.cell.hwnd.replace(HWND::default());
        if hwnd.is_invalid() {
            return;
        }

        if self.cell.ctx.focused_window() == Some(self.id()) {
            self.cell.ctx.set_focused_window(None);
        }

        // SAFETY: hwnd belongs to this window.  Clearing GWLP_USERDATA first
        // means no message generated by DestroyWindow can reach the cell
        // after this point.
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            let _ = DestroyWindow(hwnd);
        }
        self.cell.destroy_icons();
        log::debug!("destroyed {:?}", self.id());
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call.  GWLP_USERDATA holds either null or a pointer to a
// WindowCell kept alive by its `Window`.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        // lpCreateParams carries the cell pointer handed to CreateWindowExW.
        let cs = &*(lparam.0 as *const CREATESTRUCTW);
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, cs.lpCreateParams as isize);
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let cell = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const WindowCell;
    if cell.is_null() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }
    let cell = &*cell;

    let raw = RawMessage {
        message: msg,
        wparam: wparam.0,
        lparam: lparam.0,
        time: GetMessageTime() as u32,
    };
    let disposition = cell.dispatch(hwnd, raw);
    cell.deliver_pending();

    match disposition {
        Disposition::Handled(result) => LRESULT(result),
        Disposition::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn window_styles(resizable: bool) -> (WINDOW_STYLE, WINDOW_EX_STYLE) {
    let mut style = WS_CLIPSIBLINGS | WS_CLIPCHILDREN | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX;
    let mut ex_style = WS_EX_APPWINDOW;
    if resizable {
        style |= WS_MAXIMIZEBOX | WS_SIZEBOX;
        ex_style |= WS_EX_WINDOWEDGE;
    }
    (style, ex_style)
}

/// Outer window size whose client area is `width`×`height`.
fn full_window_size(
    style: WINDOW_STYLE,
    ex_style: WINDOW_EX_STYLE,
    width: i32,
    height: i32,
) -> (i32, i32) {
    let mut rect = RECT {
        left: 0,
        top: 0,
        right: width,
        bottom: height,
    };
    // SAFETY: rect is a valid in/out pointer.  On failure it is unchanged and
    // the client size is used as-is.
    unsafe {
        let _ = AdjustWindowRectEx(&mut rect, style, BOOL::from(false), ex_style);
    }
    (rect.right - rect.left, rect.bottom - rect.top)
}

/// Capture the current Win32 last-error code and wrap it in a `SashError`.
///
/// Call immediately after the failing Win32 function; any later API call may
/// overwrite the thread's last-error value.
fn last_error(function: &'static str) -> SashError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    SashError::Win32 {
        function,
        code: code.0,
    }
}
