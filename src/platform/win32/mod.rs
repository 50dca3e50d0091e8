// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only module in the codebase where `unsafe` code is permitted.  Every
// `unsafe` block MUST carry a `// SAFETY:` comment that states which invariant
// makes the operation sound.
//
// Message semantics live in `platform::dispatch`; this module only moves
// messages between the OS and that state machine.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

mod host; // KeyboardHost / WindowHost over the real APIs
mod icon; // RGBA image -> HICON
pub mod window; // window class, WndProc, window operations

pub use window::Window;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use windows::Win32::{
    Foundation::{HINSTANCE, HWND},
    System::LibraryLoader::GetModuleHandleW,
    UI::{
        Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LSHIFT, VK_RSHIFT},
        WindowsAndMessaging::{
            DispatchMessageW, PeekMessageW, TranslateMessage, UnregisterClassW, WaitMessage,
            MSG, PM_REMOVE, WM_QUIT,
        },
    },
};

use crate::config::WindowConfig;
use crate::error::{ErrorCategory, Result};
use crate::event::InputSink;
use crate::platform::context::Context;

use window::{WindowCell, CLASS_NAME};

// ── Platform ──────────────────────────────────────────────────────────────────

/// Owns the context and drives the message loop for every window it created.
pub struct Platform {
    ctx: Rc<Context>,
    hinstance: HINSTANCE,
    windows: RefCell<Vec<Weak<WindowCell>>>,
}

impl Platform {
    pub fn new() -> Result<Self> {
        // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which
        // is valid for the entire process lifetime.
        let hmodule = unsafe { GetModuleHandleW(None) }?;
        // HINSTANCE and HMODULE are the same value under the Win32 ABI.
        let hinstance = HINSTANCE(hmodule.0);

        Ok(Self {
            ctx: Rc::new(Context::new()),
            hinstance,
            windows: RefCell::new(Vec::new()),
        })
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn set_error_callback<F>(&self, callback: F)
    where
        F: FnMut(ErrorCategory, &str) + 'static,
    {
        self.ctx.set_error_callback(callback);
    }

    /// Create a window; its events go to `sink` during `poll_events`.
    pub fn create_window(
        &self,
        config: &WindowConfig,
        sink: Box<dyn InputSink>,
    ) -> Result<Window> {
        let window = Window::create(&self.ctx, self.hinstance, config, sink)?;
        let mut windows = self.windows.borrow_mut();
        windows.retain(|w| w.strong_count() > 0);
        windows.push(Rc::downgrade(&window.cell));
        Ok(window)
    }

    /// Process every message currently queued, then run the end-of-cycle
    /// fixups on the focused window.  Never blocks.
    pub fn poll_events(&self) {
        let focused = self.focused_cell();

        if let Some(cell) = &focused {
            let size = cell.client_size();
            cell.with_state(|s| s.begin_poll(size));
        }

        let mut msg = MSG::default();
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() removes
        // messages for every window on this thread.
        while unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE) }.as_bool() {
            if msg.message == WM_QUIT {
                log::debug!("WM_QUIT received, requesting close on all windows");
                for cell in self.live_cells() {
                    cell.with_state(|s| s.request_close());
                    cell.deliver_pending();
                }
                continue;
            }
            // SAFETY: msg was just filled by PeekMessageW.  TranslateMessage's
            // result (whether it generated WM_CHAR) and DispatchMessageW's
            // LRESULT are intentionally unused.
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        // Focus may have moved while dispatching.
        let Some(cell) = self.focused_cell() else {
            return;
        };

        // SAFETY: GetAsyncKeyState reads global key state; no preconditions.
        let (left, right) = unsafe {
            (
                GetAsyncKeyState(i32::from(VK_LSHIFT.0)),
                GetAsyncKeyState(i32::from(VK_RSHIFT.0)),
            )
        };
        cell.with_state(|s| s.fix_stuck_shift(left < 0, right < 0));

        if cell.with_state(|s| s.wants_recenter()).unwrap_or(false) {
            let (width, height) = cell.client_size();
            cell.warp_cursor(width / 2, height / 2);
            cell.with_state(|s| s.mark_centered());
        }

        cell.deliver_pending();
    }

    /// Sleep until at least one message arrives, then process the queue.
    pub fn wait_events(&self) {
        // SAFETY: WaitMessage blocks the calling thread; no preconditions.
        if let Err(e) = unsafe { WaitMessage() } {
            self.ctx.report(e.into());
        }
        self.poll_events();
    }

    fn live_cells(&self) -> Vec<Rc<WindowCell>> {
        let mut windows = self.windows.borrow_mut();
        windows.retain(|w| w.strong_count() > 0);
        windows.iter().filter_map(Weak::upgrade).collect()
    }

    fn focused_cell(&self) -> Option<Rc<WindowCell>> {
        let id = self.ctx.focused_window()?;
        self.live_cells().into_iter().find(|cell| cell.id() == id)
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        if !self.ctx.class_registered() {
            return;
        }
        // SAFETY: the class was registered against this hinstance.  Fails
        // harmlessly while windows of the class still exist.
        if unsafe { UnregisterClassW(CLASS_NAME, self.hinstance) }.is_ok() {
            self.ctx.set_class_registered(false);
        }
    }
}
