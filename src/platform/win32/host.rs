// ── Win32 implementation of the translator's host traits ──────────────────────
//
// One `Win32Host` is built per message, on the stack of the window procedure.
// It borrows nothing: the HWND is only valid for the duration of the call.

#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::{BOOL, HWND, POINT, RECT},
    Graphics::Gdi::ClientToScreen,
    UI::{
        Input::KeyboardAndMouse::{
            MapVirtualKeyW, ReleaseCapture, SetCapture, TrackMouseEvent, MAPVK_VK_TO_VSC,
            MAPVK_VSC_TO_VK, TME_LEAVE, TRACKMOUSEEVENT,
        },
        WindowsAndMessaging::{
            ClipCursor, GetClientRect, PeekMessageW, ShowCursor, MSG, PM_NOREMOVE,
        },
    },
};

use crate::input::translate::KeyboardHost;
use crate::platform::dispatch::WindowHost;
use crate::platform::messages::RawMessage;

pub(crate) struct Win32Host {
    hwnd: HWND,
    /// `GetMessageTime()` captured when the current message arrived.
    time: u32,
}

impl Win32Host {
    pub(crate) fn new(hwnd: HWND, time: u32) -> Self {
        Self { hwnd, time }
    }

    /// The client rectangle in screen coordinates.
    fn client_rect_on_screen(&self) -> Option<RECT> {
        let mut rect = RECT::default();
        // SAFETY: hwnd is the live window whose message is being processed;
        // rect is a valid out-pointer.
        unsafe { GetClientRect(self.hwnd, &mut rect) }.ok()?;

        let mut top_left = POINT {
            x: rect.left,
            y: rect.top,
        };
        let mut bottom_right = POINT {
            x: rect.right,
            y: rect.bottom,
        };
        // SAFETY: both points are valid out-pointers; hwnd as above.
        unsafe {
            let _ = ClientToScreen(self.hwnd, &mut top_left);
            let _ = ClientToScreen(self.hwnd, &mut bottom_right);
        }

        Some(RECT {
            left: top_left.x,
            top: top_left.y,
            right: bottom_right.x,
            bottom: bottom_right.y,
        })
    }
}

impl KeyboardHost for Win32Host {
    fn scan_code_to_vk(&self, scan_code: u32) -> u16 {
        // SAFETY: MapVirtualKeyW is a pure lookup in the thread's layout.
        unsafe { MapVirtualKeyW(scan_code, MAPVK_VSC_TO_VK) as u16 }
    }

    fn vk_to_scan_code(&self, vk: u16) -> u32 {
        // SAFETY: as above.
        unsafe { MapVirtualKeyW(u32::from(vk), MAPVK_VK_TO_VSC) }
    }

    fn message_time(&self) -> u32 {
        self.time
    }

    fn peek_message(&self) -> Option<RawMessage> {
        let mut msg = MSG::default();
        // SAFETY: &mut msg is a valid MSG pointer; PM_NOREMOVE leaves the
        // queue untouched; HWND::default() peeks at every window on this
        // thread.
        let found = unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_NOREMOVE) };
        found.as_bool().then(|| RawMessage {
            message: msg.message,
            wparam: msg.wParam.0,
            lparam: msg.lParam.0,
            time: msg.time,
        })
    }
}

impl WindowHost for Win32Host {
    fn set_capture(&mut self) {
        // SAFETY: hwnd is valid; the previous capture owner is not needed.
        unsafe {
            let _ = SetCapture(self.hwnd);
        }
    }

    fn release_capture(&mut self) {
        // SAFETY: no preconditions; fails harmlessly when nothing is captured.
        unsafe {
            let _ = ReleaseCapture();
        }
    }

    fn track_mouse_leave(&mut self) {
        let mut tme = TRACKMOUSEEVENT {
            // TRACKMOUSEEVENT is 24 bytes; the cast is lossless.
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: self.hwnd,
            dwHoverTime: 0,
        };
        // SAFETY: tme is fully initialised and names a live window.
        unsafe {
            let _ = TrackMouseEvent(&mut tme);
        }
    }

    fn update_clip_rect(&mut self) {
        if let Some(rect) = self.client_rect_on_screen() {
            // SAFETY: rect outlives the call; ClipCursor copies it.
            unsafe {
                let _ = ClipCursor(Some(&rect as *const RECT));
            }
        }
    }

    fn capture_cursor(&mut self) {
        // SAFETY: ShowCursor adjusts a per-thread display counter.
        unsafe {
            let _ = ShowCursor(BOOL::from(false));
        }
        self.update_clip_rect();
        self.set_capture();
    }

    fn show_cursor(&mut self) {
        self.release_capture();
        // SAFETY: None removes any clip rectangle; ShowCursor as above.
        unsafe {
            let _ = ClipCursor(None);
            let _ = ShowCursor(BOOL::from(true));
        }
    }
}
