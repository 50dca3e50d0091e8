// ── Win32 message and key-code constants ──────────────────────────────────────
//
// Source of truth: WinUser.h / Dbt.h.  Kept as plain integers so the portable
// translator can be built and tested on any host; the Win32 glue passes the
// raw `msg`, `wParam` and `lParam` straight through.

// ── Window messages ───────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) const WM_CREATE: u32 = 0x0001;
pub(crate) const WM_MOVE: u32 = 0x0003;
pub(crate) const WM_SIZE: u32 = 0x0005;
pub(crate) const WM_ACTIVATE: u32 = 0x0006;
pub(crate) const WM_PAINT: u32 = 0x000F;
pub(crate) const WM_CLOSE: u32 = 0x0010;
pub(crate) const WM_SHOWWINDOW: u32 = 0x0018;
pub(crate) const WM_KEYDOWN: u32 = 0x0100;
pub(crate) const WM_KEYUP: u32 = 0x0101;
pub(crate) const WM_CHAR: u32 = 0x0102;
pub(crate) const WM_SYSKEYDOWN: u32 = 0x0104;
pub(crate) const WM_SYSKEYUP: u32 = 0x0105;
pub(crate) const WM_SYSCOMMAND: u32 = 0x0112;
pub(crate) const WM_MOUSEMOVE: u32 = 0x0200;
pub(crate) const WM_LBUTTONDOWN: u32 = 0x0201;
pub(crate) const WM_LBUTTONUP: u32 = 0x0202;
pub(crate) const WM_RBUTTONDOWN: u32 = 0x0204;
pub(crate) const WM_RBUTTONUP: u32 = 0x0205;
pub(crate) const WM_MBUTTONDOWN: u32 = 0x0207;
pub(crate) const WM_MBUTTONUP: u32 = 0x0208;
pub(crate) const WM_MOUSEWHEEL: u32 = 0x020A;
pub(crate) const WM_XBUTTONDOWN: u32 = 0x020B;
pub(crate) const WM_XBUTTONUP: u32 = 0x020C;
/// Vista and later.
pub(crate) const WM_MOUSEHWHEEL: u32 = 0x020E;
pub(crate) const WM_DEVICECHANGE: u32 = 0x0219;
pub(crate) const WM_MOUSELEAVE: u32 = 0x02A3;

// ── Message parameters ────────────────────────────────────────────────────────

/// `LOWORD(wParam)` of `WM_ACTIVATE` when the window is being deactivated.
pub(crate) const WA_INACTIVE: usize = 0;
/// `WM_SYSCOMMAND`: menu opened by Alt / F10.  Low four bits are reserved.
pub(crate) const SC_KEYMENU: usize = 0xF100;
pub(crate) const SC_MASK: usize = 0xFFF0;
/// `WM_DEVICECHANGE`: a device was added or removed.
pub(crate) const DBT_DEVNODES_CHANGED: usize = 0x0007;
pub(crate) const XBUTTON1: u16 = 0x0001;
pub(crate) const XBUTTON2: u16 = 0x0002;
/// One notch of a standard wheel.
pub(crate) const WHEEL_DELTA: f64 = 120.0;

/// `lParam` bit 24 of key messages: right-hand modifier or keypad Enter.
pub(crate) const KF_EXTENDED_BIT: isize = 0x0100_0000;

// ── Virtual-key codes ─────────────────────────────────────────────────────────

pub(crate) const VK_BACK: u16 = 0x08;
pub(crate) const VK_TAB: u16 = 0x09;
pub(crate) const VK_CLEAR: u16 = 0x0C;
pub(crate) const VK_RETURN: u16 = 0x0D;
pub(crate) const VK_SHIFT: u16 = 0x10;
pub(crate) const VK_CONTROL: u16 = 0x11;
pub(crate) const VK_MENU: u16 = 0x12;
pub(crate) const VK_PAUSE: u16 = 0x13;
pub(crate) const VK_CAPITAL: u16 = 0x14;
pub(crate) const VK_ESCAPE: u16 = 0x1B;
pub(crate) const VK_SPACE: u16 = 0x20;
pub(crate) const VK_PRIOR: u16 = 0x21;
pub(crate) const VK_NEXT: u16 = 0x22;
pub(crate) const VK_END: u16 = 0x23;
pub(crate) const VK_HOME: u16 = 0x24;
pub(crate) const VK_LEFT: u16 = 0x25;
pub(crate) const VK_UP: u16 = 0x26;
pub(crate) const VK_RIGHT: u16 = 0x27;
pub(crate) const VK_DOWN: u16 = 0x28;
pub(crate) const VK_INSERT: u16 = 0x2D;
pub(crate) const VK_DELETE: u16 = 0x2E;
pub(crate) const VK_LWIN: u16 = 0x5B;
pub(crate) const VK_RWIN: u16 = 0x5C;
pub(crate) const VK_APPS: u16 = 0x5D;
pub(crate) const VK_NUMPAD0: u16 = 0x60;
#[cfg(test)]
pub(crate) const VK_NUMPAD1: u16 = 0x61;
#[cfg(test)]
pub(crate) const VK_NUMPAD2: u16 = 0x62;
#[cfg(test)]
pub(crate) const VK_NUMPAD3: u16 = 0x63;
#[cfg(test)]
pub(crate) const VK_NUMPAD4: u16 = 0x64;
#[cfg(test)]
pub(crate) const VK_NUMPAD5: u16 = 0x65;
#[cfg(test)]
pub(crate) const VK_NUMPAD6: u16 = 0x66;
#[cfg(test)]
pub(crate) const VK_NUMPAD7: u16 = 0x67;
#[cfg(test)]
pub(crate) const VK_NUMPAD8: u16 = 0x68;
pub(crate) const VK_NUMPAD9: u16 = 0x69;
pub(crate) const VK_MULTIPLY: u16 = 0x6A;
pub(crate) const VK_ADD: u16 = 0x6B;
pub(crate) const VK_SUBTRACT: u16 = 0x6D;
pub(crate) const VK_DECIMAL: u16 = 0x6E;
pub(crate) const VK_DIVIDE: u16 = 0x6F;
pub(crate) const VK_F1: u16 = 0x70;
pub(crate) const VK_F24: u16 = 0x87;
pub(crate) const VK_NUMLOCK: u16 = 0x90;
pub(crate) const VK_SCROLL: u16 = 0x91;
#[cfg(test)]
pub(crate) const VK_LSHIFT: u16 = 0xA0;
pub(crate) const VK_RSHIFT: u16 = 0xA1;
/// `;:` on US layouts.
pub(crate) const VK_OEM_1: u16 = 0xBA;
pub(crate) const VK_OEM_PLUS: u16 = 0xBB;
pub(crate) const VK_OEM_COMMA: u16 = 0xBC;
pub(crate) const VK_OEM_MINUS: u16 = 0xBD;
pub(crate) const VK_OEM_PERIOD: u16 = 0xBE;
/// `/?`
pub(crate) const VK_OEM_2: u16 = 0xBF;
/// `` `~ ``
pub(crate) const VK_OEM_3: u16 = 0xC0;
/// `[{`
pub(crate) const VK_OEM_4: u16 = 0xDB;
/// `\|`
pub(crate) const VK_OEM_5: u16 = 0xDC;
/// `]}`
pub(crate) const VK_OEM_6: u16 = 0xDD;
/// `'"`
pub(crate) const VK_OEM_7: u16 = 0xDE;
pub(crate) const VK_OEM_8: u16 = 0xDF;
/// `<>` on ISO keyboards.
pub(crate) const VK_OEM_102: u16 = 0xE2;

// ── Raw messages ──────────────────────────────────────────────────────────────

/// One message as the window procedure (or `PeekMessage`) sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawMessage {
    pub message: u32,
    pub wparam: usize,
    pub lparam: isize,
    /// `GetMessageTime()` / `MSG::time`, in milliseconds.
    pub time: u32,
}

impl RawMessage {
    pub fn new(message: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            message,
            wparam,
            lparam,
            time: 0,
        }
    }

    pub fn at(mut self, time: u32) -> Self {
        self.time = time;
        self
    }
}

/// `LOWORD(x)`
pub(crate) fn loword(x: usize) -> u16 {
    (x & 0xFFFF) as u16
}

/// `HIWORD(x)`
pub(crate) fn hiword(x: usize) -> u16 {
    ((x >> 16) & 0xFFFF) as u16
}

/// `GET_X_LPARAM(lp)`: the low word, sign-extended.
pub(crate) fn get_x_lparam(lparam: isize) -> i32 {
    i32::from(loword(lparam as usize) as i16)
}

/// `GET_Y_LPARAM(lp)`: the high word, sign-extended.
pub(crate) fn get_y_lparam(lparam: isize) -> i32 {
    i32::from(hiword(lparam as usize) as i16)
}

/// `MAKELPARAM(lo, hi)`
#[cfg(test)]
pub(crate) fn make_lparam(lo: i32, hi: i32) -> isize {
    (((hi as u32 & 0xFFFF) << 16) | (lo as u32 & 0xFFFF)) as i32 as isize
}

// ── Tests ─────────────────────────────────────────────────────────────────────
