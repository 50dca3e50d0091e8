// ── Win32 key translation ─────────────────────────────────────────────────────
//
// Maps a virtual-key code plus the key message's lParam onto a portable `Key`.
// The reported key reflects the physical key, not the layout or lock state.
// Layout lookups and the message-queue peek go through `KeyboardHost` so that
// the whole table can be exercised with synthetic input.

use crate::input::Key;
use crate::platform::messages::*;

/// The OS services key translation needs.
pub trait KeyboardHost {
    /// `MapVirtualKey(scan, MAPVK_VSC_TO_VK)`; 0 when the scan code has no
    /// virtual key in the current layout.
    fn scan_code_to_vk(&self, scan_code: u32) -> u16;

    /// `MapVirtualKey(vk, MAPVK_VK_TO_VSC)`.
    fn vk_to_scan_code(&self, vk: u16) -> u32;

    /// Timestamp of the message currently being processed.
    fn message_time(&self) -> u32;

    /// The next queued message, left in the queue.
    fn peek_message(&self) -> Option<RawMessage>;
}

/// Translate a key message into a portable key.
///
/// `None` means the event must be dropped: either the key has no portable
/// identity, or it is the synthetic left-Control that Windows sends ahead of
/// an Alt-Gr press.
pub fn translate_key<H>(wparam: usize, lparam: isize, host: &H) -> Option<Key>
where
    H: KeyboardHost + ?Sized,
{
    // Keypad keys are identified by scan code with NumLock treated as on, so
    // keypad 7 is Kp7 whether Windows called it VK_NUMPAD7 or VK_HOME.
    let hi_flags = hiword(lparam as usize);
    if hi_flags & 0x100 == 0 {
        if let Some(key) = keypad_key(host.scan_code_to_vk(u32::from(hi_flags & 0xFF))) {
            return Some(key);
        }
    }

    let vk = u16::try_from(wparam).ok()?;
    let extended = lparam & KF_EXTENDED_BIT != 0;

    match vk {
        VK_SHIFT => {
            // The left/right distinction is only visible in the scan code.
            let scan_code = ((lparam as u32) & 0x01ff_0000) >> 16;
            if scan_code == host.vk_to_scan_code(VK_RSHIFT) {
                Some(Key::RightShift)
            } else {
                Some(Key::LeftShift)
            }
        }

        VK_CONTROL => {
            if extended {
                Some(Key::RightControl)
            } else if is_alt_gr_precursor(host) {
                log::trace!("dropping left control that precedes Alt-Gr");
                None
            } else {
                Some(Key::LeftControl)
            }
        }

        VK_MENU => Some(if extended { Key::RightAlt } else { Key::LeftAlt }),

        VK_RETURN => Some(if extended { Key::KpEnter } else { Key::Enter }),

        _ => static_key(vk),
    }
}

/// Alt-Gr is delivered as a left-Control press followed by a right-Alt press
/// carrying the same timestamp.
fn is_alt_gr_precursor<H>(host: &H) -> bool
where
    H: KeyboardHost + ?Sized,
{
    let Some(next) = host.peek_message() else {
        return false;
    };

    matches!(next.message, WM_KEYDOWN | WM_SYSKEYDOWN)
        && next.wparam == usize::from(VK_MENU)
        && next.lparam & KF_EXTENDED_BIT != 0
        && next.time == host.message_time()
}

/// Keypad identity of a virtual key produced by a non-extended scan code.
fn keypad_key(vk: u16) -> Option<Key> {
    let key = match vk {
        VK_INSERT => Key::Kp0,
        VK_END => Key::Kp1,
        VK_DOWN => Key::Kp2,
        VK_NEXT => Key::Kp3,
        VK_LEFT => Key::Kp4,
        VK_CLEAR => Key::Kp5,
        VK_RIGHT => Key::Kp6,
        VK_HOME => Key::Kp7,
        VK_UP => Key::Kp8,
        VK_PRIOR => Key::Kp9,
        VK_DIVIDE => Key::KpDivide,
        VK_MULTIPLY => Key::KpMultiply,
        VK_SUBTRACT => Key::KpSubtract,
        VK_ADD => Key::KpAdd,
        VK_DELETE => Key::KpDecimal,
        _ => return None,
    };
    Some(key)
}

/// One-to-one mapping for every key without special handling.
pub(crate) fn static_key(vk: u16) -> Option<Key> {
    const F_KEYS: [Key; 24] = [
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::F13,
        Key::F14,
        Key::F15,
        Key::F16,
        Key::F17,
        Key::F18,
        Key::F19,
        Key::F20,
        Key::F21,
        Key::F22,
        Key::F23,
        Key::F24,
    ];
    const DIGITS: [Key; 10] = [
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];
    const LETTERS: [Key; 26] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];
    const KEYPAD: [Key; 10] = [
        Key::Kp0,
        Key::Kp1,
        Key::Kp2,
        Key::Kp3,
        Key::Kp4,
        Key::Kp5,
        Key::Kp6,
        Key::Kp7,
        Key::Kp8,
        Key::Kp9,
    ];

    let key = match vk {
        VK_ESCAPE => Key::Escape,
        VK_TAB => Key::Tab,
        VK_BACK => Key::Backspace,
        VK_HOME => Key::Home,
        VK_END => Key::End,
        VK_PRIOR => Key::PageUp,
        VK_NEXT => Key::PageDown,
        VK_INSERT => Key::Insert,
        VK_DELETE => Key::Delete,
        VK_LEFT => Key::Left,
        VK_UP => Key::Up,
        VK_RIGHT => Key::Right,
        VK_DOWN => Key::Down,
        VK_F1..=VK_F24 => F_KEYS[usize::from(vk - VK_F1)],
        VK_NUMLOCK => Key::NumLock,
        VK_CAPITAL => Key::CapsLock,
        VK_SCROLL => Key::ScrollLock,
        VK_PAUSE => Key::Pause,
        VK_LWIN => Key::LeftSuper,
        VK_RWIN => Key::RightSuper,
        VK_APPS => Key::Menu,

        VK_NUMPAD0..=VK_NUMPAD9 => KEYPAD[usize::from(vk - VK_NUMPAD0)],
        VK_DIVIDE => Key::KpDivide,
        VK_MULTIPLY => Key::KpMultiply,
        VK_SUBTRACT => Key::KpSubtract,
        VK_ADD => Key::KpAdd,
        VK_DECIMAL => Key::KpDecimal,

        // Printable keys, named after the US layout.
        VK_SPACE => Key::Space,
        0x30..=0x39 => DIGITS[usize::from(vk - 0x30)],
        0x41..=0x5A => LETTERS[usize::from(vk - 0x41)],
        VK_OEM_MINUS => Key::Minus,
        VK_OEM_PLUS => Key::Equal,
        VK_OEM_4 => Key::LeftBracket,
        VK_OEM_6 => Key::RightBracket,
        VK_OEM_5 => Key::Backslash,
        VK_OEM_1 => Key::Semicolon,
        VK_OEM_7 => Key::Apostrophe,
        VK_OEM_3 => Key::GraveAccent,
        VK_OEM_COMMA => Key::Comma,
        VK_OEM_PERIOD => Key::Period,
        VK_OEM_2 => Key::Slash,
        VK_OEM_8 => Key::World1,
        VK_OEM_102 => Key::World2,

        _ => return None,
    };
    Some(key)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
