// ── Portable input model ──────────────────────────────────────────────────────
//
// The vocabulary shared by every backend: keys, buttons, actions, cursor
// modes, plus the Win32 key translator.  No `unsafe` here; the translator
// reaches the OS only through the `KeyboardHost` trait.

use serde::{Deserialize, Serialize};

pub mod keys;
pub mod translate;

pub use keys::Key;

/// What happened to a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Release,
    Press,
    /// A press reported while the key was already down (auto-repeat).
    Repeat,
}

/// Mouse buttons reported by `mouse_click`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// First extended button (`XBUTTON1`, usually "back").
    Button4,
    /// Second extended button (`XBUTTON2`, usually "forward").
    Button5,
}

/// How the cursor behaves over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorMode {
    /// Visible and free to leave the window.
    #[default]
    Normal,
    /// Requested hidden; the Win32 backend leaves the OS cursor untouched.
    Hidden,
    /// Hidden, confined to the client area, and reported as relative motion.
    Captured,
}
