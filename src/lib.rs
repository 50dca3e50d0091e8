// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! Native windows and input for Win32.
//!
//! The translation core (`input`, `platform::dispatch`, `icon`) is plain Rust
//! and builds on every target; `Platform` and `Window` exist on Windows only.

pub mod config;
pub mod error;
pub mod event;
pub mod icon;
pub mod input;
pub mod platform;

pub use config::WindowConfig;
pub use error::{ErrorCategory, Result, SashError};
pub use event::{Event, InputSink};
pub use icon::{best_fit, Image};
pub use input::translate::translate_key;
pub use input::{Action, CursorMode, Key, MouseButton};
pub use platform::context::{Context, WindowId};
pub use platform::messages::RawMessage;

#[cfg(windows)]
pub use platform::win32::{Platform, Window};
