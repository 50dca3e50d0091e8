// ── Platform layer ────────────────────────────────────────────────────────────
//
// `messages`, `context` and `dispatch` are the portable half: plain Rust that
// knows Win32's message numbering but never calls into the OS.  All FFI is
// confined to the `win32` sub-module and never leaks outward.

pub mod context;
pub mod dispatch;
pub mod messages;

#[cfg(windows)]
pub mod win32;

use crate::error::{Result, SashError};

/// NUL-terminated UTF-16 copy of `s` for the `W` APIs.
///
/// Fails on interior NULs, which would silently truncate the string.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn wide_null(s: &str) -> Result<Vec<u16>> {
    if s.contains('\0') {
        return Err(SashError::TitleConversion(s.to_owned()));
    }
    Ok(s.encode_utf16().chain(std::iter::once(0)).collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_null_terminates() {
        assert_eq!(wide_null("ab").unwrap(), vec![0x61, 0x62, 0]);
        assert_eq!(wide_null("").unwrap(), vec![0]);
    }

    #[test]
    fn wide_null_encodes_surrogates() {
        assert_eq!(wide_null("😀").unwrap(), vec![0xD83D, 0xDE00, 0]);
    }

    #[test]
    fn wide_null_rejects_interior_nul() {
        assert!(matches!(wide_null("a\0b"), Err(SashError::TitleConversion(_))));
    }
}
