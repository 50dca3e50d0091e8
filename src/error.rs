// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in sash return `error::Result<T>`.  Every failure
// is also handed to the context's error callback (see
// `platform::context::Context::report`) before it is returned, so callers
// that only check the boolean outcome still get a diagnostic.

/// Coarse classification passed alongside every reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The host windowing API refused an operation.
    PlatformError,
    /// An allocation needed to complete the operation failed.
    OutOfMemory,
    /// The caller passed a value the operation cannot use.
    InvalidValue,
}

/// Every error that sash can produce.
#[derive(Debug)]
pub enum SashError {
    /// A Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A string could not be handed to the OS (interior NUL, for instance).
    TitleConversion(String),

    /// Pixel data for an icon could not be converted into a native bitmap.
    OutOfMemory(&'static str),

    /// An icon image whose dimensions or pixel buffer are inconsistent.
    InvalidImage {
        width: u32,
        height: u32,
        len: usize,
    },

    /// A window configuration value that cannot be honoured.
    InvalidConfig(String),

    /// Configuration JSON failed to parse.
    Json(serde_json::Error),

    /// A standard I/O error (reading a config file).
    Io(std::io::Error),
}

impl SashError {
    /// The coarse category reported to the error callback.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Win32 { .. } | Self::TitleConversion(_) => ErrorCategory::PlatformError,
            Self::OutOfMemory(_) => ErrorCategory::OutOfMemory,
            Self::InvalidImage { .. } | Self::InvalidConfig(_) | Self::Json(_) | Self::Io(_) => {
                ErrorCategory::InvalidValue
            }
        }
    }
}

impl std::fmt::Display for SashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "Win32: {function} failed (error {code:#010x})")
            }
            Self::TitleConversion(title) => {
                write!(f, "Win32: failed to convert {title:?} to a wide string")
            }
            Self::OutOfMemory(what) => write!(f, "out of memory while {what}"),
            Self::InvalidImage { width, height, len } => write!(
                f,
                "invalid image: {width}x{height} needs {} bytes of RGBA, got {len}",
                u64::from(*width) * u64::from(*height) * 4
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid window config: {msg}"),
            Self::Json(e) => write!(f, "config parse error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SashError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SashError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// Convert a windows-crate error (HRESULT) directly into a SashError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for SashError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SashError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
