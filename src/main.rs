// ── sash-demo ─────────────────────────────────────────────────────────────────
//
// Opens one window and logs every event it receives.  An optional argument
// names a JSON window configuration:
//
//     sash-demo [config.json]
//
// Set RUST_LOG=debug (or trace) for backend detail.

#![deny(unsafe_code)]

use std::path::PathBuf;

use sash::WindowConfig;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match WindowConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => WindowConfig::default(),
    };

    if let Err(e) = run(&config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(windows)]
fn run(config: &WindowConfig) -> sash::Result<()> {
    use sash::{Platform, Window};

    let platform = Platform::new()?;
    platform.set_error_callback(|category, message| {
        log::warn!("backend reported {category:?}: {message}");
    });

    let window: Window = platform.create_window(config, Box::new(logging::LogSink))?;
    log::info!("window {:?} open at {:?}, size {:?}", window.id(), window.pos(), window.size());

    while !window.should_close() {
        platform.wait_events();
    }

    log::info!("close requested, exiting");
    Ok(())
}

#[cfg(not(windows))]
fn run(config: &WindowConfig) -> sash::Result<()> {
    log::error!(
        "\"{}\": native windows are only available on Windows",
        config.title
    );
    std::process::exit(1);
}

#[cfg(windows)]
mod logging {
    use sash::{Action, InputSink, Key, MouseButton};

    /// Logs each callback at info level.
    pub struct LogSink;

    impl InputSink for LogSink {
        fn key(&mut self, key: Key, action: Action) {
            log::info!("key {key:?} {action:?}");
        }
        fn character(&mut self, ch: char) {
            log::info!("char {ch:?}");
        }
        fn mouse_click(&mut self, button: MouseButton, action: Action) {
            log::info!("mouse {button:?} {action:?}");
        }
        fn cursor_motion(&mut self, x: f64, y: f64) {
            log::debug!("cursor {x:.1},{y:.1}");
        }
        fn cursor_enter(&mut self, entered: bool) {
            log::info!("cursor {}", if entered { "entered" } else { "left" });
        }
        fn scroll(&mut self, x: f64, y: f64) {
            log::info!("scroll {x:+.2},{y:+.2}");
        }
        fn window_size(&mut self, width: i32, height: i32) {
            log::info!("size {width}x{height}");
        }
        fn window_pos(&mut self, x: i32, y: i32) {
            log::info!("pos {x},{y}");
        }
        fn window_focus(&mut self, focused: bool) {
            log::info!("focus {focused}");
        }
        fn window_iconify(&mut self, iconified: bool) {
            log::info!("iconified {iconified}");
        }
        fn window_visibility(&mut self, visible: bool) {
            log::info!("visible {visible}");
        }
        fn window_close_request(&mut self) {
            log::info!("close request");
        }
        fn window_damage(&mut self) {
            log::debug!("damage");
        }
        fn monitor_change(&mut self) {
            log::info!("monitor configuration changed");
        }
    }
}
