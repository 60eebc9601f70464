#![deny(missing_docs)]
//! Shared logging utilities for the jobboard workspace.
//!
//! This crate provides the `nav_*` logging macros used by the router and the
//! page initializers, plus a minimal test initializer for the global logger.
//! All records are emitted under the [`NAV_TARGET`] target so the router's
//! output can be filtered independently of transport crates.

/// Log target shared by every `nav_*` macro.
pub const NAV_TARGET: &str = "spa";

/// Logs a trace-level message under the navigation target.
#[macro_export]
macro_rules! nav_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::NAV_TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the navigation target.
#[macro_export]
macro_rules! nav_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::NAV_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the navigation target.
#[macro_export]
macro_rules! nav_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::NAV_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the navigation target.
///
/// Every hard fallback goes through this macro.
#[macro_export]
macro_rules! nav_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::NAV_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the navigation target.
#[macro_export]
macro_rules! nav_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::NAV_TARGET, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str(NAV_TARGET)
        .add_filter_allow_str("jobboard")
        .build();

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
