//! Debug-build-only log switch.
//!
//! `debug_log!` forwards to `log::debug!` when `debug_assertions` is on and
//! emits nothing in release builds. Arguments are still type-checked in
//! release so the two build modes cannot drift apart.

/// Logs at debug level in debug builds only.
///
/// ```
/// localeutil_core::debug_log!("resolved code={}", "fr");
/// ```
#[macro_export]
macro_rules! debug_log {
    (target: $target:expr, $($arg:tt)+) => {
        if cfg!(debug_assertions) {
            $crate::__log::debug!(target: $target, $($arg)+);
        }
    };
    ($($arg:tt)+) => {
        if cfg!(debug_assertions) {
            $crate::__log::debug!($($arg)+);
        }
    };
}

/// Whether `debug_log!` emits in the current build.
pub fn debug_log_enabled() -> bool {
    cfg!(debug_assertions)
}
