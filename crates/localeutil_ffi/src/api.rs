//! FFI use-case API for host application calls.
//!
//! # Responsibility
//! - Expose the shared resolver to the host through sync FRB functions.
//! - Keep every call infallible from the host's point of view.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Language codes returned here are never empty.

use localeutil_core::{
    configure_shared, core_version as core_version_inner, init_logging as init_logging_inner,
    shared_instance, LanguageCode, LocaleResolver, ResolverConfig,
};
use std::panic::{catch_unwind, AssertUnwindSafe};

const EXPLORE_UNAVAILABLE: &str = "locale state unavailable";

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Configures the shared resolver before first use.
///
/// `preferred_language` is the host application's own language choice;
/// pass `None` (or blank) to follow the system list.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_locale(fallback_language: String, preferred_language: Option<String>) -> String {
    let config = ResolverConfig {
        fallback_language,
        preferred_language,
    };
    match configure_shared(config) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Records whether the host runs inside an app extension.
///
/// # FFI contract
/// - Sync call, non-blocking, thread-safe.
#[flutter_rust_bridge::frb(sync)]
pub fn set_extension_mode(enabled: bool) {
    shared_instance().set_extension_mode(enabled);
}

/// Returns the extension flag last set by the host.
#[flutter_rust_bridge::frb(sync)]
pub fn extension_mode() -> bool {
    shared_instance().extension_mode()
}

/// Language code for main application execution.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; returns the fallback code when nothing is available.
#[flutter_rust_bridge::frb(sync)]
pub fn language_code() -> String {
    guarded_code(LocaleResolver::language_code)
}

/// Language code for extension-hosted execution.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; returns the fallback code when nothing is available.
#[flutter_rust_bridge::frb(sync)]
pub fn language_code_in_extension() -> String {
    guarded_code(LocaleResolver::language_code_in_extension)
}

/// Language code for the context recorded by `set_extension_mode`.
#[flutter_rust_bridge::frb(sync)]
pub fn current_language_code() -> String {
    guarded_code(LocaleResolver::current_language_code)
}

/// Free-form locale diagnostics for debug screens.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn explore() -> String {
    guarded_explore(LocaleResolver::explore)
}

fn guarded_explore(dump: fn(&LocaleResolver) -> String) -> String {
    let resolver = shared_instance();
    match catch_unwind(AssertUnwindSafe(|| dump(resolver))) {
        Ok(text) => text,
        Err(_) => {
            log::error!("event=explore module=ffi status=error reason=panic");
            EXPLORE_UNAVAILABLE.to_string()
        }
    }
}

fn guarded_code(lookup: fn(&LocaleResolver) -> LanguageCode) -> String {
    let resolver = shared_instance();
    match catch_unwind(AssertUnwindSafe(|| lookup(resolver))) {
        Ok(code) => code.into_string(),
        Err(_) => {
            log::error!("event=language_lookup module=ffi status=error reason=panic");
            resolver.fallback().to_string()
        }
    }
}
