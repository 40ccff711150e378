//! Language code resolution for applications and their extension hosts.
//! This crate owns the fallback policy: callers always receive a usable code.

pub mod debug_log;
pub mod language;
pub mod logging;
pub mod resolver;
pub mod source;

#[doc(hidden)]
pub use log as __log;

pub use debug_log::debug_log_enabled;
pub use language::{LanguageCode, LocaleError, DEFAULT_LANGUAGE_CODE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use resolver::{
    configure_shared, shared_instance, LocaleResolver, LocaleSnapshot, ResolverConfig,
};
pub use source::{FixedLocaleSource, LocaleSource, ProcessEnvironment, SystemPreferences};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
