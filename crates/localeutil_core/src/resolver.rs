//! Process-wide language code resolution.
//!
//! # Responsibility
//! - Answer "which language code should the application use right now".
//! - Keep main-application and extension-host lookups separate.
//! - Expose one shared instance plus explicit construction for handle passing.
//!
//! # Invariants
//! - Resolution never fails; unusable locale data yields the fallback code.
//! - `language_code()` and `language_code_in_extension()` ignore the
//!   extension flag; only `current_language_code()` reads it.
//! - The shared instance is created once and never replaced.

use crate::language::{LanguageCode, DEFAULT_LANGUAGE_CODE};
use crate::source::{LocaleSource, ProcessEnvironment, SystemPreferences};
use log::debug;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

static SHARED_RESOLVER: OnceCell<LocaleResolver> = OnceCell::new();

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Tag whose primary subtag becomes the fallback code.
    pub fallback_language: String,
    /// Application-level language override for standard execution.
    ///
    /// Extension hosts cannot read the application's own preferences, so
    /// this is not consulted by `language_code_in_extension()`.
    pub preferred_language: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_language: DEFAULT_LANGUAGE_CODE.to_string(),
            preferred_language: None,
        }
    }
}

impl ResolverConfig {
    fn normalized_fallback(&self) -> Result<LanguageCode, String> {
        LanguageCode::from_locale_tag(&self.fallback_language).map_err(|err| {
            format!(
                "invalid fallback language `{}`: {err}",
                self.fallback_language
            )
        })
    }

    fn normalized_preferred(&self) -> Result<Option<LanguageCode>, String> {
        match self.preferred_language.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(tag) => LanguageCode::from_locale_tag(tag)
                .map(Some)
                .map_err(|err| format!("invalid preferred language `{tag}`: {err}")),
        }
    }
}

/// Language code resolver for main-application and extension execution.
pub struct LocaleResolver {
    extension_mode: AtomicBool,
    standard: Box<dyn LocaleSource>,
    extension: Box<dyn LocaleSource>,
    fallback: LanguageCode,
    preferred: Option<LanguageCode>,
    config: ResolverConfig,
}

impl LocaleResolver {
    /// Creates a resolver over the given sources with default configuration.
    pub fn new(
        standard: impl LocaleSource + 'static,
        extension: impl LocaleSource + 'static,
    ) -> Self {
        Self {
            extension_mode: AtomicBool::new(false),
            standard: Box::new(standard),
            extension: Box::new(extension),
            fallback: LanguageCode::fallback(),
            preferred: None,
            config: ResolverConfig::default(),
        }
    }

    /// Creates a resolver over the given sources with validated configuration.
    ///
    /// # Errors
    /// - Returns an error when `fallback_language` is not a language tag.
    /// - Returns an error when `preferred_language` is set but unusable.
    pub fn with_config(
        standard: impl LocaleSource + 'static,
        extension: impl LocaleSource + 'static,
        config: ResolverConfig,
    ) -> Result<Self, String> {
        let fallback = config.normalized_fallback()?;
        let preferred = config.normalized_preferred()?;
        let mut resolver = Self::new(standard, extension);
        resolver.fallback = fallback;
        resolver.preferred = preferred;
        resolver.config = config;
        Ok(resolver)
    }

    /// Resolver over the platform sources.
    pub fn system() -> Self {
        Self::new(SystemPreferences, ProcessEnvironment)
    }

    /// Records whether the caller runs inside an extension host.
    pub fn set_extension_mode(&self, enabled: bool) {
        self.extension_mode.store(enabled, Ordering::SeqCst);
        crate::debug_log!("event=extension_mode_set module=resolver enabled={enabled}");
    }

    pub fn extension_mode(&self) -> bool {
        self.extension_mode.load(Ordering::SeqCst)
    }

    /// Language code for standard (main application) execution.
    ///
    /// Order: configured application preference, then the platform's
    /// preferred-language list, then the fallback.
    pub fn language_code(&self) -> LanguageCode {
        if let Some(preferred) = &self.preferred {
            return preferred.clone();
        }
        let tags = self.standard.preferred_languages();
        self.resolve_tags(self.standard.name(), &tags)
    }

    /// Language code for extension-hosted execution.
    pub fn language_code_in_extension(&self) -> LanguageCode {
        let tags = self.extension.preferred_languages();
        self.resolve_tags(self.extension.name(), &tags)
    }

    /// Language code for the execution context recorded by the flag.
    pub fn current_language_code(&self) -> LanguageCode {
        if self.extension_mode() {
            self.language_code_in_extension()
        } else {
            self.language_code()
        }
    }

    pub fn fallback(&self) -> &LanguageCode {
        &self.fallback
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Collects the current locale state for diagnostics.
    pub fn snapshot(&self) -> LocaleSnapshot {
        let standard_tags = self.standard.preferred_languages();
        let extension_tags = self.extension.preferred_languages();
        let language_code = match &self.preferred {
            Some(preferred) => preferred.clone(),
            None => self.resolve_tags(self.standard.name(), &standard_tags),
        };
        let extension_language_code = self.resolve_tags(self.extension.name(), &extension_tags);

        LocaleSnapshot {
            extension_mode: self.extension_mode(),
            standard_source: self.standard.name(),
            standard_tags,
            language_code,
            extension_source: self.extension.name(),
            extension_tags,
            extension_language_code,
            preferred_language: self.preferred.clone(),
            fallback: self.fallback.clone(),
            platform: std::env::consts::OS,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Human-readable dump of locale state. Free-form, not for parsing.
    pub fn explore(&self) -> String {
        self.snapshot().to_string()
    }

    fn resolve_tags(&self, source: &str, tags: &[String]) -> LanguageCode {
        match LanguageCode::first_from_tags(tags) {
            Ok(code) => code,
            Err(err) => {
                debug!(
                    "event=locale_fallback module=resolver status=degraded source={} tags={} reason={} fallback={}",
                    source,
                    tags.len(),
                    err,
                    self.fallback
                );
                self.fallback.clone()
            }
        }
    }
}

impl Debug for LocaleResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleResolver")
            .field("extension_mode", &self.extension_mode())
            .field("standard", &self.standard.name())
            .field("extension", &self.extension.name())
            .field("fallback", &self.fallback)
            .field("preferred", &self.preferred)
            .finish()
    }
}

/// Diagnostic view of resolver state.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleSnapshot {
    pub extension_mode: bool,
    pub standard_source: &'static str,
    pub standard_tags: Vec<String>,
    pub language_code: LanguageCode,
    pub extension_source: &'static str,
    pub extension_tags: Vec<String>,
    pub extension_language_code: LanguageCode,
    pub preferred_language: Option<LanguageCode>,
    pub fallback: LanguageCode,
    pub platform: &'static str,
    pub version: &'static str,
}

impl std::fmt::Display for LocaleSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "localeutil {} on {}", self.version, self.platform)?;
        writeln!(f, "extension mode: {}", self.extension_mode)?;
        writeln!(
            f,
            "standard [{}]: {} <- {:?}",
            self.standard_source, self.language_code, self.standard_tags
        )?;
        writeln!(
            f,
            "extension [{}]: {} <- {:?}",
            self.extension_source, self.extension_language_code, self.extension_tags
        )?;
        match &self.preferred_language {
            Some(code) => writeln!(f, "preferred override: {code}")?,
            None => writeln!(f, "preferred override: none")?,
        }
        write!(f, "fallback: {}", self.fallback)
    }
}

/// Returns the process-wide resolver, creating it on first access.
///
/// Safe to call from any thread; every call returns the same instance.
pub fn shared_instance() -> &'static LocaleResolver {
    SHARED_RESOLVER.get_or_init(|| {
        debug!("event=resolver_init module=resolver status=ok config=default");
        LocaleResolver::system()
    })
}

/// Installs configuration for the shared resolver.
///
/// # Invariants
/// - Calling this repeatedly with a config that normalizes to the same
///   fallback and preferred codes is idempotent (`EN` after `en`).
/// - A different config after the shared instance exists is rejected,
///   including after a plain `shared_instance()` created it with defaults.
///
/// # Errors
/// - Returns an error when `config` fails validation.
/// - Returns an error when the shared instance already uses another config.
pub fn configure_shared(config: ResolverConfig) -> Result<(), String> {
    let fallback = config.normalized_fallback()?;
    let preferred = config.normalized_preferred()?;

    let resolver = SHARED_RESOLVER.get_or_try_init(|| {
        let resolver =
            LocaleResolver::with_config(SystemPreferences, ProcessEnvironment, config.clone())?;
        debug!(
            "event=resolver_init module=resolver status=ok fallback={} preferred={:?}",
            resolver.fallback,
            resolver.preferred.as_ref().map(LanguageCode::as_str)
        );
        Ok::<_, String>(resolver)
    })?;

    if resolver.fallback != fallback || resolver.preferred != preferred {
        return Err(format!(
            "shared resolver already initialized with {:?}; refusing to switch to {:?}",
            resolver.config, config
        ));
    }
    Ok(())
}
