//! Locale source contracts and platform adapters.
//!
//! # Responsibility
//! - Provide ordered raw locale tags to the resolver.
//! - Keep platform access behind one trait so hosts and tests can inject data.
//!
//! # Invariants
//! - Sources never fail; missing data is an empty list.
//! - Sources return raw tags; normalization belongs to `language`.

/// Ordered provider of raw locale tags, most preferred first.
pub trait LocaleSource: Send + Sync {
    /// Short label used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Returns raw tags (`fr-FR`, `de_DE.UTF-8`, ...). May be empty.
    fn preferred_languages(&self) -> Vec<String>;
}

/// User-level preferred language list of the platform.
///
/// Main application path. On Apple platforms this is the ordered language
/// preference list; on Windows the user UI languages; elsewhere the POSIX
/// locale variables as interpreted by `sys-locale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPreferences;

impl LocaleSource for SystemPreferences {
    fn name(&self) -> &'static str {
        "system_preferences"
    }

    fn preferred_languages(&self) -> Vec<String> {
        sys_locale::get_locales().collect()
    }
}

/// Variables read by `ProcessEnvironment`, in precedence order.
pub const LOCALE_ENV_VARS: &[&str] = &["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// Process-level locale as seen by extension-hosted code.
///
/// Extension hosts do not share the main application's preference surface,
/// so this reads the process locale environment and then the single current
/// system locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl LocaleSource for ProcessEnvironment {
    fn name(&self) -> &'static str {
        "process_environment"
    }

    fn preferred_languages(&self) -> Vec<String> {
        let mut tags = languages_from_vars(|key| std::env::var(key).ok());
        if let Some(current) = sys_locale::get_locale() {
            if !tags.contains(&current) {
                tags.push(current);
            }
        }
        tags
    }
}

/// Caller-supplied tag list.
///
/// Used by hosts that already hold the user's preference list and by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedLocaleSource {
    tags: Vec<String>,
}

impl FixedLocaleSource {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl LocaleSource for FixedLocaleSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn preferred_languages(&self) -> Vec<String> {
        self.tags.clone()
    }
}

/// Collects tags from locale variables using `lookup`.
///
/// `LANGUAGE` is a colon-separated priority list; the other variables hold
/// one tag each. Blank values are ignored and duplicates keep their first
/// position.
pub fn languages_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for &key in LOCALE_ENV_VARS {
        let Some(raw) = lookup(key) else {
            continue;
        };
        let values: Vec<&str> = if key == "LANGUAGE" {
            raw.split(':').collect()
        } else {
            vec![raw.as_str()]
        };
        for value in values {
            let trimmed = value.trim();
            if trimmed.is_empty() || tags.iter().any(|tag| tag == trimmed) {
                continue;
            }
            tags.push(trimmed.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::{languages_from_vars, FixedLocaleSource, LocaleSource};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn env_precedence_follows_gettext_order() {
        let tags = languages_from_vars(lookup_from(&[
            ("LANG", "en_US.UTF-8"),
            ("LC_MESSAGES", "de_DE.UTF-8"),
            ("LC_ALL", "fr_FR.UTF-8"),
            ("LANGUAGE", "pt_BR:es"),
        ]));
        assert_eq!(
            tags,
            vec!["pt_BR", "es", "fr_FR.UTF-8", "de_DE.UTF-8", "en_US.UTF-8"]
        );
    }

    #[test]
    fn env_blank_and_duplicate_values_are_dropped() {
        let tags = languages_from_vars(lookup_from(&[
            ("LANGUAGE", "::"),
            ("LC_ALL", ""),
            ("LC_MESSAGES", "it_IT"),
            ("LANG", "it_IT"),
        ]));
        assert_eq!(tags, vec!["it_IT"]);
    }

    #[test]
    fn env_without_vars_is_empty() {
        assert!(languages_from_vars(|_| None).is_empty());
    }

    #[test]
    fn fixed_source_returns_tags_in_order() {
        let source = FixedLocaleSource::new(["fr-FR", "en-US"]);
        assert_eq!(source.name(), "fixed");
        assert_eq!(source.preferred_languages(), vec!["fr-FR", "en-US"]);
        assert!(FixedLocaleSource::empty().preferred_languages().is_empty());
    }
}
