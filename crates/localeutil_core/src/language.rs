//! Language code model and tag normalization.
//!
//! # Responsibility
//! - Turn raw platform locale tags into short language codes.
//! - Own the fallback code returned when nothing usable is available.
//!
//! # Invariants
//! - A `LanguageCode` is never empty.
//! - A `LanguageCode` is always 2–3 lowercase ASCII letters.
//! - The only way to obtain a code without parsing is `LanguageCode::fallback()`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use unic_langid::LanguageIdentifier;

/// Code returned when no locale source yields a usable tag.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

// `lang[_REGION][.codeset][@modifier]`; only the part before codeset/modifier
// is a language identifier.
static POSIX_LOCALE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<tag>[^.@]*)(?:\.[^@]*)?(?:@.*)?$").expect("valid posix locale regex")
});

/// Short language identifier, e.g. `fr` for `fr-FR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Derives a code from one raw locale tag.
    ///
    /// Accepts BCP-47 (`fr-FR`, `zh-Hans-CN`) and POSIX (`de_DE.UTF-8`,
    /// `sr_RS@latin`) shapes and keeps the primary language subtag.
    ///
    /// # Errors
    /// - `LocaleError::Unavailable` when the tag is blank.
    /// - `LocaleError::Malformed` when the tag does not name a language
    ///   (`C`, `POSIX`, `und`, unparsable input).
    ///
    /// Extension and private-use sequences (`-u-nu-latn`, `-x-foo`) are
    /// dropped before parsing.
    pub fn from_locale_tag(tag: &str) -> Result<Self, LocaleError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(LocaleError::Unavailable);
        }

        let identifier = POSIX_LOCALE_RE
            .captures(trimmed)
            .and_then(|caps| caps.name("tag"))
            .map(|m| m.as_str())
            .unwrap_or(trimmed);
        let identifier = without_extensions(identifier);
        if identifier.eq_ignore_ascii_case("c") || identifier.eq_ignore_ascii_case("posix") {
            return Err(LocaleError::Malformed(trimmed.to_string()));
        }

        let langid: LanguageIdentifier = identifier
            .parse()
            .map_err(|_| LocaleError::Malformed(trimmed.to_string()))?;
        if langid.language.is_empty() {
            return Err(LocaleError::Malformed(trimmed.to_string()));
        }

        let code = langid.language.as_str().to_ascii_lowercase();
        if !is_short_language_code(&code) {
            return Err(LocaleError::Malformed(trimmed.to_string()));
        }
        Ok(Self(code))
    }

    /// Returns the first code derivable from `tags`, in order.
    ///
    /// Unusable entries are skipped. Returns `LocaleError::Unavailable` when
    /// the list is empty or every entry was rejected.
    pub fn first_from_tags<I, S>(tags: I) -> Result<Self, LocaleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            match Self::from_locale_tag(tag.as_ref()) {
                Ok(code) => return Ok(code),
                Err(err) => log::trace!("event=locale_tag_skipped module=language reason={err}"),
            }
        }
        Err(LocaleError::Unavailable)
    }

    /// The fixed default code.
    pub fn fallback() -> Self {
        Self(DEFAULT_LANGUAGE_CODE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for LanguageCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for LanguageCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Non-fatal locale lookup failures.
///
/// These never reach resolver callers; they are logged and replaced by the
/// fallback code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    Unavailable,
    Malformed(String),
}

impl Display for LocaleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "locale data unavailable"),
            Self::Malformed(tag) => write!(f, "locale tag is not a language: `{tag}`"),
        }
    }
}

impl Error for LocaleError {}

// Extension (`u`, `t`, ...) and private-use (`x`) sequences start at the
// first single-character subtag after the language subtag.
fn without_extensions(identifier: &str) -> &str {
    let mut offset = 0;
    for (index, subtag) in identifier.split(['-', '_']).enumerate() {
        if index > 0 && subtag.len() == 1 {
            return &identifier[..offset - 1];
        }
        offset += subtag.len() + 1;
    }
    identifier
}

/// Returns whether `value` has the shape of a short language code.
///
/// Only 2–3 letter subtags qualify; 5–8 letter registered subtags are
/// rejected.
pub fn is_short_language_code(value: &str) -> bool {
    (2..=3).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{is_short_language_code, LanguageCode, LocaleError, DEFAULT_LANGUAGE_CODE};

    #[test]
    fn bcp47_tags_keep_primary_subtag() {
        for (tag, expected) in [
            ("fr-FR", "fr"),
            ("en-US", "en"),
            ("zh-Hans-CN", "zh"),
            ("de", "de"),
            ("PT-br", "pt"),
            ("yue-Hant-HK", "yue"),
            ("de-DE-u-nu-latn", "de"),
            ("en-US-u-ca-gregory", "en"),
            ("ja-t-it", "ja"),
            ("es-419-x-private", "es"),
            ("fr_CA_u_ca_buddhist", "fr"),
        ] {
            let code = LanguageCode::from_locale_tag(tag).expect("tag should parse");
            assert_eq!(code.as_str(), expected, "tag `{tag}`");
        }
    }

    #[test]
    fn posix_tags_drop_codeset_and_modifier() {
        for (tag, expected) in [
            ("de_DE.UTF-8", "de"),
            ("sr_RS@latin", "sr"),
            ("ca_ES.UTF-8@valencia", "ca"),
            ("ja_JP", "ja"),
        ] {
            let code = LanguageCode::from_locale_tag(tag).expect("tag should parse");
            assert_eq!(code.as_str(), expected, "tag `{tag}`");
        }
    }

    #[test]
    fn non_language_tags_are_rejected() {
        assert_eq!(
            LanguageCode::from_locale_tag("   "),
            Err(LocaleError::Unavailable)
        );
        for tag in ["C", "C.UTF-8", "POSIX", "und", "x", "12-34", "english"] {
            let err = LanguageCode::from_locale_tag(tag).expect_err("tag should be rejected");
            assert!(matches!(err, LocaleError::Malformed(_)), "tag `{tag}`");
        }
    }

    #[test]
    fn only_two_or_three_letter_languages_are_short_codes() {
        for value in ["en", "haw", "yue"] {
            assert!(is_short_language_code(value), "`{value}`");
        }
        for value in ["", "e", "abcde", "english", "EN", "e1"] {
            assert!(!is_short_language_code(value), "`{value}`");
        }

        let code = LanguageCode::from_locale_tag("haw-US").expect("3-letter language");
        assert_eq!(code.as_str(), "haw");
        for tag in ["abcde", "abcdefgh-US"] {
            let err = LanguageCode::from_locale_tag(tag).expect_err("long subtag is rejected");
            assert_eq!(err, LocaleError::Malformed(tag.to_string()));
        }
    }

    #[test]
    fn private_use_only_tags_are_rejected() {
        let err = LanguageCode::from_locale_tag("x-private").expect_err("no language subtag");
        assert!(matches!(err, LocaleError::Malformed(_)));
    }

    #[test]
    fn first_from_tags_skips_unusable_entries() {
        let code = LanguageCode::first_from_tags(["C", "", "it-IT", "en-US"])
            .expect("it-IT should be picked");
        assert_eq!(code.as_str(), "it");

        let err = LanguageCode::first_from_tags(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, LocaleError::Unavailable);
    }

    #[test]
    fn fallback_is_well_formed() {
        let fallback = LanguageCode::fallback();
        assert_eq!(fallback.as_str(), DEFAULT_LANGUAGE_CODE);
        assert!(is_short_language_code(fallback.as_str()));
    }
}
