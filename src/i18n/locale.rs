//! Locale type: validated locale handle backed by the registry.

use std::fmt;

use crate::i18n::{LocaleConfig, LocaleRegistry, TextDirection};
use anyhow::{bail, Result};

/// A validated locale.
///
/// Only supported, enabled locales can be constructed, so holding a `Locale`
/// means its registry entry and translation table exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    /// ISO 639-1 code, also the URL language segment (e.g., "en", "ar")
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const ARABIC: Locale = Locale { code: "ar" };

    /// Create a Locale from a language code string.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered and enabled
    /// * `Err` if the code is not found or the locale is disabled
    pub fn from_code(code: &str) -> Result<Locale> {
        let registry = LocaleRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Locale { code: config.code }),
            Some(_) => bail!("Locale '{}' is not enabled", code),
            None => bail!("Unknown locale code: '{}'", code),
        }
    }

    /// Parse a URL path segment as a locale.
    ///
    /// Only two-letter lowercase ASCII segments naming an enabled locale match.
    pub fn from_segment(segment: &str) -> Option<Locale> {
        if !is_language_segment(segment) {
            return None;
        }
        Locale::from_code(segment).ok()
    }

    /// Get the canonical (default/fallback) locale.
    pub fn canonical() -> Locale {
        let config = LocaleRegistry::get().canonical();
        Locale { code: config.code }
    }

    /// All enabled locales, in registry order.
    pub fn enabled() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be registered")
    }

    pub fn direction(&self) -> TextDirection {
        self.config().direction
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == TextDirection::Rtl
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::canonical()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// Whether a path segment has the shape of a language segment (two ASCII
/// lowercase letters), regardless of whether that language is supported.
pub fn is_language_segment(segment: &str) -> bool {
    segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Construction Tests ====================

    #[test]
    fn test_constants_match_registry() {
        assert_eq!(Locale::ENGLISH.code(), "en");
        assert_eq!(Locale::ARABIC.code(), "ar");
        assert_eq!(Locale::from_code("ar").unwrap(), Locale::ARABIC);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Locale::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
        assert!(Locale::from_code("").is_err());
    }

    #[test]
    fn test_canonical_is_english_and_default() {
        assert_eq!(Locale::canonical(), Locale::ENGLISH);
        assert_eq!(Locale::default(), Locale::ENGLISH);
        assert!(Locale::ENGLISH.is_canonical());
        assert!(!Locale::ARABIC.is_canonical());
    }

    #[test]
    fn test_enabled_lists_both() {
        assert_eq!(Locale::enabled(), vec![Locale::ENGLISH, Locale::ARABIC]);
    }

    // ==================== Segment Tests ====================

    #[test]
    fn test_from_segment() {
        assert_eq!(Locale::from_segment("en"), Some(Locale::ENGLISH));
        assert_eq!(Locale::from_segment("ar"), Some(Locale::ARABIC));
        assert_eq!(Locale::from_segment("fr"), None);
        assert_eq!(Locale::from_segment("EN"), None);
        assert_eq!(Locale::from_segment("eng"), None);
        assert_eq!(Locale::from_segment(""), None);
    }

    #[test]
    fn test_is_language_segment() {
        assert!(is_language_segment("fr"));
        assert!(is_language_segment("ar"));
        assert!(!is_language_segment("home"));
        assert!(!is_language_segment("e1"));
        assert!(!is_language_segment("عر"));
    }

    // ==================== Direction Tests ====================

    #[test]
    fn test_direction() {
        assert_eq!(Locale::ENGLISH.direction(), TextDirection::Ltr);
        assert_eq!(Locale::ARABIC.direction(), TextDirection::Rtl);
        assert!(Locale::ARABIC.is_rtl());
        assert!(!Locale::ENGLISH.is_rtl());
    }

    #[test]
    fn test_display() {
        assert_eq!(Locale::ARABIC.to_string(), "ar");
        assert_eq!(Locale::ARABIC.native_name(), "العربية");
    }
}
