//! Locale registry: Single source of truth for all supported locales.
//!
//! This module provides a centralized registry of all locales the site can be
//! served in. It uses a singleton pattern with `OnceLock` to ensure thread-safe
//! initialization and access.

use std::sync::OnceLock;

use serde::Serialize;

/// Direction in which text of a locale is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value for the HTML `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 language code, also used as the URL segment (e.g., "en", "ar")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Arabic")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "العربية")
    pub native_name: &'static str,

    /// Layout direction for pages rendered in this locale
    pub direction: TextDirection,

    /// Whether this is the canonical/fallback locale (only one should be true)
    pub is_canonical: bool,

    /// Whether this locale is enabled for use
    pub enabled: bool,
}

/// Global locale registry singleton.
///
/// Initialized once on first access and immutable thereafter.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale exists
    /// * `None` if the locale is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all enabled locales, in registry order.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

    /// Get all locales (including disabled ones).
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the canonical locale configuration.
    ///
    /// The canonical locale is the default for redirects and the fallback
    /// table for missing translation keys.
    ///
    /// # Panics
    /// Panics if no canonical locale is found or if multiple canonical
    /// locales are defined (this indicates a configuration error).
    pub fn canonical(&self) -> &LocaleConfig {
        let canonical: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_canonical)
            .collect();

        match canonical.len() {
            0 => panic!("No canonical locale found in registry"),
            1 => canonical[0],
            _ => panic!("Multiple canonical locales found in registry"),
        }
    }

    /// Check if a locale code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }
}

/// Default locale configurations: English (canonical) and Arabic.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            direction: TextDirection::Ltr,
            is_canonical: true,
            enabled: true,
        },
        LocaleConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
            direction: TextDirection::Rtl,
            is_canonical: false,
            enabled: true,
        },
    ]
}
