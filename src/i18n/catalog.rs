//! Translation catalog: nested per-locale string tables.
//!
//! Tables are JSON objects embedded at compile time from `locales/`. Keys are
//! dotted paths into the object (`"browse.fields.category"`). Lookups never
//! fail: a key missing from the active table is looked up in the canonical
//! table, and a key missing there too is returned verbatim.

use std::collections::HashMap;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::i18n::{Locale, LookupMetrics};

const EMBEDDED_TABLES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("ar", include_str!("../../locales/ar.json")),
];

static CATALOG: OnceLock<Catalog> = OnceLock::new();
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder regex is valid")
    })
}

/// All translation tables, keyed by locale code.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<String, Value>,
    canonical: String,
}

impl Catalog {
    /// The catalog built from the embedded `locales/*.json` tables.
    ///
    /// # Panics
    /// Panics if an embedded table is not a JSON object; the shipped tables
    /// are checked by `catalog-check` and by the tests below.
    pub fn global() -> &'static Catalog {
        CATALOG.get_or_init(|| {
            Catalog::from_sources(EMBEDDED_TABLES).expect("embedded translation tables are valid")
        })
    }

    /// Build a catalog from `(locale code, JSON source)` pairs.
    ///
    /// The canonical locale of the registry is always the fallback table.
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self> {
        let mut tables = HashMap::new();
        for (code, source) in sources {
            let value: Value = serde_json::from_str(source)
                .with_context(|| format!("Failed to parse translation table '{}'", code))?;
            if !value.is_object() {
                bail!("Translation table '{}' must be a JSON object", code);
            }
            tables.insert((*code).to_string(), value);
        }

        Ok(Self {
            tables,
            canonical: Locale::canonical().code().to_string(),
        })
    }

    /// Codes of all loaded tables, sorted.
    pub fn table_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn canonical_code(&self) -> &str {
        &self.canonical
    }

    /// Raw lookup of a dotted key in one table, without fallback.
    ///
    /// Only string leaves resolve; objects and other JSON types do not.
    pub fn lookup(&self, code: &str, key: &str) -> Option<&str> {
        let mut node = self.tables.get(code)?;
        for part in key.split('.') {
            node = node.as_object()?.get(part)?;
        }
        node.as_str()
    }

    /// Translate `key` for `locale`, substituting `{{name}}` placeholders.
    ///
    /// Resolution order: the locale's table, the canonical table, the key
    /// itself.
    pub fn translate(&self, locale: Locale, key: &str, params: &[(&str, &str)]) -> String {
        let metrics = LookupMetrics::global();

        let resolved = match self.lookup(locale.code(), key) {
            Some(text) => {
                metrics.record_direct_hit();
                text
            }
            None => match self.lookup(&self.canonical, key) {
                Some(text) => {
                    debug!("Translation '{}' missing for '{}', using fallback", key, locale);
                    metrics.record_fallback_hit();
                    text
                }
                None => {
                    debug!("Translation '{}' missing in every table", key);
                    metrics.record_miss();
                    key
                }
            },
        };

        if params.is_empty() {
            resolved.to_string()
        } else {
            interpolate(resolved, params)
        }
    }

    /// All dotted keys with string values in one table, sorted.
    pub fn keys(&self, code: &str) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(table) = self.tables.get(code) {
            collect_keys(table, String::new(), &mut keys);
        }
        keys.sort();
        keys
    }
}

fn collect_keys(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (name, child) in map {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}.{}", prefix, name)
                };
                collect_keys(child, path, out);
            }
        }
        Value::String(_) => out.push(prefix),
        _ => {}
    }
}

/// Substitute `{{name}}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, and placeholders without a
/// matching parameter are left as they are.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match params.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => (*value).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Placeholder names appearing in a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Translation lookups bound to one locale.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    locale: Locale,
    catalog: &'static Catalog,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            catalog: Catalog::global(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.catalog.translate(self.locale, key, &[])
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.catalog.translate(self.locale, key, params)
    }
}

/// Translate `key` for `locale` using the embedded catalog.
pub fn translate(locale: Locale, key: &str, params: &[(&str, &str)]) -> String {
    Catalog::global().translate(locale, key, params)
}
