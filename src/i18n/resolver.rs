//! Locale resolution from URL, persisted preference and browser default.

use crate::i18n::locale::is_language_segment;
use crate::i18n::Locale;

/// Outcome of [`resolve_locale`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub locale: Locale,

    /// The requested path with the resolved language segment in place.
    /// Equal to the requested path when the URL already named a locale.
    pub canonical_path: String,
}

impl Resolution {
    /// Whether the canonical path differs from the requested one.
    pub fn is_rewrite(&self, requested_path: &str) -> bool {
        self.canonical_path != requested_path
    }
}

/// Determine the active locale for `requested_path` (path plus optional
/// `?query`).
///
/// Priority:
/// 1. a supported two-letter language segment at the start of the path
/// 2. `persisted`, if it names a supported locale
/// 3. `browser_default`, if it names a supported locale
/// 4. the canonical locale (English)
///
/// In cases 2-4 the canonical path substitutes the chosen locale's segment:
/// an unsupported two-letter segment is replaced, otherwise the segment is
/// prepended. An empty remainder maps to the home route.
pub fn resolve_locale(
    requested_path: &str,
    persisted: Option<&str>,
    browser_default: Option<&str>,
) -> Resolution {
    let (path, query) = split_query(requested_path);
    let trimmed = path.trim_start_matches('/');
    let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));

    if let Some(locale) = Locale::from_segment(first) {
        return Resolution {
            locale,
            canonical_path: requested_path.to_string(),
        };
    }

    let locale = supported(persisted)
        .or_else(|| supported(browser_default))
        .unwrap_or_else(Locale::canonical);

    let remainder = if is_language_segment(first) {
        rest
    } else {
        trimmed
    };
    let remainder = remainder.trim_matches('/');
    let remainder = if remainder.is_empty() { "home" } else { remainder };

    let mut canonical_path = format!("/{}/{}", locale.code(), remainder);
    if let Some(query) = query {
        canonical_path.push('?');
        canonical_path.push_str(query);
    }

    Resolution {
        locale,
        canonical_path,
    }
}

fn supported(code: Option<&str>) -> Option<Locale> {
    let code = code?.trim().to_ascii_lowercase();
    Locale::from_segment(&code)
}

/// Split `path?query` into its parts. An empty query counts as absent.
pub fn split_query(path_and_query: &str) -> (&str, Option<&str>) {
    match path_and_query.split_once('?') {
        Some((path, query)) if !query.is_empty() => (path, Some(query)),
        Some((path, _)) => (path, None),
        None => (path_and_query, None),
    }
}

/// Pick the browser's preferred supported locale from an `Accept-Language`
/// header value.
///
/// Tags are ordered by their `q` weight (stable for equal weights); regional
/// variants match by primary subtag (`ar-EG` -> `ar`). Tags with `q=0` are
/// skipped.
pub fn locale_from_accept_language(header: &str) -> Option<Locale> {
    let mut tags: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let weight = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((tag, weight))
        })
        .filter(|(_, weight)| *weight > 0.0)
        .collect();

    tags.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    tags.into_iter().find_map(|(tag, _)| {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or(tag)
            .to_ascii_lowercase();
        Locale::from_segment(&primary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== URL Priority Tests ====================

    #[test]
    fn test_url_locale_wins() {
        let resolution = resolve_locale("/ar/vendor", Some("en"), Some("en"));
        assert_eq!(resolution.locale, Locale::ARABIC);
        assert_eq!(resolution.canonical_path, "/ar/vendor");
        assert!(!resolution.is_rewrite("/ar/vendor"));
    }

    #[test]
    fn test_url_locale_keeps_query() {
        let resolution = resolve_locale("/en/browse?type=startup", Some("ar"), None);
        assert_eq!(resolution.locale, Locale::ENGLISH);
        assert_eq!(resolution.canonical_path, "/en/browse?type=startup");
    }

    // ==================== Persisted Preference Tests ====================

    #[test]
    fn test_persisted_preference_prepends_segment() {
        let resolution = resolve_locale("/pricing", Some("ar"), Some("en"));
        assert_eq!(resolution.locale, Locale::ARABIC);
        assert_eq!(resolution.canonical_path, "/ar/pricing");
        assert!(resolution.is_rewrite("/pricing"));
    }

    #[test]
    fn test_persisted_preference_replaces_unsupported_segment() {
        let resolution = resolve_locale("/fr/vendor?x=1", Some("ar"), None);
        assert_eq!(resolution.locale, Locale::ARABIC);
        assert_eq!(resolution.canonical_path, "/ar/vendor?x=1");
    }

    #[test]
    fn test_unsupported_persisted_value_is_ignored() {
        let resolution = resolve_locale("/pricing", Some("de"), Some("ar"));
        assert_eq!(resolution.locale, Locale::ARABIC);
    }

    // ==================== Browser Default Tests ====================

    #[test]
    fn test_browser_default_used_without_preference() {
        let resolution = resolve_locale("/buyer", None, Some("ar"));
        assert_eq!(resolution.locale, Locale::ARABIC);
        assert_eq!(resolution.canonical_path, "/ar/buyer");
    }

    #[test]
    fn test_falls_back_to_english() {
        let resolution = resolve_locale("/buyer", None, Some("ja"));
        assert_eq!(resolution.locale, Locale::ENGLISH);
        assert_eq!(resolution.canonical_path, "/en/buyer");
    }

    #[test]
    fn test_empty_path_maps_to_home() {
        assert_eq!(resolve_locale("/", None, None).canonical_path, "/en/home");
        assert_eq!(resolve_locale("", Some("ar"), None).canonical_path, "/ar/home");
        assert_eq!(resolve_locale("/fr", None, None).canonical_path, "/en/home");
    }

    #[test]
    fn test_persisted_value_is_case_insensitive() {
        assert_eq!(
            resolve_locale("/pricing", Some(" AR "), None).locale,
            Locale::ARABIC
        );
    }

    // ==================== split_query Tests ====================

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("/en/home"), ("/en/home", None));
        assert_eq!(split_query("/en/home?"), ("/en/home", None));
        assert_eq!(split_query("/en/browse?type=x"), ("/en/browse", Some("type=x")));
    }

    // ==================== Accept-Language Tests ====================

    #[test]
    fn test_accept_language_first_supported() {
        assert_eq!(
            locale_from_accept_language("fr-FR,ar-EG;q=0.8,en;q=0.5"),
            Some(Locale::ARABIC)
        );
    }

    #[test]
    fn test_accept_language_respects_weights() {
        assert_eq!(
            locale_from_accept_language("en;q=0.3, ar;q=0.9"),
            Some(Locale::ARABIC)
        );
    }

    #[test]
    fn test_accept_language_skips_zero_weight() {
        assert_eq!(
            locale_from_accept_language("ar;q=0, en-US;q=0.1"),
            Some(Locale::ENGLISH)
        );
    }

    #[test]
    fn test_accept_language_none_supported() {
        assert_eq!(locale_from_accept_language("de-DE,fr"), None);
        assert_eq!(locale_from_accept_language(""), None);
        assert_eq!(locale_from_accept_language("*"), None);
    }
}
