//! Translation catalog validation.
//!
//! Compares every non-canonical table against the canonical one so that a
//! page never silently renders a fallback string or a raw key because a
//! translation was forgotten.

use std::collections::BTreeSet;

use crate::i18n::catalog::{placeholders, Catalog};

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make a page fall back or render wrong values
    pub errors: Vec<String>,

    /// Non-critical findings (e.g., keys nobody can fall back to)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation catalogs.
pub struct CatalogValidator;

impl CatalogValidator {
    /// Validate every table of `catalog` against its canonical table.
    ///
    /// This function checks that:
    /// - every canonical key exists in each other table (error)
    /// - each translated value uses the same `{{placeholder}}` set (error)
    /// - keys absent from the canonical table are reported (warning)
    pub fn validate(catalog: &Catalog) -> ValidationReport {
        let mut report = ValidationReport::new();
        let canonical = catalog.canonical_code();
        let canonical_keys: BTreeSet<String> = catalog.keys(canonical).into_iter().collect();

        if canonical_keys.is_empty() {
            report
                .errors
                .push(format!("Canonical table '{}' is missing or empty", canonical));
            return report;
        }

        for code in catalog.table_codes() {
            if code == canonical {
                continue;
            }
            let keys: BTreeSet<String> = catalog.keys(code).into_iter().collect();

            for missing in canonical_keys.difference(&keys) {
                report
                    .errors
                    .push(format!("[{}] missing key '{}'", code, missing));
            }

            for extra in keys.difference(&canonical_keys) {
                report.warnings.push(format!(
                    "[{}] key '{}' has no canonical counterpart",
                    code, extra
                ));
            }

            for key in keys.intersection(&canonical_keys) {
                let (Some(source), Some(translated)) =
                    (catalog.lookup(canonical, key), catalog.lookup(code, key))
                else {
                    continue;
                };
                let expected: BTreeSet<String> = placeholders(source).into_iter().collect();
                let actual: BTreeSet<String> = placeholders(translated).into_iter().collect();
                if expected != actual {
                    report.errors.push(format!(
                        "[{}] placeholder mismatch in '{}': expected {:?}, found {:?}",
                        code, key, expected, actual
                    ));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(en: &str, ar: &str) -> Catalog {
        Catalog::from_sources(&[("en", en), ("ar", ar)]).expect("test catalog parses")
    }

    // ==================== Completeness Tests ====================

    #[test]
    fn test_matching_tables_are_clean() {
        let report = CatalogValidator::validate(&catalog(
            r#"{"a": "A", "b": {"c": "Hi {{name}}"}}"#,
            r#"{"a": "أ", "b": {"c": "مرحبا {{name}}"}}"#,
        ));
        assert!(report.is_clean(), "unexpected findings: {:?}", report);
    }

    #[test]
    fn test_missing_key_is_error() {
        let report = CatalogValidator::validate(&catalog(
            r#"{"a": "A", "b": "B"}"#,
            r#"{"a": "أ"}"#,
        ));
        assert!(report.has_errors());
        assert!(report.errors[0].contains("missing key 'b'"));
    }

    #[test]
    fn test_extra_key_is_warning() {
        let report = CatalogValidator::validate(&catalog(
            r#"{"a": "A"}"#,
            r#"{"a": "أ", "z": "ز"}"#,
        ));
        assert!(!report.has_errors());
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("'z'"));
    }

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_placeholder_mismatch_is_error() {
        let report = CatalogValidator::validate(&catalog(
            r#"{"showing": "Showing {{shown}} of {{total}}"}"#,
            r#"{"showing": "عرض {{shown}}"}"#,
        ));
        assert!(report.has_errors());
        assert!(report.errors[0].contains("placeholder mismatch"));
    }

    #[test]
    fn test_placeholder_order_may_differ() {
        let report = CatalogValidator::validate(&catalog(
            r#"{"showing": "{{shown}} of {{total}}"}"#,
            r#"{"showing": "{{total}} / {{shown}}"}"#,
        ));
        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_canonical_is_error() {
        let report = CatalogValidator::validate(&catalog(r#"{}"#, r#"{"a": "أ"}"#));
        assert!(report.has_errors());
    }

    // ==================== Shipped Catalog Tests ====================

    #[test]
    fn test_shipped_catalog_is_clean() {
        let report = CatalogValidator::validate(Catalog::global());
        assert!(report.is_clean(), "shipped catalog findings: {:?}", report);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::default();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }
}
