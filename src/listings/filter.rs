//! Pure multi-criteria filtering over listing records.

use std::collections::{BTreeMap, BTreeSet};

use crate::listings::{ListingKind, ListingRecord};

/// A record field a criterion can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Category,
    Headquarters,
    Audience,
    Email,
    ValueProposition,
    Problem,
    Solution,
    Context,
    Price,
}

impl FilterField {
    pub const ALL: [FilterField; 9] = [
        FilterField::Category,
        FilterField::Headquarters,
        FilterField::Audience,
        FilterField::Email,
        FilterField::ValueProposition,
        FilterField::Problem,
        FilterField::Solution,
        FilterField::Context,
        FilterField::Price,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterField::Category => "category",
            FilterField::Headquarters => "headquarters",
            FilterField::Audience => "audience",
            FilterField::Email => "email",
            FilterField::ValueProposition => "valueProposition",
            FilterField::Problem => "problem",
            FilterField::Solution => "solution",
            FilterField::Context => "context",
            FilterField::Price => "price",
        }
    }

    /// Query parameter carrying this criterion on the browse page.
    pub fn query_key(&self) -> &'static str {
        match self {
            FilterField::Category => "f.category",
            FilterField::Headquarters => "f.headquarters",
            FilterField::Audience => "f.audience",
            FilterField::Email => "f.email",
            FilterField::ValueProposition => "f.valueProposition",
            FilterField::Problem => "f.problem",
            FilterField::Solution => "f.solution",
            FilterField::Context => "f.context",
            FilterField::Price => "f.price",
        }
    }

    pub fn from_query_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.query_key() == key)
    }

    /// Translation key of the field label.
    pub fn label_key(&self) -> &'static str {
        match self {
            FilterField::Category => "browse.fields.category",
            FilterField::Headquarters => "browse.fields.headquarters",
            FilterField::Audience => "browse.fields.audience",
            FilterField::Email => "browse.fields.email",
            FilterField::ValueProposition => "browse.fields.valueProposition",
            FilterField::Problem => "browse.fields.problem",
            FilterField::Solution => "browse.fields.solution",
            FilterField::Context => "browse.fields.context",
            FilterField::Price => "browse.fields.price",
        }
    }

    /// Whether records of `kind` can carry this field.
    pub fn applies_to(&self, kind: ListingKind) -> bool {
        match self {
            FilterField::Email | FilterField::Price => kind == ListingKind::Software,
            _ => true,
        }
    }

    /// Fields offered as a select fed by [`Facets`] rather than free text.
    pub fn is_faceted(&self) -> bool {
        matches!(
            self,
            FilterField::Category | FilterField::Headquarters | FilterField::Audience
        )
    }
}

/// Active filter values keyed by field. Empty values never constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    values: BTreeMap<FilterField, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterCriteria::set`].
    pub fn with(mut self, field: FilterField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    /// Set `field` to `value`. Surrounding whitespace is ignored and a blank
    /// value clears the criterion.
    pub fn set(&mut self, field: FilterField, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value.to_string());
        }
    }

    pub fn clear(&mut self, field: FilterField) {
        self.values.remove(&field);
    }

    /// Drop every criterion.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-empty criteria in field order.
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Read `f.<field>` pairs out of decoded query parameters; other keys
    /// are ignored.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut criteria = Self::new();
        for (key, value) in pairs {
            if let Some(field) = FilterField::from_query_key(key) {
                criteria.set(field, value);
            }
        }
        criteria
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        self.values
            .iter()
            .map(|(field, value)| (field.query_key(), value.clone()))
            .collect()
    }
}

/// Whether `record` satisfies every non-empty criterion.
///
/// Matching is a case-folded substring test. A record without the targeted
/// field never matches that criterion.
pub fn matches(record: &ListingRecord, criteria: &FilterCriteria) -> bool {
    criteria.active().all(|(field, needle)| {
        record
            .field(field)
            .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    })
}

/// Records of `records` that satisfy `criteria`, in their original order.
pub fn filter(records: &[ListingRecord], criteria: &FilterCriteria) -> Vec<ListingRecord> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}

/// Distinct option values for the faceted selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub headquarters: Vec<String>,
    pub audiences: Vec<String>,
}

impl Facets {
    pub fn from_records(records: &[ListingRecord]) -> Self {
        Self {
            categories: distinct(records, FilterField::Category),
            headquarters: distinct(records, FilterField::Headquarters),
            audiences: distinct(records, FilterField::Audience),
        }
    }

    /// Options for a faceted field; empty for free-text fields.
    pub fn options(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Category => &self.categories,
            FilterField::Headquarters => &self.headquarters,
            FilterField::Audience => &self.audiences,
            _ => &[],
        }
    }
}

fn distinct(records: &[ListingRecord], field: FilterField) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.field(field))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::{ListingCommon, SoftwareListing, StartupListing};
    use proptest::prelude::*;

    fn software(name: &str, category: Option<&str>, price: Option<&str>) -> ListingRecord {
        ListingRecord::Software(SoftwareListing {
            common: ListingCommon {
                name: Some(name.to_string()),
                category: category.map(str::to_string),
                ..Default::default()
            },
            price: price.map(str::to_string),
            ..Default::default()
        })
    }

    fn startup(name: &str, category: Option<&str>, headquarter: Option<&str>) -> ListingRecord {
        ListingRecord::Startup(StartupListing {
            common: ListingCommon {
                name: Some(name.to_string()),
                category: category.map(str::to_string),
                headquarter: headquarter.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn names(records: &[ListingRecord]) -> Vec<&str> {
        records
            .iter()
            .filter_map(|record| record.common().name.as_deref())
            .collect()
    }

    // ==================== FilterField Tests ====================

    #[test]
    fn test_query_key_roundtrip() {
        for field in FilterField::ALL {
            assert_eq!(FilterField::from_query_key(field.query_key()), Some(field));
        }
        assert_eq!(FilterField::from_query_key("category"), None);
    }

    #[test]
    fn test_software_only_fields() {
        assert!(FilterField::Price.applies_to(ListingKind::Software));
        assert!(!FilterField::Price.applies_to(ListingKind::Startup));
        assert!(!FilterField::Email.applies_to(ListingKind::Startup));
        assert!(FilterField::Problem.applies_to(ListingKind::Startup));
    }

    // ==================== FilterCriteria Tests ====================

    #[test]
    fn test_blank_value_clears_criterion() {
        let mut criteria = FilterCriteria::new().with(FilterField::Category, "analytics");
        criteria.set(FilterField::Category, "   ");
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_criteria_from_query_pairs() {
        let criteria = FilterCriteria::from_query_pairs([
            ("type", "software"),
            ("f.category", "Analytics"),
            ("f.price", ""),
            ("email", "x@y.z"),
        ]);
        assert_eq!(criteria.get(FilterField::Category), Some("Analytics"));
        assert_eq!(criteria.get(FilterField::Price), None);
        assert_eq!(criteria.active().count(), 1);
        assert_eq!(
            criteria.to_query_pairs(),
            vec![("f.category", "Analytics".to_string())]
        );
    }

    // ==================== filter Tests ====================

    #[test]
    fn test_category_match_is_case_insensitive() {
        let records = vec![
            software("A", Some("Analytics"), None),
            software("B", Some("CRM"), None),
            software("C", None, None),
        ];
        let criteria = FilterCriteria::new().with(FilterField::Category, "analytics");
        assert_eq!(names(&filter(&records, &criteria)), vec!["A"]);
    }

    #[test]
    fn test_substring_match() {
        let records = vec![software("A", Some("Business Analytics"), None)];
        let criteria = FilterCriteria::new().with(FilterField::Category, "ANALY");
        assert_eq!(filter(&records, &criteria).len(), 1);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let records = vec![
            startup("A", Some("Fintech"), Some("Riyadh")),
            startup("B", Some("Fintech"), Some("Cairo")),
            startup("C", Some("Health"), Some("Riyadh")),
        ];
        let criteria = FilterCriteria::new()
            .with(FilterField::Category, "fintech")
            .with(FilterField::Headquarters, "riyadh");
        assert_eq!(names(&filter(&records, &criteria)), vec!["A"]);
    }

    #[test]
    fn test_missing_field_excludes_record() {
        let records = vec![
            software("A", Some("CRM"), Some("10")),
            startup("B", Some("CRM"), None),
        ];
        let criteria = FilterCriteria::new().with(FilterField::Price, "1");
        assert_eq!(names(&filter(&records, &criteria)), vec!["A"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let records = vec![
            software("Z", Some("CRM"), None),
            software("A", Some("CRM"), None),
            software("M", Some("CRM"), None),
        ];
        let criteria = FilterCriteria::new().with(FilterField::Category, "crm");
        assert_eq!(names(&filter(&records, &criteria)), vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_empty_input() {
        let criteria = FilterCriteria::new().with(FilterField::Category, "crm");
        assert!(filter(&[], &criteria).is_empty());
    }

    // ==================== Facets Tests ====================

    #[test]
    fn test_facets_are_distinct_and_sorted() {
        let records = vec![
            startup("A", Some("Fintech"), Some("Riyadh")),
            startup("B", Some("Edtech"), Some("Riyadh")),
            startup("C", Some("Fintech"), None),
            startup("D", Some("  "), Some("Cairo")),
        ];
        let facets = Facets::from_records(&records);
        assert_eq!(facets.categories, vec!["Edtech", "Fintech"]);
        assert_eq!(facets.headquarters, vec!["Cairo", "Riyadh"]);
        assert!(facets.audiences.is_empty());
        assert!(facets.options(FilterField::Problem).is_empty());
    }

    // ==================== Law Tests ====================

    fn arb_record() -> impl Strategy<Value = ListingRecord> {
        let field = proptest::option::of("[a-cA-C ]{0,4}");
        (any::<bool>(), field.clone(), field.clone(), field).prop_map(
            |(is_software, category, audience, price)| {
                let common = ListingCommon {
                    category,
                    audience,
                    ..Default::default()
                };
                if is_software {
                    ListingRecord::Software(SoftwareListing {
                        common,
                        price,
                        ..Default::default()
                    })
                } else {
                    ListingRecord::Startup(StartupListing {
                        common,
                        ..Default::default()
                    })
                }
            },
        )
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        let value = proptest::option::of("[a-cA-C]{1,2}");
        (value.clone(), value.clone(), value).prop_map(|(category, audience, price)| {
            let mut criteria = FilterCriteria::new();
            for (field, value) in [
                (FilterField::Category, category),
                (FilterField::Audience, audience),
                (FilterField::Price, price),
            ] {
                if let Some(value) = value {
                    criteria.set(field, &value);
                }
            }
            criteria
        })
    }

    proptest! {
        #[test]
        fn prop_empty_criteria_is_identity(records in proptest::collection::vec(arb_record(), 0..12)) {
            prop_assert_eq!(filter(&records, &FilterCriteria::new()), records);
        }

        #[test]
        fn prop_filter_is_idempotent(
            records in proptest::collection::vec(arb_record(), 0..12),
            criteria in arb_criteria(),
        ) {
            let once = filter(&records, &criteria);
            let twice = filter(&once, &criteria);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn prop_output_is_subsequence(
            records in proptest::collection::vec(arb_record(), 0..12),
            criteria in arb_criteria(),
        ) {
            let output = filter(&records, &criteria);
            let mut remaining = records.iter();
            for record in &output {
                prop_assert!(remaining.any(|candidate| candidate == record));
            }
        }
    }
}
