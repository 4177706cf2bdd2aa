use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::listings::FilterField;

/// Which collection a listing comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    #[default]
    Software,
    Startup,
}

impl ListingKind {
    pub const ALL: [ListingKind; 2] = [ListingKind::Software, ListingKind::Startup];

    /// Value used in the `type` query parameter and lead payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Software => "software",
            ListingKind::Startup => "startup",
        }
    }

    /// Collection path on the record store.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ListingKind::Software => "/software",
            ListingKind::Startup => "/startups",
        }
    }

    /// Parse a `type` query value; absent or unknown values mean software.
    pub fn from_query(value: Option<&str>) -> Self {
        Self::parse(value.unwrap_or_default()).unwrap_or_default()
    }

    /// Strict parse of `software` / `startup`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "software" => Some(ListingKind::Software),
            "startup" => Some(ListingKind::Startup),
            _ => None,
        }
    }
}

/// Fields every listing carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCommon {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub headquarter: Option<String>,
    /// Alternate spelling some stores use. `headquarter` wins when both are set.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing)]
    pub headquarters: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audience: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value_proposition: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub problem: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub solution: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub logo: Option<String>,
}

impl ListingCommon {
    pub fn headquarters(&self) -> Option<&str> {
        self.headquarter
            .as_deref()
            .or(self.headquarters.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareListing {
    #[serde(flatten)]
    pub common: ListingCommon,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub main_features: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupListing {
    #[serde(flatten)]
    pub common: ListingCommon,
    #[serde(default, deserialize_with = "lenient_string")]
    pub founder_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub min_investment: Option<String>,
}

/// A software product or a startup.
///
/// The variant is fixed by the collection the record was loaded from, never
/// by probing which fields happen to be present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingRecord {
    Software(SoftwareListing),
    Startup(StartupListing),
}

impl ListingRecord {
    /// Decode one record of the `kind` collection.
    pub fn from_value(kind: ListingKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ListingKind::Software => ListingRecord::Software(serde_json::from_value(value)?),
            ListingKind::Startup => ListingRecord::Startup(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> ListingKind {
        match self {
            ListingRecord::Software(_) => ListingKind::Software,
            ListingRecord::Startup(_) => ListingKind::Startup,
        }
    }

    pub fn common(&self) -> &ListingCommon {
        match self {
            ListingRecord::Software(software) => &software.common,
            ListingRecord::Startup(startup) => &startup.common,
        }
    }

    /// Value of the field a filter criterion targets.
    ///
    /// `Email` and `Price` only exist on software records; on a startup they
    /// are always `None`.
    pub fn field(&self, field: FilterField) -> Option<&str> {
        let common = self.common();
        match field {
            FilterField::Category => common.category.as_deref(),
            FilterField::Headquarters => common.headquarters(),
            FilterField::Audience => common.audience.as_deref(),
            FilterField::ValueProposition => common.value_proposition.as_deref(),
            FilterField::Problem => common.problem.as_deref(),
            FilterField::Solution => common.solution.as_deref(),
            FilterField::Context => common.context.as_deref(),
            FilterField::Email => match self {
                ListingRecord::Software(software) => software.email.as_deref(),
                ListingRecord::Startup(_) => None,
            },
            FilterField::Price => match self {
                ListingRecord::Software(software) => software.price.as_deref(),
                ListingRecord::Startup(_) => None,
            },
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Accept strings, numbers and booleans as text; anything else is absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

/// Numbers, or strings holding a number. Anything else is absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// A list of scalars, or a single scalar standing for a one-item list.
fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(scalar_text).collect()),
        Some(Value::Null) | None => None,
        Some(other) => scalar_text(other)
            .filter(|text| !text.trim().is_empty())
            .map(|text| vec![text]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== ListingKind Tests ====================

    #[test]
    fn test_kind_from_query_defaults_to_software() {
        assert_eq!(ListingKind::from_query(None), ListingKind::Software);
        assert_eq!(ListingKind::from_query(Some("")), ListingKind::Software);
        assert_eq!(ListingKind::from_query(Some("robots")), ListingKind::Software);
        assert_eq!(ListingKind::from_query(Some("startup")), ListingKind::Startup);
    }

    #[test]
    fn test_kind_endpoints() {
        assert_eq!(ListingKind::Software.endpoint(), "/software");
        assert_eq!(ListingKind::Startup.endpoint(), "/startups");
    }

    // ==================== Decoding Tests ====================

    #[test]
    fn test_decode_software() {
        let value = json!({
            "id": 7,
            "name": "Insight",
            "category": "Analytics",
            "headquarter": "Riyadh",
            "email": "sales@insight.example",
            "valueProposition": "Dashboards in minutes",
            "mainFeatures": ["Reports", "Alerts"],
            "rating": 4.5,
            "price": 49
        });

        let record = ListingRecord::from_value(ListingKind::Software, value).unwrap();
        assert_eq!(record.kind(), ListingKind::Software);
        assert_eq!(record.common().id.as_deref(), Some("7"));
        assert_eq!(record.field(FilterField::Headquarters), Some("Riyadh"));
        assert_eq!(record.field(FilterField::Price), Some("49"));
        match record {
            ListingRecord::Software(software) => {
                assert_eq!(software.rating, Some(4.5));
                assert_eq!(software.main_features.unwrap().len(), 2);
            }
            ListingRecord::Startup(_) => panic!("expected software"),
        }
    }

    #[test]
    fn test_decode_startup() {
        let value = json!({
            "id": "s1",
            "name": "Falak",
            "founderName": "Lina",
            "stage": "Seed",
            "minInvestment": "50,000 USD",
            "email": "ignored@falak.example"
        });

        let record = ListingRecord::from_value(ListingKind::Startup, value).unwrap();
        assert_eq!(record.kind(), ListingKind::Startup);
        assert_eq!(record.field(FilterField::Email), None);
        assert_eq!(record.field(FilterField::Price), None);
        match record {
            ListingRecord::Startup(startup) => {
                assert_eq!(startup.founder_name.as_deref(), Some("Lina"));
                assert_eq!(startup.min_investment.as_deref(), Some("50,000 USD"));
            }
            ListingRecord::Software(_) => panic!("expected startup"),
        }
    }

    #[test]
    fn test_decode_missing_fields_are_none() {
        let record = ListingRecord::from_value(ListingKind::Software, json!({})).unwrap();
        for field in FilterField::ALL {
            assert_eq!(record.field(field), None);
        }
    }

    #[test]
    fn test_decode_null_and_nested_values_are_none() {
        let record = ListingRecord::from_value(
            ListingKind::Software,
            json!({"category": null, "audience": {"nested": true}, "mainFeatures": null}),
        )
        .unwrap();
        assert_eq!(record.field(FilterField::Category), None);
        assert_eq!(record.field(FilterField::Audience), None);
    }

    #[test]
    fn test_headquarters_alias() {
        let record =
            ListingRecord::from_value(ListingKind::Startup, json!({"headquarters": "Cairo"}))
                .unwrap();
        assert_eq!(record.field(FilterField::Headquarters), Some("Cairo"));
    }

    #[test]
    fn test_both_headquarters_spellings_decode() {
        let record = ListingRecord::from_value(
            ListingKind::Software,
            json!({"headquarter": "Riyadh", "headquarters": "Jeddah"}),
        )
        .unwrap();
        assert_eq!(record.field(FilterField::Headquarters), Some("Riyadh"));
    }

    #[test]
    fn test_display_fields_with_unexpected_types() {
        let decode = |value| match ListingRecord::from_value(ListingKind::Software, value).unwrap() {
            ListingRecord::Software(software) => software,
            ListingRecord::Startup(_) => panic!("expected software"),
        };

        assert_eq!(decode(json!({"rating": "4.5"})).rating, Some(4.5));
        assert_eq!(decode(json!({"rating": "great"})).rating, None);
        assert_eq!(decode(json!({"rating": [5]})).rating, None);
        assert_eq!(
            decode(json!({"mainFeatures": "Reports"})).main_features,
            Some(vec!["Reports".to_string()])
        );
        assert_eq!(
            decode(json!({"mainFeatures": ["Reports", 2, {"x": 1}]})).main_features,
            Some(vec!["Reports".to_string(), "2".to_string()])
        );
        assert_eq!(decode(json!({"mainFeatures": {"a": 1}})).main_features, None);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(ListingRecord::from_value(ListingKind::Software, json!("text")).is_err());
    }

    #[test]
    fn test_serialize_carries_discriminant() {
        let record = ListingRecord::Startup(StartupListing::default());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "startup");
    }
}
