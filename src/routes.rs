//! Localized route table.
//!
//! Every page lives under `/{lang}/{suffix}`. `/` and paths that cannot be
//! matched redirect to the English home page; a known suffix without any
//! language segment is handed back so the caller can resolve a locale for it.

use std::sync::OnceLock;

use axum::extract::Query;
use axum::http::Uri;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::i18n::resolver::split_query;
use crate::i18n::{is_language_segment, Locale};
use crate::listings::{FilterCriteria, ListingKind};

/// Pages the site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Services,
    Software,
    Login,
    AboutUs,
    ContactUs,
    Pricing,
    Newsletter,
    Startup,
    Investor,
    Vendor,
    Buyer,
    Browse,
}

impl Page {
    pub const ALL: [Page; 13] = [
        Page::Home,
        Page::Services,
        Page::Software,
        Page::Login,
        Page::AboutUs,
        Page::ContactUs,
        Page::Pricing,
        Page::Newsletter,
        Page::Startup,
        Page::Investor,
        Page::Vendor,
        Page::Buyer,
        Page::Browse,
    ];

    /// Path segment after the language.
    pub fn suffix(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Services => "services",
            Page::Software => "software",
            Page::Login => "login",
            Page::AboutUs => "about-us",
            Page::ContactUs => "contact-us",
            Page::Pricing => "pricing",
            Page::Newsletter => "newsletter",
            Page::Startup => "startup",
            Page::Investor => "investor",
            Page::Vendor => "vendor",
            Page::Buyer => "buyer",
            Page::Browse => "browse",
        }
    }

    /// Localized path of the page, e.g. `/ar/vendor`.
    pub fn path(&self, locale: Locale) -> String {
        format!("/{}/{}", locale.code(), self.suffix())
    }

    /// Translation key prefix of the page's own strings, for pages that
    /// have a title and description.
    pub fn content_key(&self) -> Option<&'static str> {
        match self {
            Page::Home | Page::Browse => None,
            Page::Services => Some("pages.services"),
            Page::Software => Some("pages.software"),
            Page::Login => Some("pages.login"),
            Page::AboutUs => Some("pages.aboutUs"),
            Page::ContactUs => Some("pages.contactUs"),
            Page::Pricing => Some("pages.pricing"),
            Page::Newsletter => Some("pages.newsletter"),
            Page::Startup => Some("pages.startup"),
            Page::Investor => Some("pages.investor"),
            Page::Vendor => Some("pages.vendor"),
            Page::Buyer => Some("pages.buyer"),
        }
    }
}

/// One `/{lang}/{suffix}` pattern and the page it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub suffix: &'static str,
    pub page: Page,
}

/// Read-only inputs the browse page takes from its query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    pub kind: ListingKind,
    pub email: Option<String>,
    pub search: Option<String>,
    pub criteria: FilterCriteria,
}

impl BrowseQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            kind: ListingKind::from_query(query_value(pairs, "type")),
            email: non_blank(query_value(pairs, "email")),
            search: non_blank(query_value(pairs, "search")),
            criteria: FilterCriteria::from_query_pairs(
                pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ),
        }
    }

    /// Query string for this browse view (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![("type", self.kind.as_str().to_string())];
        if let Some(email) = &self.email {
            pairs.push(("email", email.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs.extend(self.criteria.to_query_pairs());
        encode_query(&pairs)
    }
}

/// Page-specific parameters taken from the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageParams {
    None,
    Services { service: Option<String> },
    Browse(BrowseQuery),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub locale: Locale,
    pub page: Page,
    pub params: PageParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Render(RouteMatch),
    Redirect(String),
    /// A known page requested without a language segment; the caller picks
    /// the locale and redirects.
    NeedsLocale,
}

pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// The site's routes.
    pub fn standard() -> &'static RouteTable {
        static TABLE: OnceLock<RouteTable> = OnceLock::new();
        TABLE.get_or_init(|| RouteTable {
            routes: Page::ALL
                .into_iter()
                .map(|page| Route {
                    suffix: page.suffix(),
                    page,
                })
                .collect(),
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Page registered for `suffix`.
    pub fn page_for(&self, suffix: &str) -> Option<Page> {
        self.routes
            .iter()
            .find(|route| route.suffix == suffix)
            .map(|route| route.page)
    }

    /// Match a request path (with optional query) against the table.
    pub fn resolve(&self, path_and_query: &str) -> RouteOutcome {
        let (path, query) = split_query(path_and_query);
        let trimmed = path.trim_matches('/');
        let home = || RouteOutcome::Redirect(Page::Home.path(Locale::canonical()));

        if trimmed.is_empty() {
            return home();
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        let first = segments[0];

        if !is_language_segment(first) {
            return match segments.as_slice() {
                [suffix] if self.page_for(suffix).is_some() => RouteOutcome::NeedsLocale,
                _ => home(),
            };
        }

        let Some(locale) = Locale::from_segment(first) else {
            return home();
        };

        match segments.as_slice() {
            [_] => RouteOutcome::Redirect(Page::Home.path(locale)),
            [_, suffix] => match self.page_for(suffix) {
                Some(page) => {
                    let pairs = parse_query(query.unwrap_or_default());
                    RouteOutcome::Render(RouteMatch {
                        locale,
                        page,
                        params: page_params(page, &pairs),
                    })
                }
                None => home(),
            },
            _ => home(),
        }
    }
}

fn page_params(page: Page, pairs: &[(String, String)]) -> PageParams {
    match page {
        Page::Services => PageParams::Services {
            service: non_blank(query_value(pairs, "service")),
        },
        Page::Browse => PageParams::Browse(BrowseQuery::from_pairs(pairs)),
        _ => PageParams::None,
    }
}

/// Swap the language segment of `path_and_query` for `locale`, keeping the
/// page and the query string. Paths without a language segment get one
/// prepended.
pub fn with_locale(path_and_query: &str, locale: Locale) -> String {
    let (path, query) = split_query(path_and_query);
    let trimmed = path.trim_start_matches('/');
    let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));

    let remainder = if is_language_segment(first) { rest } else { trimmed };
    let remainder = remainder.trim_end_matches('/');
    let remainder = if remainder.is_empty() {
        Page::Home.suffix()
    } else {
        remainder
    };

    match query {
        Some(query) => format!("/{}/{}?{}", locale.code(), remainder, query),
        None => format!("/{}/{}", locale.code(), remainder),
    }
}

/// Decode an `application/x-www-form-urlencoded` string into pairs, the
/// same way axum's `Query` extractor does. Unparseable input yields no pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    if query.is_empty() {
        return Vec::new();
    }
    let Ok(uri) = format!("/?{}", query).parse::<Uri>() else {
        return Vec::new();
    };
    Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default()
}

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

pub fn encode_query<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                encode_component(k.as_ref()),
                encode_component(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// First value for `key`.
pub fn query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
