//! Internationalization (i18n) module for the bilingual site.
//!
//! All language-related logic lives here: which locales exist, how the
//! active one is chosen, where the choice is persisted and how keys are
//! translated.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported locales and their direction
//! - `locale`: Validated `Locale` handle and URL segment parsing
//! - `catalog`: Nested translation tables with fallback and interpolation
//! - `resolver`: Locale resolution from URL, persisted preference and browser
//! - `preference`: Persisted locale key (memory and cookie stores)
//! - `state`: Single-writer active locale with change subscriptions
//! - `validator`: Catalog completeness validation
//! - `metrics`: Translation lookup counters
//!
//! # Example
//!
//! ```rust,ignore
//! use stellarsep_site::i18n::{translate, Locale};
//!
//! let arabic = Locale::from_code("ar")?;
//! assert!(arabic.is_rtl());
//! let label = translate(arabic, "nav.home", &[]);
//! ```

pub mod catalog;
mod locale;
mod metrics;
mod preference;
mod registry;
pub mod resolver;
mod state;
mod validator;

pub use catalog::{translate, Catalog, Translator};
pub use locale::{is_language_segment, Locale};
pub use metrics::{LookupMetrics, MetricsReport};
pub use preference::{cookie_value, CookiePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use registry::{LocaleConfig, LocaleRegistry, TextDirection};
pub use resolver::{locale_from_accept_language, resolve_locale, Resolution};
pub use state::{LocaleSnapshot, LocaleState};
pub use validator::{CatalogValidator, ValidationReport};
