//! Persisted locale preference.
//!
//! A single key holds the visitor's last explicitly chosen locale. It is read
//! when a session starts and written only on an explicit language change.

/// Storage for the persisted locale key.
pub trait PreferenceStore {
    /// The stored locale code, if any. The value is not validated here.
    fn load(&self) -> Option<String>;

    /// Persist `code` as the preferred locale.
    fn store(&mut self, code: &str);
}

/// In-process store, used by tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    value: Option<String>,
    writes: usize,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(code: &str) -> Self {
        Self {
            value: Some(code.to_string()),
            writes: 0,
        }
    }

    /// Number of `store` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<String> {
        self.value.clone()
    }

    fn store(&mut self, code: &str) {
        self.value = Some(code.to_string());
        self.writes += 1;
    }
}

/// Cookie-backed store for one HTTP exchange.
///
/// Reads the preference from the request's `Cookie` header and, after a
/// `store`, yields the `Set-Cookie` value to attach to the response.
#[derive(Debug, Clone)]
pub struct CookiePreferenceStore {
    name: String,
    current: Option<String>,
    pending: Option<String>,
}

/// One year, in seconds.
const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

impl CookiePreferenceStore {
    /// Build the store from the raw `Cookie` header of a request.
    pub fn from_header(name: &str, cookie_header: Option<&str>) -> Self {
        let current = cookie_header.and_then(|header| cookie_value(header, name));
        Self {
            name: name.to_string(),
            current,
            pending: None,
        }
    }

    /// `Set-Cookie` header value for a pending write, if any.
    pub fn set_cookie_header(&self) -> Option<String> {
        self.pending.as_ref().map(|code| {
            format!(
                "{}={}; Path=/; Max-Age={}; SameSite=Lax",
                self.name, code, COOKIE_MAX_AGE
            )
        })
    }
}

impl PreferenceStore for CookiePreferenceStore {
    fn load(&self) -> Option<String> {
        self.pending.clone().or_else(|| self.current.clone())
    }

    fn store(&mut self, code: &str) {
        self.pending = Some(code.to_string());
    }
}

/// Extract the value of cookie `name` from a `Cookie` header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key.trim() == name {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
