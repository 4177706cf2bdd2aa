//! Active locale state for one client session.
//!
//! Exactly one locale is active at a time. `LocaleState` is the single
//! writer; readers hold a `watch::Receiver` and observe every change together
//! with the matching text direction.

use tokio::sync::watch;
use tracing::info;

use crate::i18n::resolver::{resolve_locale, Resolution};
use crate::i18n::{Locale, PreferenceStore, TextDirection};

/// What readers observe: the active locale and its layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSnapshot {
    pub locale: Locale,
    pub direction: TextDirection,
}

impl LocaleSnapshot {
    fn of(locale: Locale) -> Self {
        Self {
            locale,
            direction: locale.direction(),
        }
    }
}

/// Single-writer, many-reader locale state.
pub struct LocaleState<P: PreferenceStore> {
    sender: watch::Sender<LocaleSnapshot>,
    store: P,
}

impl<P: PreferenceStore> LocaleState<P> {
    /// Resolve the starting locale from the URL, the persisted preference in
    /// `store` and the browser default. Nothing is persisted here.
    pub fn init(requested_path: &str, store: P, browser_default: Option<Locale>) -> (Self, Resolution) {
        let persisted = store.load();
        let resolution = resolve_locale(
            requested_path,
            persisted.as_deref(),
            browser_default.map(|locale| locale.code()),
        );
        let (sender, _) = watch::channel(LocaleSnapshot::of(resolution.locale));

        (Self { sender, store }, resolution)
    }

    pub fn current(&self) -> Locale {
        self.sender.borrow().locale
    }

    pub fn direction(&self) -> TextDirection {
        self.sender.borrow().direction
    }

    pub fn snapshot(&self) -> LocaleSnapshot {
        *self.sender.borrow()
    }

    /// Subscribe to locale changes.
    pub fn subscribe(&self) -> watch::Receiver<LocaleSnapshot> {
        self.sender.subscribe()
    }

    /// Make `locale` active: update direction, persist the choice and notify
    /// every subscriber.
    pub fn set(&mut self, locale: Locale) {
        let previous = self.sender.send_replace(LocaleSnapshot::of(locale));
        self.store.store(locale.code());
        if previous.locale != locale {
            info!(
                "Locale changed from {} to {} ({})",
                previous.locale,
                locale,
                locale.direction().as_str()
            );
        }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn into_store(self) -> P {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MemoryPreferenceStore;

    // ==================== init Tests ====================

    #[test]
    fn test_init_from_url() {
        let (state, resolution) =
            LocaleState::init("/ar/home", MemoryPreferenceStore::new(), None);
        assert_eq!(state.current(), Locale::ARABIC);
        assert_eq!(state.direction(), TextDirection::Rtl);
        assert_eq!(resolution.canonical_path, "/ar/home");
    }

    #[test]
    fn test_init_reads_store_without_writing() {
        let (state, resolution) = LocaleState::init(
            "/pricing",
            MemoryPreferenceStore::with_value("ar"),
            Some(Locale::ENGLISH),
        );
        assert_eq!(state.current(), Locale::ARABIC);
        assert_eq!(resolution.canonical_path, "/ar/pricing");
        assert_eq!(state.store().writes(), 0);
    }

    #[test]
    fn test_init_uses_browser_default() {
        let (state, _) =
            LocaleState::init("/pricing", MemoryPreferenceStore::new(), Some(Locale::ARABIC));
        assert_eq!(state.current(), Locale::ARABIC);
    }

    // ==================== set Tests ====================

    #[test]
    fn test_set_updates_direction_and_persists() {
        let (mut state, _) = LocaleState::init("/en/vendor", MemoryPreferenceStore::new(), None);
        assert_eq!(state.direction(), TextDirection::Ltr);

        state.set(Locale::ARABIC);

        assert_eq!(state.current(), Locale::ARABIC);
        assert_eq!(state.direction(), TextDirection::Rtl);
        assert_eq!(state.store().load().as_deref(), Some("ar"));
        assert_eq!(state.store().writes(), 1);
    }

    #[test]
    fn test_set_broadcasts_to_subscribers() {
        let (mut state, _) = LocaleState::init("/en/home", MemoryPreferenceStore::new(), None);
        let mut first = state.subscribe();
        let second = state.subscribe();

        state.set(Locale::ARABIC);

        assert!(first.has_changed().unwrap());
        let seen = *first.borrow_and_update();
        assert_eq!(seen.locale, Locale::ARABIC);
        assert_eq!(seen.direction, TextDirection::Rtl);
        assert_eq!(second.borrow().locale, Locale::ARABIC);
    }

    #[test]
    fn test_set_back_to_english_is_ltr() {
        let (mut state, _) = LocaleState::init("/ar/home", MemoryPreferenceStore::new(), None);
        state.set(Locale::ENGLISH);
        assert_eq!(
            state.snapshot(),
            LocaleSnapshot {
                locale: Locale::ENGLISH,
                direction: TextDirection::Ltr
            }
        );
    }
}
