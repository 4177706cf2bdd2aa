use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::info;

use crate::i18n::{Locale, LocaleSnapshot, LocaleState, PreferenceStore, TextDirection};
use crate::navigation::{DrawerClose, MenuId, MobileDrawer, SubmenuGroup};
use crate::routes::with_locale;

/// Owns the navbar state for one visitor and is the only writer of the
/// active locale.
pub struct NavigationController<P: PreferenceStore> {
    locale: LocaleState<P>,
    current_path: String,
    submenus: SubmenuGroup,
    drawer: MobileDrawer,
}

impl<P: PreferenceStore> NavigationController<P> {
    /// Start a session at `requested_path`. The current path is the resolved
    /// canonical path, which carries a language segment.
    pub fn init(
        requested_path: &str,
        store: P,
        browser_default: Option<Locale>,
        close_delay: Duration,
    ) -> Self {
        let (locale, resolution) = LocaleState::init(requested_path, store, browser_default);
        Self {
            locale,
            current_path: resolution.canonical_path,
            submenus: SubmenuGroup::new(close_delay),
            drawer: MobileDrawer::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale.current()
    }

    pub fn direction(&self) -> TextDirection {
        self.locale.direction()
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn subscribe(&self) -> watch::Receiver<LocaleSnapshot> {
        self.locale.subscribe()
    }

    pub fn submenus(&self) -> &SubmenuGroup {
        &self.submenus
    }

    pub fn drawer(&self) -> &MobileDrawer {
        &self.drawer
    }

    pub fn store(&self) -> &P {
        self.locale.store()
    }

    pub fn into_store(self) -> P {
        self.locale.into_store()
    }

    /// Switch to `target`, rewrite the language segment of the current path
    /// and navigate there. Returns the new path.
    pub fn change_language(&mut self, target: Locale) -> String {
        let path = with_locale(&self.current_path, target);
        self.locale.set(target);
        info!("Language switch {} -> {}", self.current_path, path);
        self.navigate(&path);
        path
    }

    /// Move to `path`. Open menus and the drawer close on every navigation.
    pub fn navigate(&mut self, path: &str) {
        self.current_path = path.to_string();
        self.submenus.close_all();
        self.drawer.close(DrawerClose::RouteChange);
    }

    pub fn toggle_submenu(&mut self, id: MenuId) {
        self.submenus.toggle(id);
    }

    pub fn pointer_enter(&mut self, id: MenuId) {
        self.submenus.pointer_enter(id);
    }

    pub fn pointer_leave(&mut self, id: MenuId, now: Instant) {
        self.submenus.pointer_leave(id, now);
    }

    /// Fire due auto-closes.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.submenus.tick(now)
    }

    pub fn toggle_mobile_drawer(&mut self) {
        self.drawer.toggle();
    }

    pub fn close_mobile_drawer(&mut self) {
        self.drawer.close(DrawerClose::Explicit);
    }

    pub fn outside_tap(&mut self) {
        self.drawer.close(DrawerClose::OutsideTap);
    }

    /// Drop every pending close and release the scroll lock.
    pub fn teardown(&mut self) {
        self.submenus.close_all();
        self.drawer.close(DrawerClose::RouteChange);
    }
}
