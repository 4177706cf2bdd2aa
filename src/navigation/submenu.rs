//! Dropdown state machine with a delayed auto-close.
//!
//! Time is passed in by the caller, so the close delay can be driven in tests
//! without a real clock.

use std::time::{Duration, Instant};

/// Default delay between pointer-leave and closing.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmenuState {
    Closed,
    Open,
    /// Open, with a pending close at `deadline`.
    Closing { deadline: Instant },
}

#[derive(Debug, Clone)]
pub struct Submenu {
    state: SubmenuState,
    delay: Duration,
}

impl Submenu {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: SubmenuState::Closed,
            delay,
        }
    }

    pub fn state(&self) -> SubmenuState {
        self.state
    }

    /// Open or closing; the menu is visible either way.
    pub fn is_expanded(&self) -> bool {
        !matches!(self.state, SubmenuState::Closed)
    }

    pub fn has_pending_close(&self) -> bool {
        matches!(self.state, SubmenuState::Closing { .. })
    }

    pub fn open(&mut self) {
        self.state = SubmenuState::Open;
    }

    /// Close immediately, dropping any pending close.
    pub fn close(&mut self) {
        self.state = SubmenuState::Closed;
    }

    /// Explicit toggle: an expanded menu closes, a closed one opens.
    pub fn toggle(&mut self) {
        if self.is_expanded() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Pointer entered the menu: open it, cancelling a pending close.
    pub fn pointer_enter(&mut self) {
        self.open();
    }

    /// Pointer left the menu: arm the delayed close.
    pub fn pointer_leave(&mut self, now: Instant) {
        if self.state == SubmenuState::Open {
            self.state = SubmenuState::Closing {
                deadline: now + self.delay,
            };
        }
    }

    /// Advance to `now`. Returns `true` if the pending close fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            SubmenuState::Closing { deadline } if now >= deadline => {
                self.state = SubmenuState::Closed;
                true
            }
            _ => false,
        }
    }
}

impl Default for Submenu {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_DELAY)
    }
}

/// Top-level dropdowns in the navbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuId {
    Services,
    Language,
}

impl MenuId {
    pub const ALL: [MenuId; 2] = [MenuId::Services, MenuId::Language];
}

/// The navbar's dropdowns. At most one is expanded at a time.
#[derive(Debug, Clone)]
pub struct SubmenuGroup {
    menus: Vec<(MenuId, Submenu)>,
}

impl SubmenuGroup {
    pub fn new(delay: Duration) -> Self {
        Self {
            menus: MenuId::ALL
                .into_iter()
                .map(|id| (id, Submenu::new(delay)))
                .collect(),
        }
    }

    pub fn get(&self, id: MenuId) -> Option<&Submenu> {
        self.menus
            .iter()
            .find(|(menu, _)| *menu == id)
            .map(|(_, submenu)| submenu)
    }

    /// The expanded menu, if any.
    pub fn expanded(&self) -> Option<MenuId> {
        self.menus
            .iter()
            .find(|(_, submenu)| submenu.is_expanded())
            .map(|(id, _)| *id)
    }

    pub fn toggle(&mut self, id: MenuId) {
        self.close_others(id);
        if let Some(submenu) = self.get_mut(id) {
            submenu.toggle();
        }
    }

    pub fn pointer_enter(&mut self, id: MenuId) {
        self.close_others(id);
        if let Some(submenu) = self.get_mut(id) {
            submenu.pointer_enter();
        }
    }

    pub fn pointer_leave(&mut self, id: MenuId, now: Instant) {
        if let Some(submenu) = self.get_mut(id) {
            submenu.pointer_leave(now);
        }
    }

    /// Fire every pending close that is due. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.menus
            .iter_mut()
            .filter_map(|(_, submenu)| submenu.tick(now).then_some(()))
            .count()
    }

    /// Close everything and drop pending closes.
    pub fn close_all(&mut self) {
        for (_, submenu) in &mut self.menus {
            submenu.close();
        }
    }

    pub fn has_pending_close(&self) -> bool {
        self.menus.iter().any(|(_, submenu)| submenu.has_pending_close())
    }

    fn get_mut(&mut self, id: MenuId) -> Option<&mut Submenu> {
        self.menus
            .iter_mut()
            .find(|(menu, _)| *menu == id)
            .map(|(_, submenu)| submenu)
    }

    fn close_others(&mut self, id: MenuId) {
        for (menu, submenu) in &mut self.menus {
            if *menu != id {
                submenu.close();
            }
        }
    }
}

impl Default for SubmenuGroup {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_DELAY)
    }
}
