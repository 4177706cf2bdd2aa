use tracing::debug;

/// Why the drawer closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerClose {
    Explicit,
    OutsideTap,
    RouteChange,
}

/// Mobile navigation drawer.
///
/// Background scroll is locked exactly while the drawer is open.
#[derive(Debug, Clone, Default)]
pub struct MobileDrawer {
    open: bool,
    scroll_locked: bool,
}

impl MobileDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close(DrawerClose::Explicit);
        } else {
            self.open();
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.scroll_locked = true;
    }

    pub fn close(&mut self, reason: DrawerClose) {
        if self.open {
            debug!("Mobile drawer closed ({:?})", reason);
        }
        self.open = false;
        self.scroll_locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_locks_scroll() {
        let mut drawer = MobileDrawer::new();
        drawer.toggle();
        assert!(drawer.is_open());
        assert!(drawer.is_scroll_locked());
    }

    #[test]
    fn test_every_close_path_unlocks_scroll() {
        for reason in [
            DrawerClose::Explicit,
            DrawerClose::OutsideTap,
            DrawerClose::RouteChange,
        ] {
            let mut drawer = MobileDrawer::new();
            drawer.open();
            drawer.close(reason);
            assert!(!drawer.is_open(), "{:?}", reason);
            assert!(!drawer.is_scroll_locked(), "{:?}", reason);
        }
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut drawer = MobileDrawer::new();
        drawer.toggle();
        drawer.toggle();
        assert!(!drawer.is_open());
        assert!(!drawer.is_scroll_locked());
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut drawer = MobileDrawer::new();
        drawer.close(DrawerClose::OutsideTap);
        assert!(!drawer.is_open());
        assert!(!drawer.is_scroll_locked());
    }
}
