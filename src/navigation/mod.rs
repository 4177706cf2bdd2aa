//! Navbar behaviour: dropdowns, the mobile drawer and language switching.

mod controller;
mod drawer;
mod submenu;

pub use controller::NavigationController;
pub use drawer::{DrawerClose, MobileDrawer};
pub use submenu::{MenuId, Submenu, SubmenuGroup, SubmenuState, DEFAULT_CLOSE_DELAY};
