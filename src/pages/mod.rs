//! Server-rendered HTML pages, built from askama templates.

mod browse;
mod home;
mod info;
mod layout;

pub use browse::render_browse;
pub use home::{render_home, HomeView};
pub use info::render_info;
pub use layout::{language_link, render_document};
