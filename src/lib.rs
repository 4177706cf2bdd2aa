pub mod backend;
pub mod config;
pub mod i18n;
pub mod leads;
pub mod listings;
pub mod navigation;
pub mod pages;
pub mod routes;
pub mod server;
