//! TUI widgets for the tunnel selector.
//!
//! # Widgets
//!
//! - `CatalogList`: Table displaying the session catalog
//! - `StatusBar`: Bottom bar with key hints and transient messages

mod catalog_list;
mod status_bar;

pub use catalog_list::CatalogList;
pub use status_bar::StatusBar;
