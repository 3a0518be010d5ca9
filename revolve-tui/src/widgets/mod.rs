//! UI widgets for Revolve

mod library;
mod platter;
mod status_bar;

pub use library::{LibraryState, LibraryWidget};
pub use platter::{PlatterGeometry, PlatterWidget};
pub use status_bar::StatusBarWidget;
