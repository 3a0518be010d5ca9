//! Terminal UI for Revolve - platter, track list, status bar
//!
//! All physics and audio synchronization are delegated to the motion and
//! audio crates; this crate only renders state and reports hit geometry.

mod app;
mod theme;
pub mod widgets;

pub use app::{App, AppState, DragState};
pub use theme::{Theme, PHOSPHOR, SLATE};
pub use widgets::{LibraryState, LibraryWidget, PlatterGeometry, PlatterWidget, StatusBarWidget};
