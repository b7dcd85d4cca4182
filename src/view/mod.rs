//! Document and session history capabilities, and the controller that keeps
//! them consistent.

mod controller;
mod history;
mod surface;

pub use controller::{HistoryChange, ViewController};
pub use history::{HistoryEntry, MemoryHistory, NavigationHistory, NavigationState};
pub use surface::{MemoryDocument, ViewSurface};
