//! Hash routing, dispatch and the navigation state machine.

mod navigator;
mod route;
mod state;

pub use navigator::{NavOutcome, Navigator};
pub use route::Route;
pub use state::{NavIntent, NavReducer, NavState};
