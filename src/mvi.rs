//! Reducer plumbing for the navigation state machine.
//!
//! Navigation events (hash changes, history restores, handler results) are
//! folded into the dispatcher's state one at a time:
//!
//! ```text
//! NavIntent ──→ NavReducer::reduce ──→ NavState
//! ```

/// Snapshot of where the dispatcher is. `Default` is the state before the
/// first view is rendered.
pub trait State: Clone + PartialEq + Default + Send + 'static {}

/// One navigation event, already resolved to the route or url it concerns.
pub trait Intent: Send + 'static {}

/// Folds an event into the current state. No I/O and no history access:
/// rendering and committing happen in the navigator around the call.
pub trait Reducer {
    type State: State;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
