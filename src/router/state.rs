use crate::mvi::{Intent, Reducer, State};
use crate::router::route::Route;

/// Where the dispatcher is between navigation events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NavState {
    /// Nothing rendered yet.
    #[default]
    Idle,
    /// A handler is running for `route`.
    Resolving {
        route: Route,
        generation: u64,
        /// Url on screen when resolution began.
        previous: Option<String>,
    },
    Rendered { url: String },
}

impl State for NavState {}

impl NavState {
    /// Url of the view currently on screen.
    pub fn displayed_url(&self) -> Option<&str> {
        match self {
            NavState::Idle => None,
            NavState::Resolving { previous, .. } => previous.as_deref(),
            NavState::Rendered { url } => Some(url),
        }
    }
}

#[derive(Debug, Clone)]
pub enum NavIntent {
    /// Hash change or initial load started a handler.
    Resolve { route: Route, generation: u64 },
    /// A handler's view was committed.
    Commit { url: String },
    /// A stored view was put back from history.
    Restore { url: String },
    /// The handler failed; the previous view stays.
    Fail,
}

impl Intent for NavIntent {}

pub struct NavReducer;

impl Reducer for NavReducer {
    type State = NavState;
    type Intent = NavIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            NavIntent::Resolve { route, generation } => NavState::Resolving {
                previous: state.displayed_url().map(str::to_string),
                route,
                generation,
            },
            NavIntent::Commit { url } | NavIntent::Restore { url } => NavState::Rendered { url },
            NavIntent::Fail => match state {
                NavState::Resolving {
                    previous: Some(url),
                    ..
                } => NavState::Rendered { url },
                NavState::Resolving { previous: None, .. } => NavState::Idle,
                other => other,
            },
        }
    }
}
