use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::app::calculator::CalculatorForm;
use crate::app::{ViewError, Views};
use crate::config::{FailurePolicy, NavigationConfig};
use crate::mvi::Reducer;
use crate::router::route::Route;
use crate::router::state::{NavIntent, NavReducer, NavState};
use crate::template::supplant;
use crate::view::{HistoryChange, HistoryEntry, ViewController};

const ERROR_VIEW: &str = r#"<section class="error"><h2>Unable to load {{url}}</h2><p>{{message}}</p></section>"#;

/// Result of one navigation event.
#[derive(Debug)]
pub enum NavOutcome {
    /// A handler's view was committed.
    Committed { url: String, history: HistoryChange },
    /// A stored view was put back from history without running a handler.
    Restored { url: String },
    /// The handler finished after a newer navigation began; its view was
    /// dropped.
    Discarded { url: String },
    /// The handler failed; see [`FailurePolicy`] for what the user sees.
    Failed { hash: String, error: ViewError },
}

struct Inner {
    controller: ViewController,
    state: NavState,
    calculator: Option<CalculatorForm>,
}

impl Inner {
    fn apply(&mut self, intent: NavIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = NavReducer::reduce(state, intent);
    }
}

/// Dispatches navigation events to view handlers and commits their views.
///
/// Each navigation takes a new generation number. With
/// `discard_stale` enabled, a handler that completes after a newer
/// navigation or history restore began is dropped instead of overwriting
/// the newer view.
pub struct Navigator {
    views: Views,
    config: NavigationConfig,
    generation: AtomicU64,
    inner: Mutex<Inner>,
}

impl Navigator {
    pub fn new(views: Views, controller: ViewController, config: NavigationConfig) -> Self {
        Self {
            views,
            config,
            generation: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                controller,
                state: NavState::Idle,
                calculator: None,
            }),
        }
    }

    pub fn state(&self) -> NavState {
        self.inner.lock().state.clone()
    }

    /// Initial page load: dispatch whatever hash history starts on.
    pub async fn start(&self) -> NavOutcome {
        let hash = self.inner.lock().controller.current_hash();
        self.navigate(&hash).await
    }

    /// Hash change: resolve `hash`, run its handler and commit the result.
    pub async fn navigate(&self, hash: &str) -> NavOutcome {
        let route = Route::parse(hash);
        let generation = self.next_generation();
        tracing::debug!(hash, route = route.name(), generation, "Dispatching route");
        self.inner.lock().apply(NavIntent::Resolve {
            route: route.clone(),
            generation,
        });

        let result = self.views.render(&route).await;

        let mut inner = self.inner.lock();
        if self.config.discard_stale && self.generation.load(Ordering::SeqCst) != generation {
            let url = match &result {
                Ok(view) => view.url.clone(),
                Err(_) => hash.to_string(),
            };
            tracing::debug!(url = %url, generation, "Dropping stale navigation");
            return NavOutcome::Discarded { url };
        }

        match result {
            Ok(view) => {
                let history =
                    inner
                        .controller
                        .commit_view(&view.url, &view.title, &view.html, view.redirect);
                inner.calculator = view.calculator;
                inner.apply(NavIntent::Commit {
                    url: view.url.clone(),
                });
                tracing::info!(url = %view.url, title = %view.title, ?history, "View committed");
                NavOutcome::Committed {
                    url: view.url,
                    history,
                }
            }
            Err(error) => {
                tracing::warn!(hash, error = %error, "View handler failed");
                if self.config.on_failure == FailurePolicy::RenderError {
                    inner.controller.render_only(&error_view(hash, &error));
                    inner.calculator = None;
                }
                inner.apply(NavIntent::Fail);
                NavOutcome::Failed {
                    hash: hash.to_string(),
                    error,
                }
            }
        }
    }

    /// History traversal landed on `entry`. Stored views come back exactly
    /// as committed; entries without state are dispatched like a hash change.
    pub async fn pop_state(&self, entry: HistoryEntry) -> NavOutcome {
        let Some(state) = entry.state else {
            return self.navigate(&entry.url).await;
        };

        self.next_generation();
        let mut inner = self.inner.lock();
        inner.controller.restore(&state);
        inner.calculator = None;
        inner.apply(NavIntent::Restore {
            url: state.url.clone(),
        });
        tracing::debug!(url = %state.url, "View restored from history");
        NavOutcome::Restored { url: state.url }
    }

    /// Step back in history. `None` at the first entry.
    pub async fn back(&self) -> Option<NavOutcome> {
        let entry = {
            let mut inner = self.inner.lock();
            inner.controller.back()
        }?;
        Some(self.pop_state(entry).await)
    }

    /// Step forward in history. `None` at the last entry.
    pub async fn forward(&self) -> Option<NavOutcome> {
        let entry = {
            let mut inner = self.inner.lock();
            inner.controller.forward()
        }?;
        Some(self.pop_state(entry).await)
    }

    /// Calculator: select a province. False when the calculator is not on
    /// screen or the code is unknown.
    pub fn change_province(&self, code: &str) -> bool {
        let mut inner = self.inner.lock();
        let Inner {
            controller,
            calculator,
            ..
        } = &mut *inner;
        match calculator {
            Some(form) => form.change_province(controller, code),
            None => false,
        }
    }

    /// Calculator: type into the amount field. False when the calculator is
    /// not on screen.
    pub fn change_amount(&self, amount: &str) -> bool {
        let mut inner = self.inner.lock();
        let Inner {
            controller,
            calculator,
            ..
        } = &mut *inner;
        match calculator {
            Some(form) => {
                form.change_amount(controller, amount);
                true
            }
            None => false,
        }
    }

    /// Current value of a form field on screen.
    pub fn field(&self, id: &str) -> Option<String> {
        self.inner.lock().controller.field(id)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn error_view(hash: &str, error: &ViewError) -> String {
    let mut context = Map::new();
    context.insert("url".to_string(), Value::from(hash));
    context.insert("message".to_string(), Value::from(error.to_string()));
    supplant(ERROR_VIEW, &context)
}
