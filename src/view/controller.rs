use crate::view::history::{HistoryEntry, NavigationHistory, NavigationState};
use crate::view::surface::ViewSurface;

/// What `commit_view` did to session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryChange {
    /// Target url was already active.
    Unchanged,
    Pushed,
    Replaced,
}

/// Commits views to the surface and keeps session history in step with
/// what is displayed.
pub struct ViewController {
    surface: Box<dyn ViewSurface>,
    history: Box<dyn NavigationHistory>,
}

impl ViewController {
    pub fn new(surface: Box<dyn ViewSurface>, history: Box<dyn NavigationHistory>) -> Self {
        Self { surface, history }
    }

    /// Display `html` under `title` and record it at `url`.
    ///
    /// Title and markup are always replaced. History only changes when `url`
    /// differs from the active hash: redirects replace the active entry,
    /// anything else pushes a new one.
    pub fn commit_view(
        &mut self,
        url: &str,
        title: &str,
        html: &str,
        is_redirect: bool,
    ) -> HistoryChange {
        self.surface.set_title(title);
        self.surface.render(html);

        if self.history.current_hash() == url {
            return HistoryChange::Unchanged;
        }

        let state = NavigationState {
            url: url.to_string(),
            title: title.to_string(),
            html: html.to_string(),
        };
        if is_redirect {
            self.history.replace(state);
            HistoryChange::Replaced
        } else {
            self.history.push(state);
            HistoryChange::Pushed
        }
    }

    /// Put a previously committed view back exactly as it was.
    pub fn restore(&mut self, state: &NavigationState) {
        self.surface.set_title(&state.title);
        self.surface.render(&state.html);
    }

    /// Replace the content without touching title or history.
    pub fn render_only(&mut self, html: &str) {
        self.surface.render(html);
    }

    pub fn current_hash(&self) -> String {
        self.history.current_hash()
    }

    pub fn back(&mut self) -> Option<HistoryEntry> {
        self.history.back()
    }

    pub fn forward(&mut self) -> Option<HistoryEntry> {
        self.history.forward()
    }

    pub fn set_field(&mut self, id: &str, value: &str) {
        self.surface.set_field(id, value);
    }

    pub fn field(&self, id: &str) -> Option<String> {
        self.surface.field(id)
    }
}
