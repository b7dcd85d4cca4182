use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Where rendered views end up: the page title, the content container and
/// the values of form fields inside it.
pub trait ViewSurface: Send {
    fn set_title(&mut self, title: &str);
    /// Replace the content container's markup. Field values belonging to the
    /// previous markup are discarded.
    fn render(&mut self, html: &str);
    fn set_field(&mut self, id: &str, value: &str);
    fn field(&self, id: &str) -> Option<String>;
}

#[derive(Debug, Default)]
struct Document {
    title: String,
    html: String,
    fields: HashMap<String, String>,
    renders: usize,
}

/// In-memory document. Clones share the same document, so a caller can keep
/// a handle for inspection after passing one to the navigator.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    inner: Arc<Mutex<Document>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> String {
        self.inner.lock().title.clone()
    }

    pub fn html(&self) -> String {
        self.inner.lock().html.clone()
    }

    /// How many times markup was rendered.
    pub fn renders(&self) -> usize {
        self.inner.lock().renders
    }
}

impl ViewSurface for MemoryDocument {
    fn set_title(&mut self, title: &str) {
        self.inner.lock().title = title.to_string();
    }

    fn render(&mut self, html: &str) {
        let mut doc = self.inner.lock();
        doc.html = html.to_string();
        doc.fields.clear();
        doc.renders += 1;
    }

    fn set_field(&mut self, id: &str, value: &str) {
        self.inner
            .lock()
            .fields
            .insert(id.to_string(), value.to_string());
    }

    fn field(&self, id: &str) -> Option<String> {
        self.inner.lock().fields.get(id).cloned()
    }
}
