//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use taxview::app::AppContext;
use taxview::client::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use taxview::config::{ApiConfig, NavigationConfig};
use taxview::router::Navigator;
use taxview::template::{MemoryStore, TemplateStore};
use taxview::view::{MemoryDocument, MemoryHistory, ViewController};
use tempfile::TempDir;

pub const TAXES_JSON: &str = r#"[
    {"code": "ON", "province": "Ontario", "type": "HST", "GST": 0, "PST": 13},
    {"code": "BC", "province": "British Columbia", "type": "GST + PST", "GST": 5, "PST": 7}
]"#;

pub const ON_JSON: &str =
    r#"{"code": "ON", "province": "Ontario", "type": "HST", "GST": 0, "PST": 13}"#;

pub const BC_JSON: &str =
    r#"{"code": "BC", "province": "British Columbia", "type": "GST + PST", "GST": 5, "PST": 7}"#;

pub const PROVINCE_ITEM: &str = r##"<li><a href="#/taxes/{{code}}">{{province}}</a></li>"##;
pub const PROVINCES_PAGE: &str = "<h1>Provinces</h1><ul>{{content}}</ul>";
pub const TAX_PAGE: &str = "<h1>{{province}}</h1><p>{{type}}: GST {{GST}}% PST {{PST}}%</p>";
pub const DROPDOWN_ITEM: &str = r#"<option value="{{code}}">{{province}}</option>"#;
pub const CALCULATOR_PAGE: &str = r#"<form><select id="province">{{provinces}}</select></form>"#;

// -- Fake transport -----------------------------------------------------------

/// A scripted reply for one request url.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
    pub delay_ms: u64,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.to_string(),
            delay_ms: 0,
        }
    }

    pub fn html(body: &str) -> Self {
        Self {
            content_type: Some("text/html; charset=utf-8".to_string()),
            ..Self::json(body)
        }
    }

    pub fn error(status: u16, status_text: &str) -> Self {
        Self {
            status,
            status_text: status_text.to_string(),
            content_type: Some("text/plain".to_string()),
            body: status_text.to_string(),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

/// In-process transport answering from a url -> reply table and recording
/// every request. Unknown urls get a 404.
///
/// Each send yields to the scheduler before answering so concurrent
/// requests genuinely overlap.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport serving the tax API and every fragment the views use.
    pub fn tax_site() -> Arc<Self> {
        let transport = Self::new();
        transport.reply("/api/taxes", Reply::json(TAXES_JSON));
        transport.reply("/api/taxes/ON", Reply::json(ON_JSON));
        transport.reply("/api/taxes/BC", Reply::json(BC_JSON));
        transport.reply("fragments/province-item.html", Reply::html(PROVINCE_ITEM));
        transport.reply("fragments/provinces-page.html", Reply::html(PROVINCES_PAGE));
        transport.reply("fragments/tax-page.html", Reply::html(TAX_PAGE));
        transport.reply("fragments/province-dropdown-item.html", Reply::html(DROPDOWN_ITEM));
        transport.reply("fragments/calculator-page.html", Reply::html(CALCULATOR_PAGE));
        transport
    }

    pub fn reply(&self, url: &str, reply: Reply) {
        self.replies.lock().insert(url.to_string(), reply);
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Requests made for `url`.
    pub fn count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|r| r.url == url).count()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.calls.lock().push(request);
        tokio::task::yield_now().await;

        let reply = self
            .replies
            .lock()
            .get(&url)
            .cloned()
            .unwrap_or_else(|| Reply::error(404, "Not Found"));
        if reply.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(reply.delay_ms)).await;
        }

        Ok(HttpResponse {
            status: reply.status,
            status_text: reply.status_text,
            content_type: reply.content_type,
            body: reply.body,
        })
    }
}

// -- App helpers --------------------------------------------------------------

pub fn make_app(transport: Arc<FakeTransport>) -> AppContext {
    make_app_with_store(transport, Arc::new(MemoryStore::new()))
}

pub fn make_app_with_store(
    transport: Arc<FakeTransport>,
    store: Arc<dyn TemplateStore>,
) -> AppContext {
    AppContext::new(&ApiConfig::default(), transport, store)
}

/// A navigator over an in-memory document and history, plus handles to
/// both for assertions. History starts on `initial_hash`.
pub fn make_navigator(
    app: &AppContext,
    config: NavigationConfig,
    initial_hash: &str,
) -> (Navigator, MemoryDocument, MemoryHistory) {
    let document = MemoryDocument::new();
    let history = MemoryHistory::new(initial_hash);
    let controller = ViewController::new(Box::new(document.clone()), Box::new(history.clone()));
    (app.navigator(controller, config), document, history)
}

// -- Config helpers -----------------------------------------------------------

/// Write `content` to a config file in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
