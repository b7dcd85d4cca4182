//! Headless navigation and template-caching engine for the tax lookup app.
//!
//! ```text
//! navigate(hash) ──→ Route ──→ view handler ──→ ResourceClient (JSON data)
//!                                   │                 ↑
//!                                   └──→ TemplateCache┘ (HTML fragments)
//!                                   │
//!                                   ▼
//!                       commit_view ──→ ViewSurface + NavigationHistory
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod logging;
pub mod mvi;
pub mod router;
pub mod template;
pub mod view;
