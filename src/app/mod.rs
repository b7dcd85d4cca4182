//! The tax lookup application: data APIs, view handlers and wiring.

pub mod calculator;
mod tax;
mod todos;
mod views;

use std::sync::Arc;

pub use tax::{Tax, TaxApi};
pub use todos::TodoApi;
pub use views::{View, ViewError, Views, CALCULATOR_URL, PROVINCES_URL};

use crate::client::{HttpTransport, ResourceClient};
use crate::config::{ApiConfig, NavigationConfig};
use crate::router::Navigator;
use crate::template::{TemplateCache, TemplateStore};
use crate::view::ViewController;

/// Everything one session shares: the client, the template cache and the
/// API wrappers built on them.
#[derive(Clone)]
pub struct AppContext {
    pub client: ResourceClient,
    pub templates: Arc<TemplateCache>,
    pub taxes: TaxApi,
    pub todos: TodoApi,
}

impl AppContext {
    pub fn new(
        api: &ApiConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TemplateStore>,
    ) -> Self {
        let client = ResourceClient::new(transport);
        let templates = Arc::new(TemplateCache::new(
            client.clone(),
            store,
            api.fragments_path.clone(),
        ));
        Self {
            taxes: TaxApi::new(client.clone(), api.taxes_path.clone()),
            todos: TodoApi::new(client.clone(), api.todos_path.clone()),
            client,
            templates,
        }
    }

    pub fn views(&self) -> Views {
        Views::new(Arc::clone(&self.templates), self.taxes.clone())
    }

    pub fn navigator(&self, controller: ViewController, config: NavigationConfig) -> Navigator {
        Navigator::new(self.views(), controller, config)
    }
}
