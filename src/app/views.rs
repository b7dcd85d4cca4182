//! View handlers: fetch data, render fragments, hand back a finished view.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

use crate::app::calculator::CalculatorForm;
use crate::app::tax::TaxApi;
use crate::client::ClientError;
use crate::router::Route;
use crate::template::TemplateCache;

pub const PROVINCES_URL: &str = "#/provinces";
pub const CALCULATOR_URL: &str = "#/calculator";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Render task failed: {0}")]
    Join(#[from] JoinError),
}

/// A rendered view, ready to commit.
#[derive(Debug)]
pub struct View {
    pub url: String,
    pub title: String,
    pub html: String,
    /// Replace the active history entry instead of pushing.
    pub redirect: bool,
    /// Set for the calculator, which stays interactive after commit.
    pub calculator: Option<CalculatorForm>,
}

impl View {
    fn page(url: impl Into<String>, title: impl Into<String>, html: String) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            html,
            redirect: false,
            calculator: None,
        }
    }
}

#[derive(Clone)]
pub struct Views {
    templates: Arc<TemplateCache>,
    taxes: TaxApi,
}

impl Views {
    pub fn new(templates: Arc<TemplateCache>, taxes: TaxApi) -> Self {
        Self { templates, taxes }
    }

    pub async fn render(&self, route: &Route) -> Result<View, ViewError> {
        match route {
            Route::Index => self.provinces(true).await,
            Route::Provinces => self.provinces(false).await,
            Route::Taxes { code } => self.tax(code).await,
            Route::Calculator => self.calculator().await,
        }
    }

    async fn provinces(&self, redirect: bool) -> Result<View, ViewError> {
        let taxes = self.taxes.list().await?;
        let content = self
            .render_each("province-item", taxes.iter().map(|t| t.context()).collect())
            .await?;
        let html = self
            .templates
            .get_template("provinces-page", &single("content", content))
            .await?;

        Ok(View {
            redirect,
            ..View::page(PROVINCES_URL, "Provinces", html)
        })
    }

    async fn tax(&self, code: &str) -> Result<View, ViewError> {
        let tax = self.taxes.by_code(code).await?;
        let html = self.templates.get_template("tax-page", &tax.context()).await?;

        Ok(View::page(
            format!("#/taxes/{}", code),
            format!("Taxes in {}", tax.province),
            html,
        ))
    }

    async fn calculator(&self) -> Result<View, ViewError> {
        let taxes = self.taxes.list().await?;
        let provinces = self
            .render_each(
                "province-dropdown-item",
                taxes.iter().map(|t| t.context()).collect(),
            )
            .await?;
        let html = self
            .templates
            .get_template("calculator-page", &single("provinces", provinces))
            .await?;

        Ok(View {
            calculator: Some(CalculatorForm::new(taxes)),
            ..View::page(CALCULATOR_URL, "Calculator", html)
        })
    }

    /// Render `name` once per context, all at once, and join the results in
    /// input order. The first failure aborts the remaining renders.
    async fn render_each(
        &self,
        name: &'static str,
        contexts: Vec<Map<String, Value>>,
    ) -> Result<String, ViewError> {
        let mut parts = vec![String::new(); contexts.len()];
        let mut tasks = JoinSet::new();
        for (index, context) in contexts.into_iter().enumerate() {
            let templates = Arc::clone(&self.templates);
            tasks.spawn(async move { (index, templates.get_template(name, &context).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, rendered) = joined?;
            parts[index] = rendered?;
        }
        Ok(parts.concat())
    }
}

fn single(key: &str, value: String) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert(key.to_string(), Value::String(value));
    context
}
