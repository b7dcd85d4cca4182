use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ClientError, ResourceClient};

/// One province's sales tax record as served by the data API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub code: String,
    pub province: String,
    /// "GST", "HST" or "GST + PST".
    #[serde(rename = "type")]
    pub kind: String,
    /// Federal rate, in percent.
    #[serde(rename = "GST")]
    pub gst: f64,
    /// Provincial rate, in percent.
    #[serde(rename = "PST")]
    pub pst: f64,
    /// Columns the engine does not interpret (ids, timestamps); still
    /// available to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tax {
    /// Placeholder context for templates, keyed by the wire field names.
    pub fn context(&self) -> Map<String, Value> {
        let mut context = self.extra.clone();
        context.insert("code".to_string(), Value::from(self.code.as_str()));
        context.insert("province".to_string(), Value::from(self.province.as_str()));
        context.insert("type".to_string(), Value::from(self.kind.as_str()));
        context.insert("GST".to_string(), Value::from(self.gst));
        context.insert("PST".to_string(), Value::from(self.pst));
        context
    }
}

/// `GET /api/taxes` and `GET /api/taxes/:code`.
#[derive(Clone)]
pub struct TaxApi {
    client: ResourceClient,
    taxes_path: String,
}

impl TaxApi {
    pub fn new(client: ResourceClient, taxes_path: impl Into<String>) -> Self {
        Self {
            client,
            taxes_path: taxes_path.into(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Tax>, ClientError> {
        self.client.get_json(&self.taxes_path).await
    }

    /// The record for `code`. An unmatched code comes back as an error
    /// object, which fails to decode as a `Tax`.
    pub async fn by_code(&self, code: &str) -> Result<Tax, ClientError> {
        let url = format!("{}/{}", self.taxes_path.trim_end_matches('/'), code);
        self.client.get_json(&url).await
    }
}
