use serde_json::{json, Value};

use crate::client::{ClientError, Method, ResourceClient};

/// Client for the session-backed todo list. Items are addressed by their
/// position in the list.
#[derive(Clone)]
pub struct TodoApi {
    client: ResourceClient,
    todos_path: String,
}

impl TodoApi {
    pub fn new(client: ResourceClient, todos_path: impl Into<String>) -> Self {
        Self {
            client,
            todos_path: todos_path.into(),
        }
    }

    fn item_url(&self, index: usize) -> String {
        format!("{}/{}", self.todos_path.trim_end_matches('/'), index)
    }

    pub async fn list(&self) -> Result<Vec<String>, ClientError> {
        self.client.get_json(&self.todos_path).await
    }

    /// Append `text`; returns the updated list.
    pub async fn add(&self, text: &str) -> Result<Vec<String>, ClientError> {
        let body = json!({ "text": text });
        self.client
            .send_json(&self.todos_path, Method::POST, Some(&body))
            .await
    }

    /// A single item. The server labels the bare item text as JSON, so the
    /// body is taken verbatim instead of being parsed.
    pub async fn get(&self, index: usize) -> Result<String, ClientError> {
        self.client.get_raw(&self.item_url(index)).await
    }

    /// Replace the item at `index`; returns the updated list.
    pub async fn update(&self, index: usize, text: &str) -> Result<Vec<String>, ClientError> {
        let body = json!({ "text": text });
        self.client
            .send_json(&self.item_url(index), Method::PUT, Some(&body))
            .await
    }

    /// Remove the item at `index`; returns the updated list.
    pub async fn remove(&self, index: usize) -> Result<Vec<String>, ClientError> {
        self.client
            .send_json::<_, Value>(&self.item_url(index), Method::DELETE, None)
            .await
    }
}
