//! Asynchronous resource client.
//!
//! Wraps one request/response exchange: classifies the outcome by status
//! code and decodes the body according to the declared content type.

mod error;
mod transport;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::{ClientError, TransportError};
pub use reqwest::Method;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// The body as text. JSON strings are unwrapped, other JSON values are
    /// re-serialized.
    pub fn into_text(self) -> String {
        match self {
            Payload::Text(text) => text,
            Payload::Json(Value::String(text)) => text,
            Payload::Json(value) => value.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn HttpTransport>,
}

impl ResourceClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Issue one request and classify the response.
    ///
    /// A `body` is sent as JSON with a JSON content type. There is no retry
    /// and no timeout here; callers that need one wrap the future.
    pub async fn request(
        &self,
        url: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Payload, ClientError> {
        let body = body.map(|value| encode_body(url, value)).transpose()?;
        let response = self.exchange(url, method, body).await?;
        decode_response(url, response)
    }

    pub async fn get(&self, url: &str) -> Result<Payload, ClientError> {
        self.request(url, Method::GET, None).await
    }

    /// GET and decode into `T`. A body served without a JSON content type is
    /// still parsed as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let payload = self.get(url).await?;
        decode_payload(url, payload)
    }

    pub async fn get_text(&self, url: &str) -> Result<String, ClientError> {
        Ok(self.get(url).await?.into_text())
    }

    /// GET the body as-is, whatever content type it was labelled with.
    pub async fn get_raw(&self, url: &str) -> Result<String, ClientError> {
        Ok(self.exchange(url, Method::GET, None).await?.body)
    }

    /// Send `body` as JSON with `method` and decode the reply into `T`.
    pub async fn send_json<T, B>(
        &self,
        url: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(|value| encode_body(url, value)).transpose()?;
        let response = self.exchange(url, method, body).await?;
        decode_payload(url, decode_response(url, response)?)
    }

    /// Send one request; any non-2xx status is an error.
    async fn exchange(
        &self,
        url: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, ClientError> {
        let content_type = body.as_ref().map(|_| JSON_CONTENT_TYPE);

        tracing::debug!(method = method.as_str(), url, "Sending request");
        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: url.to_string(),
                content_type,
                body,
            })
            .await
            .map_err(|e| ClientError::Transport {
                url: url.to_string(),
                source: Arc::new(e),
            })?;

        if !(200..300).contains(&response.status) {
            tracing::debug!(url, status = response.status, "Request failed");
            return Err(ClientError::Status {
                status: response.status,
                status_text: response.status_text,
            });
        }
        Ok(response)
    }
}

fn encode_body<B: Serialize + ?Sized>(url: &str, body: &B) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(body).map_err(|e| ClientError::encode(url, e))
}

fn decode_response(url: &str, response: HttpResponse) -> Result<Payload, ClientError> {
    if is_json(response.content_type.as_deref()) {
        let value =
            serde_json::from_str(&response.body).map_err(|e| ClientError::decode(url, e))?;
        Ok(Payload::Json(value))
    } else {
        Ok(Payload::Text(response.body))
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().starts_with(JSON_CONTENT_TYPE))
}

fn decode_payload<T: DeserializeOwned>(url: &str, payload: Payload) -> Result<T, ClientError> {
    match payload {
        Payload::Json(value) => serde_json::from_value(value),
        Payload::Text(text) => serde_json::from_str(&text),
    }
    .map_err(|e| ClientError::decode(url, e))
}
