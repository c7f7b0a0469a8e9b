// insiders-client/src/http.rs
// HTTP transport - network communication

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, StatusCode, Url, multipart};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{ClientConfig, ClientError, ClientResult};

/// Request body variants used by the backend
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// Single-file multipart upload
    File {
        field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// One backend call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub payload: Payload,
    /// Message used when a failed response carries no readable error
    pub failure: &'static str,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, failure: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            payload: Payload::Empty,
            failure,
        }
    }

    pub fn get(path: impl Into<String>, failure: &'static str) -> Self {
        Self::new(Method::GET, path, failure)
    }

    pub fn post(path: impl Into<String>, failure: &'static str) -> Self {
        Self::new(Method::POST, path, failure)
    }

    pub fn put(path: impl Into<String>, failure: &'static str) -> Self {
        Self::new(Method::PUT, path, failure)
    }

    pub fn delete(path: impl Into<String>, failure: &'static str) -> Self {
        Self::new(Method::DELETE, path, failure)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        self.payload = Payload::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.payload = Payload::Form(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn file(mut self, field: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.payload = Payload::File {
            field: field.to_string(),
            file_name: file_name.to_string(),
            bytes,
        };
        self
    }
}

/// Successful response body: JSON when it parses, otherwise raw text
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    pub fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(v) => Some(v),
            Body::Text(_) => None,
        }
    }

    /// JSON view of the body; text becomes a JSON string
    pub fn into_json(self) -> Value {
        match self {
            Body::Json(v) => v,
            Body::Text(t) => Value::String(t),
        }
    }
}

/// Best human-readable message in an error body.
///
/// JSON bodies: `message`, then `error` (string or `{message}`).
/// Anything else: the trimmed text, if any.
pub fn error_message(body: &str) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let from_json = map
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| match map.get("error") {
                Some(Value::String(s)) => Some(s.as_str()),
                Some(Value::Object(inner)) => inner.get("message").and_then(Value::as_str),
                _ => None,
            })
            .map(str::trim)
            .filter(|s| !s.is_empty());
        return from_json.map(str::to_string);
    }
    let text = body.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// HTTP transport trait
///
/// The only seam between the API methods and the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ClientResult<Body>;

    /// Cookies the backend set for this origin, as a `Cookie` header value
    fn cookies(&self) -> Option<String>;

    /// Re-install cookies saved from an earlier run
    fn restore_cookies(&self, cookies: &str);
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    jar: Arc<Jar>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .cookie_provider(jar.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            jar,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn origin(&self) -> Option<Url> {
        Url::parse(&self.base_url).ok()
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
        failure: &'static str,
    ) -> ClientResult<Body> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message =
                error_message(&text).unwrap_or_else(|| format!("{} ({})", failure, status.as_u16()));
            warn!(status = status.as_u16(), %message, "Request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        Ok(Body::parse(text))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn execute(&self, request: ApiRequest) -> ClientResult<Body> {
        let url = self.url(&request.path);
        debug!(method = %request.method, %url, "Sending request");

        let mut req = self.client.request(request.method, &url);
        req = match request.payload {
            Payload::Empty => req,
            Payload::Json(body) => req.json(&body),
            Payload::Form(fields) => req.form(&fields),
            Payload::File {
                field,
                file_name,
                bytes,
            } => {
                let part = multipart::Part::bytes(bytes).file_name(file_name);
                req.multipart(multipart::Form::new().part(field, part))
            }
        };

        let response = req.send().await?;
        self.handle_response(response, request.failure).await
    }

    fn cookies(&self) -> Option<String> {
        let origin = self.origin()?;
        self.jar
            .cookies(&origin)
            .and_then(|v| v.to_str().ok().map(str::to_string))
    }

    fn restore_cookies(&self, cookies: &str) {
        let Some(origin) = self.origin() else {
            return;
        };
        for cookie in cookies.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &origin);
        }
    }
}
