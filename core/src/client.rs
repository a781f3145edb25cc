//! Request core shared by every resource operation.
//!
//! # Design
//! `ApiClient` owns the connection settings, the store they persist to and
//! the transport. `request` is split into `build_request` (pure: URL, merged
//! headers, body) and `parse_response` (pure: status check, JSON decode,
//! error-message extraction) around a single `Transport::execute` call.
//! Each request works from one config snapshot. Org-scoped comms paths are
//! built from that same snapshot, so the path and `X-Org-Id` always agree.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::{ClientConfig, KeyValueStore};
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

/// Decoded JSON on success.
pub type ApiResult = Result<Value, ApiError>;

/// One of the two independently addressed backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Work,
    Comms,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Work => "work",
            Service::Comms => "comms",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Service::Work),
            "comms" => Ok(Service::Comms),
            other => Err(format!("unknown service: {other}")),
        }
    }
}

/// Per-call overrides for `ApiClient::request`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Replace same-named default headers.
    pub headers: Vec<(String, String)>,
    /// Pre-serialized JSON.
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Options carrying `body` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(method: HttpMethod, body: &T) -> Result<Self, ApiError> {
        Ok(Self {
            method,
            headers: Vec::new(),
            body: Some(serde_json::to_string(body)?),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Client for the work and comms services.
pub struct ApiClient {
    config: RwLock<ClientConfig>,
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client whose settings are loaded from `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, transport: Arc<dyn Transport>) -> Self {
        let config = ClientConfig::load(store.as_ref());
        Self {
            config: RwLock::new(config),
            store,
            transport,
        }
    }

    /// Build a client over `store` using the blocking `ureq` transport.
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, Arc::new(UreqTransport::new()))
    }

    /// Snapshot of the current settings.
    pub fn config(&self) -> ClientConfig {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the settings in memory, then persist them.
    ///
    /// Later requests use the new values even if persisting fails.
    pub fn save_config(
        &self,
        work_url: &str,
        comms_url: &str,
        org_id: &str,
        user_id: &str,
    ) -> Result<(), ConfigError> {
        let config = ClientConfig::new(work_url, comms_url, org_id, user_id);
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config.clone();
        config.save(self.store.as_ref())
    }

    /// Issue one request against `service` and decode the reply.
    pub fn request(&self, service: Service, endpoint: &str, options: RequestOptions) -> ApiResult {
        self.request_with(&self.config(), service, endpoint, options)
    }

    /// Like `request`, against an already taken config snapshot.
    pub(crate) fn request_with(
        &self,
        config: &ClientConfig,
        service: Service,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult {
        let request = request_for(config, service, endpoint, options);
        let logged_body = request
            .body
            .as_deref()
            .map(|b| serde_json::from_str::<Value>(b).unwrap_or_else(|_| Value::String(b.to_string())));
        debug!(method = %request.method, url = %request.url, body = ?logged_body, "api request");

        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                error!(method = %request.method, url = %request.url, "api transport failure: {e}");
                return Err(e.into());
            }
        };

        match parse_response(response) {
            Ok(data) => {
                debug!(url = %request.url, response = %data, "api response");
                Ok(data)
            }
            Err(e) => {
                if let ApiError::Request { status, body, .. } = &e {
                    error!(url = %request.url, status, body = %body, "api error");
                }
                Err(e)
            }
        }
    }

    /// Describe the request `request` would send, without sending it.
    pub fn build_request(&self, service: Service, endpoint: &str, options: RequestOptions) -> HttpRequest {
        request_for(&self.config(), service, endpoint, options)
    }

    pub(crate) fn get(&self, service: Service, endpoint: &str) -> ApiResult {
        self.request(service, endpoint, RequestOptions::default())
    }

    pub(crate) fn send_json<T: Serialize + ?Sized>(
        &self,
        service: Service,
        method: HttpMethod,
        endpoint: &str,
        body: &T,
    ) -> ApiResult {
        self.request(service, endpoint, RequestOptions::json(method, body)?)
    }

    pub(crate) fn delete(&self, service: Service, endpoint: &str) -> ApiResult {
        self.request(service, endpoint, RequestOptions::method(HttpMethod::Delete))
    }
}

fn request_for(config: &ClientConfig, service: Service, endpoint: &str, options: RequestOptions) -> HttpRequest {
    let base_url = match service {
        Service::Work => &config.work_base_url,
        Service::Comms => &config.comms_base_url,
    };

    let mut headers = vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("X-Org-Id".to_string(), config.org_id.clone()),
        ("X-User-Id".to_string(), config.user_id.clone()),
    ];
    for (name, value) in options.headers {
        match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(existing) => existing.1 = value,
            None => headers.push((name, value)),
        }
    }

    HttpRequest {
        method: options.method,
        url: format!("{base_url}{endpoint}"),
        headers,
        body: options.body,
    }
}

/// Decode `response`, mapping any non-2xx status to `ApiError::Request`.
///
/// A body that is empty or not JSON decodes to `Value::Null`.
pub fn parse_response(response: HttpResponse) -> ApiResult {
    let data = serde_json::from_str::<Value>(&response.body).unwrap_or(Value::Null);
    if (200..300).contains(&response.status) {
        return Ok(data);
    }
    let message = error_message(&data)
        .unwrap_or_else(|| format!("Request failed: {}", response.status));
    Err(ApiError::Request {
        status: response.status,
        message,
        body: data,
    })
}

/// First usable `detail` or `message`. Empty, zero, false and structured
/// values are skipped.
fn error_message(body: &Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|key| match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    })
}
