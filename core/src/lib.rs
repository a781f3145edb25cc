//! Blocking API client for the rundesk work and comms services.
//!
//! # Overview
//! `ApiClient::request` is the single entry point every resource operation
//! goes through: it picks the service base URL, merges the identity headers
//! with per-call overrides, sends the request through a `Transport`, and
//! decodes the JSON reply or turns a failed status into an `ApiError`.
//!
//! # Design
//! - Requests are described as plain `HttpRequest` / `HttpResponse` data;
//!   `build_request` and `parse_response` are pure, only the injected
//!   `Transport` does I/O (`UreqTransport` by default).
//! - Settings (`ClientConfig`) are loaded from a `KeyValueStore` when the
//!   client is built and persisted back by `save_config`. There is no global
//!   instance; callers construct and pass the client.
//! - Work resources live in `work`, comms resources in `comms`. Bodies are
//!   owned by the services, so they go in as `impl Serialize` and come back as
//!   `serde_json::Value`.

pub mod client;
mod comms;
pub mod config;
pub mod error;
pub mod http;
pub mod types;
mod work;

pub use client::{parse_response, ApiClient, ApiResult, RequestOptions, Service};
pub use config::{ClientConfig, FileStore, KeyValueStore, MemoryStore};
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Filter, ListParams};
