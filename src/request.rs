//! The public request view and its projector.
//!
//! Everything here is a read-only snapshot. [`current_request`] copies the
//! internal record into a [`Request`] and never exposes the record itself;
//! concurrent readers each get their own view and the record is never
//! mutated by projection.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use whence_model::{RequestKind, RequestRecord};
use whence_runtime::{process_start, store};

/// How the currently running code was triggered.
///
/// Both RPC calls and auth-handler invocations report as [`ApiCall`]:
/// callers care that some inbound API trigger occurred, not which internal
/// subtype. The finer distinction is deliberately not recoverable from the
/// public view.
///
/// [`ApiCall`]: TriggerType::ApiCall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerType {
    /// No external trigger — process startup or unattributed background
    /// work.
    #[serde(rename = "none")]
    None,
    /// An inbound API call to a service.
    #[serde(rename = "api-call")]
    ApiCall,
    /// A message delivered by a pub/sub subscription.
    #[serde(rename = "pubsub-message")]
    PubSubMessage,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ApiCall => "api-call",
            Self::PubSubMessage => "pubsub-message",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about the API endpoint being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiDesc {
    /// Request-payload shape, or `None` if the endpoint has no request
    /// payload or is raw.
    pub request_type: Option<&'static str>,
    /// Response-payload shape, or `None` if the endpoint has no response
    /// payload or is raw.
    pub response_type: Option<&'static str>,
    /// Whether the endpoint is a raw endpoint.
    pub raw: bool,
}

/// A parsed path parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParam {
    /// Name of the parameter, without any leading `:` or `*`.
    pub name: String,
    /// Parsed value.
    pub value: String,
}

/// Path parameters parsed from the request path.
///
/// Ordering matches the URL: the first parameter in the route pattern comes
/// first. Duplicate names are kept in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathParams(Vec<PathParam>);

impl PathParams {
    /// Value of the first parameter named `name`, or `""` if there is none.
    ///
    /// A missing parameter is expected absence, not an error.
    pub fn get(&self, name: &str) -> &str {
        self.0
            .iter()
            .find(|param| param.name == name)
            .map(|param| param.value.as_str())
            .unwrap_or("")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathParam> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for PathParams {
    type Target = [PathParam];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PathParam>> for PathParams {
    fn from(params: Vec<PathParam>) -> Self {
        Self(params)
    }
}

impl<'a> IntoIterator for &'a PathParams {
    type Item = &'a PathParam;
    type IntoIter = std::slice::Iter<'a, PathParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Metadata about how and why the currently running code was started.
///
/// An immutable snapshot; reading it has no effect on the underlying
/// record, and repeated reads within one request return equal views.
#[derive(Debug, Clone)]
pub struct Request {
    /// What caused this code to run.
    pub trigger: TriggerType,
    /// When the trigger occurred, or process start when there was none.
    pub started: DateTime<Utc>,
    /// Endpoint metadata. Present only when the trigger is an API call with
    /// a known endpoint descriptor.
    pub api: Option<ApiDesc>,
    /// Service processing this request. Empty when nothing is bound.
    pub service: String,
    /// Endpoint being called. Empty when nothing is bound.
    pub endpoint: String,
    /// Path of the request made to the API server.
    pub path: String,
    /// Path parameters in URL order.
    pub path_params: PathParams,
    /// Decoded request or pub/sub message payload, if any.
    pub payload: Option<Arc<Value>>,
}

/// Snapshot of the request metadata for the calling execution unit.
///
/// With no record bound (startup code, unpropagated background work) this
/// returns the default view: trigger [`TriggerType::None`], started at
/// process start, every other field empty or absent. May be called any
/// number of times per request with identical results.
pub fn current_request() -> Request {
    match store::current() {
        Some(record) => project(&record),
        None => Request {
            trigger: TriggerType::None,
            started: process_start(),
            api: None,
            service: String::new(),
            endpoint: String::new(),
            path: String::new(),
            path_params: PathParams::default(),
            payload: None,
        },
    }
}

fn project(record: &RequestRecord) -> Request {
    let trigger = match record.kind {
        RequestKind::RpcCall | RequestKind::AuthHandler => TriggerType::ApiCall,
        RequestKind::PubSubMessage => TriggerType::PubSubMessage,
        RequestKind::None => TriggerType::None,
    };

    // Index-for-index copy: order and duplicates preserved.
    let path_params = PathParams(
        record
            .path_segments
            .iter()
            .map(|segment| PathParam {
                name: segment.name.clone(),
                value: segment.value.clone(),
            })
            .collect(),
    );

    let api = record.endpoint_desc.map(|desc| ApiDesc {
        request_type: desc.request_type,
        response_type: desc.response_type,
        raw: desc.raw,
    });

    Request {
        trigger,
        started: record.start,
        api,
        service: record.service.clone(),
        endpoint: record.endpoint.clone(),
        path: record.path.clone(),
        path_params,
        payload: record.payload.clone(),
    }
}
