//! Per-execution request records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoint::EndpointDesc;

/// What triggered an in-flight execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    /// An RPC call to a service endpoint.
    RpcCall,
    /// An auth handler invoked ahead of an endpoint.
    AuthHandler,
    /// A message delivered by a pub/sub subscription.
    PubSubMessage,
    /// No external trigger.
    None,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RpcCall => "rpc-call",
            Self::AuthHandler => "auth-handler",
            Self::PubSubMessage => "pub-sub-message",
            Self::None => "none",
        }
    }
}

/// One (name, value) pair extracted from the route, in route order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub name: String,
    pub value: String,
}

impl PathSegment {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Internal record of one triggered execution.
///
/// Created by the dispatch layer immediately before invoking application
/// code and unbound immediately after that invocation returns, on every
/// exit path. Exactly one execution unit owns a record at a time, and the
/// record is not mutated while bound.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub kind: RequestKind,
    /// When handling of the trigger began.
    pub start: DateTime<Utc>,
    /// Service processing the request.
    pub service: String,
    /// Endpoint (or subscription) being invoked.
    pub endpoint: String,
    /// Raw request path as received, e.g. `/blog/hello-world/comments/4`.
    pub path: String,
    /// Route parameters in match order. Duplicate names are kept as-is.
    pub path_segments: Vec<PathSegment>,
    /// Static endpoint metadata, when known.
    pub endpoint_desc: Option<EndpointDesc>,
    /// Decoded request or message body. Opaque to the runtime.
    pub payload: Option<Arc<Value>>,
}

impl RequestRecord {
    /// Record started now, with empty routing fields.
    pub fn new(
        kind: RequestKind,
        service: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            start: Utc::now(),
            service: service.into(),
            endpoint: endpoint.into(),
            path: String::new(),
            path_segments: Vec::new(),
            endpoint_desc: None,
            payload: None,
        }
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_path_segments(mut self, segments: Vec<PathSegment>) -> Self {
        self.path_segments = segments;
        self
    }

    pub fn with_endpoint_desc(mut self, desc: EndpointDesc) -> Self {
        self.endpoint_desc = Some(desc);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }
}
