//! Dispatch-layer entry points — scoped binding with begin/end logging.
//!
//! The transport layer (HTTP/RPC server, pub/sub subscriber) decodes the
//! trigger, builds a [`RequestRecord`], and runs the handler inside
//! [`dispatch`] or [`dispatch_blocking`]. Both guarantee the binding is
//! released on every exit path: the task scope ends with the handler
//! future, and the blocking guard unwinds with the handler.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use whence_model::RequestRecord;

use crate::store;

/// Run an async handler with `record` bound to its task.
pub async fn dispatch<F>(record: RequestRecord, handler: F) -> F::Output
where
    F: Future,
{
    let record = Arc::new(record);
    debug!(
        "request begin: {}/{} ({}) {}",
        record.service,
        record.endpoint,
        record.kind.as_str(),
        record.path
    );
    let begun = Instant::now();
    let out = store::with_request(Arc::clone(&record), handler).await;
    debug!(
        "request end: {}/{} in {:?}",
        record.service,
        record.endpoint,
        begun.elapsed()
    );
    out
}

/// Run a synchronous handler on the calling thread with `record` bound.
pub fn dispatch_blocking<T>(record: RequestRecord, handler: impl FnOnce() -> T) -> T {
    let record = Arc::new(record);
    debug!(
        "request begin: {}/{} ({}) {}",
        record.service,
        record.endpoint,
        record.kind.as_str(),
        record.path
    );
    let begun = Instant::now();
    let guard = store::bind(Arc::clone(&record));
    let out = handler();
    drop(guard);
    debug!(
        "request end: {}/{} in {:?}",
        record.service,
        record.endpoint,
        begun.elapsed()
    );
    out
}
