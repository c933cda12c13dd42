//! Whence — request metadata for code running inside a service runtime.
//!
//! Answers "why is the currently executing code running?": an inbound API
//! call, a pub/sub message delivery, or no external trigger at all.
//! [`current_request`] reads the record the dispatch layer bound to the
//! calling execution unit and projects it into an immutable [`Request`]
//! view. Code at any call depth can read it; nothing needs to pass a
//! context value through function signatures.
//!
//! The binding side lives in [`runtime`]: the dispatch layer wraps each
//! handler invocation in `runtime::dispatch` (or binds directly through
//! `runtime::store`), and carries bindings into spawned work explicitly
//! with `runtime::store::propagate`.

pub mod request;

pub use request::{ApiDesc, PathParam, PathParams, Request, TriggerType, current_request};

pub use whence_model as model;
pub use whence_runtime as runtime;
