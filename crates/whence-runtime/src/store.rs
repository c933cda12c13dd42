//! The execution context store.
//!
//! Two storage tiers, both scoped to a single execution unit: a
//! `tokio::task_local!` slot for async tasks and a `thread_local!` slot for
//! synchronous handlers on dedicated threads. There is no process-wide map
//! of unit to record — each unit reads and writes only its own slot, so
//! [`current`] never contends with other units.
//!
//! Binding while a record is already bound is a dispatch-layer bug and
//! fails fast: [`bind`] and [`with_request`] panic, [`try_bind`] returns
//! [`BindError::AlreadyBound`]. Nested scopes do not stack.

use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;
use whence_model::RequestRecord;

tokio::task_local! {
    static TASK_SLOT: Arc<RequestRecord>;
}

thread_local! {
    static THREAD_SLOT: RefCell<Option<Arc<RequestRecord>>> = const { RefCell::new(None) };
}

/// Misuse of the store by the dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A record is already bound to the calling execution unit.
    #[error("a request is already bound to this execution unit ({service}/{endpoint})")]
    AlreadyBound { service: String, endpoint: String },
}

/// Scope handle returned by [`bind`]. Dropping it releases the binding.
///
/// Not `Send`: the guard must be dropped on the thread that bound the
/// record. Drop runs on every exit path, including unwinding, so a handler
/// panic still leaves the thread unbound.
#[derive(Debug)]
pub struct BindGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for BindGuard {
    fn drop(&mut self) {
        THREAD_SLOT.with(|slot| slot.borrow_mut().take());
    }
}

/// The record bound to the calling execution unit, if any.
///
/// Checks the task slot first, then the thread slot. No side effects, no
/// locking; cheap enough for every metadata read.
pub fn current() -> Option<Arc<RequestRecord>> {
    if let Ok(record) = TASK_SLOT.try_with(Arc::clone) {
        return Some(record);
    }
    THREAD_SLOT.with(|slot| slot.borrow().clone())
}

/// Bind `record` to the calling thread for the lifetime of the returned
/// guard.
///
/// For synchronous handlers running on a dedicated thread. Async handlers
/// use [`with_request`] instead — a thread binding on a runtime worker
/// would bleed into whatever tasks that worker happens to poll.
///
/// # Panics
///
/// Panics if a record is already bound to this unit. Use [`try_bind`] to
/// surface the bug as an error instead.
pub fn bind(record: Arc<RequestRecord>) -> BindGuard {
    match try_bind(record) {
        Ok(guard) => guard,
        Err(err) => panic!("dispatch bug: {err}"),
    }
}

/// Fallible variant of [`bind`].
pub fn try_bind(record: Arc<RequestRecord>) -> Result<BindGuard, BindError> {
    if let Some(bound) = current() {
        return Err(BindError::AlreadyBound {
            service: bound.service.clone(),
            endpoint: bound.endpoint.clone(),
        });
    }
    THREAD_SLOT.with(|slot| *slot.borrow_mut() = Some(record));
    Ok(BindGuard {
        _not_send: PhantomData,
    })
}

/// Run `fut` with `record` bound to the executing task.
///
/// The binding covers exactly the polls of `fut`: it follows the future
/// across worker threads and ends when the future completes or is dropped
/// mid-poll (cancellation), so release is guaranteed on every exit path.
///
/// # Panics
///
/// Panics if a record is already bound to this unit when the future is
/// first polled.
pub async fn with_request<F>(record: Arc<RequestRecord>, fut: F) -> F::Output
where
    F: Future,
{
    if let Some(bound) = current() {
        panic!(
            "dispatch bug: a request is already bound to this execution unit ({}/{})",
            bound.service, bound.endpoint
        );
    }
    TASK_SLOT.scope(record, fut).await
}

/// Explicitly carry the current binding into spawned work.
///
/// Captures the calling unit's record at call time and re-binds it around
/// `fut`, typically as `tokio::spawn(propagate(fut))`. Without this, the
/// spawned unit observes no current request — the correct default for
/// background work that should not be attributed to the trigger.
pub fn propagate<F>(fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let record = current();
    async move {
        match record {
            Some(record) => TASK_SLOT.scope(record, fut).await,
            None => fut.await,
        }
    }
}
