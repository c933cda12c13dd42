//! Whence runtime — binds request records to execution units.
//!
//! The store associates at most one [`whence_model::RequestRecord`] with
//! each execution unit (a tokio task or a dedicated thread). The dispatch
//! layer binds a record around each handler invocation; any code running
//! inside that scope can ask for the record through [`store::current`]
//! without a context parameter threaded through its signature.
//!
//! Bindings never cross unit boundaries on their own. Work spawned onto a
//! new task observes no current request unless the spawning code carries
//! the binding over explicitly with [`store::propagate`].

pub mod dispatch;
pub mod startup;
pub mod store;

pub use dispatch::{dispatch, dispatch_blocking};
pub use startup::{init, process_start};
pub use store::{BindError, BindGuard, bind, current, propagate, try_bind, with_request};
