//! Process-wide startup state.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use tracing::debug;

static PROCESS_START: LazyLock<DateTime<Utc>> = LazyLock::new(Utc::now);

/// The timestamp reported as "request started" when no trigger is active.
///
/// Fixed for the process lifetime: captured once, never reset.
pub fn process_start() -> DateTime<Utc> {
    *PROCESS_START
}

/// Capture the process start timestamp.
///
/// The dispatch layer calls this once during startup, before serving
/// traffic. A host that skips it still works; the timestamp is then
/// captured lazily on the first metadata read instead.
pub fn init() {
    let started = process_start();
    debug!("whence runtime initialized (process start {started})");
}
