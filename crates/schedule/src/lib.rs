//! Time-window scheduler: given "now" and a service, decide whether this is
//! a trigger moment and, if so, the historical `[since, until)` window the
//! caller should fetch.
//!
//! The whole crate is a pure, synchronous computation over an immutable
//! [`ScheduleConfig`]: no I/O after load, no shared mutable state, safe to
//! call concurrently from the driver. Any timeout/retry behavior belongs to
//! the fetch side, not here.

pub mod anchor;
pub mod config;
pub mod pattern;
pub mod trigger;
pub mod window;

use chrono::NaiveDateTime;
use tracing::debug;

pub use anchor::AnchorTime;
pub use config::{ConfigError, ScheduleConfig};
pub use pattern::{Pattern, ServiceId};
pub use trigger::{evaluate, Trigger};
pub use window::{build_window, Window};

/// Per-service, per-tick decision. Constructed fresh on every call and
/// consumed immediately by the caller; nothing is persisted.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub service: ServiceId,
    pub pattern: String,
    pub triggered: bool,
    pub lookback_minutes: u32,
    pub window: Option<Window>,
}

/// The single entry point the driver calls once per service per tick.
///
/// Composes pattern resolution, trigger evaluation, and window building.
/// Total: always returns a well-formed result, never errors — "no trigger
/// this tick" is a normal outcome, not a failure.
pub fn evaluate_service(
    service: &ServiceId,
    now: NaiveDateTime,
    config: &ScheduleConfig,
) -> EvaluationResult {
    let pattern = config.resolve(service);
    let trigger = trigger::evaluate(now, &pattern.anchors);
    let window = window::build_window(now, trigger.lookback_minutes);
    debug!(
        service = %service,
        pattern = %pattern.name,
        triggered = trigger.triggered,
        lookback_minutes = trigger.lookback_minutes,
        "evaluated service"
    );
    EvaluationResult {
        service: service.clone(),
        pattern: pattern.name.clone(),
        triggered: trigger.triggered,
        lookback_minutes: trigger.lookback_minutes,
        window,
    }
}
