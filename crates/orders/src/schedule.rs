//! Scheduling policy: pure validation of proposed time windows.
//!
//! Used for both order-level and task-level schedules. Validation takes `now`
//! as an argument so the rules stay deterministic and trivially testable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use shootflow_core::{DomainError, DomainResult, ValueObject};

/// Grace window for backdated start times, in seconds.
///
/// A start time up to this far in the past is still accepted, which tolerates
/// clock skew between callers and the service without allowing obviously
/// backdated schedules.
pub const SCHEDULING_GRACE_SECONDS: i64 = 5 * 60;

/// The grace window as a `chrono::Duration`.
pub fn scheduling_grace() -> Duration {
    Duration::seconds(SCHEDULING_GRACE_SECONDS)
}

/// A validated schedule window: a start instant and an optional end.
///
/// Construction goes through [`ScheduleWindow::validate`]; a value of this
/// type always satisfies the scheduling policy relative to the `now` it was
/// validated against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl ScheduleWindow {
    /// Validate a proposed window against the scheduling policy.
    ///
    /// Rules:
    /// - `start` may not lie more than the grace window before `now`;
    /// - `end`, if present, must be strictly after `start`.
    pub fn validate(
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if start < now - scheduling_grace() {
            return Err(DomainError::validation(format!(
                "scheduled start {start} is more than {SCHEDULING_GRACE_SECONDS}s in the past"
            )));
        }
        if let Some(end) = end {
            if end <= start {
                return Err(DomainError::validation(format!(
                    "scheduled end {end} must be after start {start}"
                )));
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }
}

impl ValueObject for ScheduleWindow {}
