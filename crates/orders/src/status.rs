//! Order status lifecycle and the transition function.
//!
//! Every status change goes through [`next_status`], a pure function over the
//! closed [`OrderStatus`] enumeration. The match is written out exhaustively
//! (no catch-all arms) so adding a status or a change forces every
//! combination to be reconsidered at compile time.

use serde::{Deserialize, Serialize};

use shootflow_core::{DomainError, DomainResult};

/// Shoot order status lifecycle.
///
/// `Placed → Accepted → Scheduled → InProgress → Completed`, with `Cancelled`
/// reachable from any non-final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Accepted,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Final states permit no further mutation of any kind.
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Lowercase label used in error messages and logs.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Scheduled => "scheduled",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusChange {
    Accept,
    MarkScheduled,
    Start,
    Complete,
    Cancel,
}

impl StatusChange {
    pub fn label(self) -> &'static str {
        match self {
            StatusChange::Accept => "accept",
            StatusChange::MarkScheduled => "mark_scheduled",
            StatusChange::Start => "start",
            StatusChange::Complete => "complete",
            StatusChange::Cancel => "cancel",
        }
    }
}

/// Compute the status a change would lead to, or reject it.
///
/// `task_count` feeds the task-existence gate: an order cannot move into
/// `Scheduled` or `InProgress` with zero tasks. `Cancel` on an already
/// cancelled order is accepted and yields `Cancelled` again; the aggregate
/// treats that case as a no-op.
pub fn next_status(
    current: OrderStatus,
    change: StatusChange,
    task_count: usize,
) -> DomainResult<OrderStatus> {
    use OrderStatus::*;

    match change {
        StatusChange::Accept => match current {
            Placed => Ok(Accepted),
            Accepted | Scheduled | InProgress | Completed | Cancelled => Err(rejected(
                change, current,
            )),
        },
        StatusChange::MarkScheduled => match current {
            Accepted | Scheduled => {
                if task_count == 0 {
                    Err(DomainError::invalid_transition(
                        "cannot mark an order scheduled with no tasks",
                    ))
                } else {
                    Ok(Scheduled)
                }
            }
            Placed | InProgress | Completed | Cancelled => Err(rejected(change, current)),
        },
        StatusChange::Start => match current {
            Accepted | Scheduled => {
                if task_count == 0 {
                    Err(DomainError::invalid_transition(
                        "cannot start an order with no tasks",
                    ))
                } else {
                    Ok(InProgress)
                }
            }
            Placed | InProgress | Completed | Cancelled => Err(rejected(change, current)),
        },
        StatusChange::Complete => match current {
            Scheduled | InProgress => Ok(Completed),
            Placed | Accepted | Completed | Cancelled => Err(rejected(change, current)),
        },
        StatusChange::Cancel => match current {
            Placed | Accepted | Scheduled | InProgress | Cancelled => Ok(Cancelled),
            Completed => Err(rejected(change, current)),
        },
    }
}

fn rejected(change: StatusChange, current: OrderStatus) -> DomainError {
    DomainError::invalid_transition(format!(
        "cannot {} an order in status {}",
        change.label(),
        current
    ))
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use super::StatusChange::*;
    use super::*;

    #[test]
    fn happy_path_transitions() {
        assert_eq!(next_status(Placed, Accept, 0).unwrap(), Accepted);
        assert_eq!(next_status(Accepted, MarkScheduled, 1).unwrap(), Scheduled);
        assert_eq!(next_status(Scheduled, Start, 1).unwrap(), InProgress);
        assert_eq!(next_status(InProgress, Complete, 1).unwrap(), Completed);
    }

    #[test]
    fn start_may_skip_scheduled_and_complete_may_skip_in_progress() {
        assert_eq!(next_status(Accepted, Start, 2).unwrap(), InProgress);
        assert_eq!(next_status(Scheduled, Complete, 2).unwrap(), Completed);
    }

    #[test]
    fn accept_does_not_require_tasks_but_scheduling_and_starting_do() {
        assert_eq!(next_status(Placed, Accept, 0).unwrap(), Accepted);
        assert!(next_status(Accepted, MarkScheduled, 0).is_err());
        assert!(next_status(Accepted, Start, 0).is_err());
    }

    #[test]
    fn re_scheduling_a_scheduled_order_is_allowed() {
        assert_eq!(next_status(Scheduled, MarkScheduled, 1).unwrap(), Scheduled);
    }

    #[test]
    fn cancel_is_allowed_from_every_non_final_state_and_from_cancelled() {
        for current in [Placed, Accepted, Scheduled, InProgress, Cancelled] {
            assert_eq!(next_status(current, Cancel, 0).unwrap(), Cancelled);
        }
    }

    #[test]
    fn cancel_of_a_completed_order_is_rejected() {
        let err = next_status(Completed, Cancel, 1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn final_states_reject_every_forward_change() {
        for current in [Completed, Cancelled] {
            for change in [Accept, MarkScheduled, Start, Complete] {
                let res = next_status(current, change, 3);
                assert!(
                    matches!(res, Err(DomainError::InvalidTransition(_))),
                    "{change:?} from {current:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn out_of_order_changes_are_rejected() {
        assert!(next_status(Placed, MarkScheduled, 1).is_err());
        assert!(next_status(Placed, Start, 1).is_err());
        assert!(next_status(Placed, Complete, 1).is_err());
        assert!(next_status(Accepted, Accept, 1).is_err());
        assert!(next_status(Accepted, Complete, 1).is_err());
        assert!(next_status(InProgress, MarkScheduled, 1).is_err());
        assert!(next_status(InProgress, Start, 1).is_err());
    }
}
