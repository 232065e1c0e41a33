//! Shoot tasks: the units of billable/assignable work inside an order.
//!
//! Tasks live and die with their order; nothing outside `ShootOrder` holds a
//! mutable reference to one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shootflow_core::{DomainError, DomainResult, Entity, OrderId, TaskId, UserId};

use crate::schedule::ScheduleWindow;

/// Flags-style classification of the work a task covers.
///
/// Multiple bits may be set (e.g. exterior + drone for an aerial/ground
/// combo). A task must carry at least one bit. Deserialization goes through
/// [`TaskType::from_bits`], so unknown bits are rejected at the boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TaskType(u32);

impl TaskType {
    pub const NONE: TaskType = TaskType(0);
    pub const EXTERIOR: TaskType = TaskType(1);
    pub const INTERIOR: TaskType = TaskType(1 << 1);
    pub const DRONE: TaskType = TaskType(1 << 2);
    pub const FLOOR_PLAN: TaskType = TaskType(1 << 3);
    pub const VIDEO: TaskType = TaskType(1 << 4);
    pub const TWILIGHT: TaskType = TaskType(1 << 5);

    const ALL_BITS: u32 = (1 << 6) - 1;

    /// Build from raw bits, rejecting unknown flags.
    pub fn from_bits(bits: u32) -> DomainResult<Self> {
        if bits & !Self::ALL_BITS != 0 {
            return Err(DomainError::validation(format!(
                "unknown task type bits: {bits:#b}"
            )));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: TaskType) -> bool {
        self.0 & other.0 == other.0
    }
}

impl TryFrom<u32> for TaskType {
    type Error = DomainError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<TaskType> for u32 {
    fn from(value: TaskType) -> Self {
        value.0
    }
}

impl core::ops::BitOr for TaskType {
    type Output = TaskType;

    fn bitor(self, rhs: TaskType) -> TaskType {
        TaskType(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for TaskType {
    fn bitor_assign(&mut self, rhs: TaskType) {
        self.0 |= rhs.0;
    }
}

impl core::fmt::Display for TaskType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        const NAMES: [(TaskType, &str); 6] = [
            (TaskType::EXTERIOR, "exterior"),
            (TaskType::INTERIOR, "interior"),
            (TaskType::DRONE, "drone"),
            (TaskType::FLOOR_PLAN, "floor_plan"),
            (TaskType::VIDEO, "video"),
            (TaskType::TWILIGHT, "twilight"),
        ];

        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Task status lifecycle.
///
/// `Pending → Scheduled → InProgress → Done`, with `Cancelled` reachable from
/// any state before `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Scheduled,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }

    /// Whether a direct move to `to` is permitted.
    pub fn can_transition(self, to: TaskStatus) -> bool {
        use TaskStatus::*;

        match (self, to) {
            (Pending, Scheduled) => true,
            (Scheduled, InProgress) => true,
            (InProgress, Done) => true,
            (Pending | Scheduled | InProgress, Cancelled) => true,
            _ => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize free-text input: trim, and treat blank as unset.
pub(crate) fn normalize_text(text: Option<&str>) -> Option<String> {
    match text {
        Some(t) => {
            let trimmed = t.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    }
}

/// Normalize a price in minor units: non-positive values mean "no price".
pub(crate) fn normalize_price(price: Option<i64>) -> Option<i64> {
    price.filter(|p| *p > 0)
}

/// One unit of work within a shoot order.
///
/// Owned exclusively by its order; mutation happens only through `ShootOrder`
/// operations, which gate on the order's status first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootTask {
    id: TaskId,
    order_id: OrderId,
    task_type: TaskType,
    status: TaskStatus,
    assignee_user_id: Option<UserId>,
    schedule: Option<ScheduleWindow>,
    price: Option<i64>,
    notes: Option<String>,
}

impl ShootTask {
    /// Create a new pending task for an order.
    ///
    /// Prices `<= 0` normalize to "no price"; blank notes normalize to none.
    pub(crate) fn new(
        order_id: OrderId,
        task_type: TaskType,
        notes: Option<&str>,
        price: Option<i64>,
    ) -> DomainResult<Self> {
        if task_type.is_empty() {
            return Err(DomainError::validation(
                "task must have at least one task type flag",
            ));
        }
        Ok(Self {
            id: TaskId::new(),
            order_id,
            task_type,
            status: TaskStatus::Pending,
            assignee_user_id: None,
            schedule: None,
            price: normalize_price(price),
            notes: normalize_text(notes),
        })
    }

    pub fn id_typed(&self) -> TaskId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn assignee_user_id(&self) -> Option<UserId> {
        self.assignee_user_id
    }

    pub fn schedule(&self) -> Option<ScheduleWindow> {
        self.schedule
    }

    /// Price in minor units of the order's currency, if the task is priced.
    pub fn price(&self) -> Option<i64> {
        self.price
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub(crate) fn assign(&mut self, user_id: UserId) {
        self.assignee_user_id = Some(user_id);
    }

    pub(crate) fn unassign(&mut self) {
        self.assignee_user_id = None;
    }

    pub(crate) fn set_schedule(
        &mut self,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.schedule = Some(ScheduleWindow::validate(start, end, now)?);
        Ok(())
    }

    pub(crate) fn clear_schedule(&mut self) {
        self.schedule = None;
    }

    pub(crate) fn set_notes(&mut self, notes: Option<&str>) {
        self.notes = normalize_text(notes);
    }

    pub(crate) fn transition(&mut self, to: TaskStatus) -> DomainResult<()> {
        if !self.status.can_transition(to) {
            return Err(DomainError::invalid_transition(format!(
                "task cannot move from {} to {}",
                self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for ShootTask {
    type Id = TaskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
