//! Serializable snapshots returned to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shootflow_core::{
    AgencyId, AggregateRoot, ListingId, OrderId, PhotographerId, StudioId, TaskId, UserId,
};
use shootflow_orders::{OrderStatus, ShootOrder, ShootTask, TaskStatus, TaskType};

/// Read-only view of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub assignee_user_id: Option<UserId>,
    pub scheduled_start_utc: Option<DateTime<Utc>>,
    pub scheduled_end_utc: Option<DateTime<Utc>>,
    pub price: Option<i64>,
    pub notes: Option<String>,
}

impl From<&ShootTask> for TaskView {
    fn from(task: &ShootTask) -> Self {
        Self {
            id: task.id_typed(),
            task_type: task.task_type(),
            status: task.status(),
            assignee_user_id: task.assignee_user_id(),
            scheduled_start_utc: task.schedule().map(|w| w.start()),
            scheduled_end_utc: task.schedule().and_then(|w| w.end()),
            price: task.price(),
            notes: task.notes().map(str::to_string),
        }
    }
}

/// Read-only view of a full order, tasks included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub agency_id: AgencyId,
    pub studio_id: Option<StudioId>,
    pub listing_id: ListingId,
    pub assigned_photographer_id: Option<PhotographerId>,
    pub title: String,
    pub currency: String,
    /// Derived sum of task prices, minor units.
    pub total_amount: i64,
    pub status: OrderStatus,
    pub created_by: UserId,
    pub cancellation_reason: Option<String>,
    pub scheduled_start_utc: Option<DateTime<Utc>>,
    pub scheduled_end_utc: Option<DateTime<Utc>>,
    pub scheduling_notes: Option<String>,
    pub tasks: Vec<TaskView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl From<&ShootOrder> for OrderView {
    fn from(order: &ShootOrder) -> Self {
        Self {
            id: order.id_typed(),
            agency_id: order.agency_id(),
            studio_id: order.studio_id(),
            listing_id: order.listing_id(),
            assigned_photographer_id: order.assigned_photographer_id(),
            title: order.title().to_string(),
            currency: order.currency().code().to_string(),
            total_amount: order.total_amount(),
            status: order.status(),
            created_by: order.created_by(),
            cancellation_reason: order.cancellation_reason().map(str::to_string),
            scheduled_start_utc: order.schedule().map(|w| w.start()),
            scheduled_end_utc: order.schedule().and_then(|w| w.end()),
            scheduling_notes: order.scheduling_notes().map(str::to_string),
            tasks: order.tasks().iter().map(TaskView::from).collect(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            version: order.version(),
        }
    }
}
