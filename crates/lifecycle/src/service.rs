//! Lifecycle service: the single entry point per use case.
//!
//! Every mutating call follows the same shape: load the aggregate (with its
//! full task collection), invoke exactly one aggregate operation, and save
//! the result with the version observed at load time. A concurrent writer
//! that committed in between makes the save fail with a conflict instead of
//! silently losing their update. The service owns no business rules.

use chrono::{DateTime, Utc};
use tracing::debug;

use shootflow_core::{
    AgencyId, AggregateRoot, DomainError, ExpectedVersion, ListingId, OrderId, PhotographerId,
    StudioId, TaskId, UserId,
};
use shootflow_orders::{PlaceOrder, ShootOrder, TaskStatus, TaskType};

use crate::repository::{OrderRepository, RepositoryError};
use crate::view::OrderView;

/// Error surfaced to callers of the lifecycle service.
///
/// Domain errors pass through unchanged in meaning; only persistence
/// failures originate here.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Malformed or missing input; fix the request and retry.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Operation not permitted in the order's current status.
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),

    /// Referenced order or task does not exist.
    #[error("not found")]
    NotFound,

    /// A concurrent writer got there first; reload and retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The atomic commit failed; nothing was applied.
    #[error("persistence failure: {0}")]
    Persistence(RepositoryError),
}

impl From<DomainError> for LifecycleError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => LifecycleError::Validation(msg),
            DomainError::InvalidId(msg) => LifecycleError::Validation(msg),
            DomainError::InvalidTransition(msg) => LifecycleError::InvalidTransition(msg),
            DomainError::NotFound => LifecycleError::NotFound,
            DomainError::Conflict(msg) => LifecycleError::Conflict(msg),
        }
    }
}

impl From<RepositoryError> for LifecycleError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(msg) => LifecycleError::Conflict(msg),
            RepositoryError::Storage(_) => LifecycleError::Persistence(value),
        }
    }
}

/// Input for [`LifecycleService::place_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrderRequest {
    pub agency_id: AgencyId,
    pub studio_id: Option<StudioId>,
    pub listing_id: ListingId,
    pub title: String,
    pub currency: Option<String>,
    pub created_by: UserId,
}

/// Load/invoke/commit shell around the `ShootOrder` aggregate.
#[derive(Debug)]
pub struct LifecycleService<R> {
    repo: R,
}

impl<R> LifecycleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: OrderRepository> LifecycleService<R> {
    /// Place a new order.
    pub fn place_order(&self, request: PlaceOrderRequest) -> Result<OrderView, LifecycleError> {
        let now = Utc::now();
        let order = ShootOrder::place(
            PlaceOrder {
                agency_id: request.agency_id,
                studio_id: request.studio_id,
                listing_id: request.listing_id,
                title: request.title,
                currency: request.currency,
                created_by: request.created_by,
            },
            now,
        )?;

        // A fresh aggregate must not overwrite an existing one.
        self.repo.save(&order, ExpectedVersion::Exact(0))?;
        debug!(order_id = %order.id_typed(), "order placed");
        Ok(OrderView::from(&order))
    }

    /// Read-only fetch.
    pub fn get_order(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        let order = self.repo.load(order_id)?.ok_or(LifecycleError::NotFound)?;
        Ok(OrderView::from(&order))
    }

    pub fn add_task(
        &self,
        order_id: OrderId,
        task_type: TaskType,
        notes: Option<&str>,
        price: Option<i64>,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.add_task(task_type, notes, price, now).map(|_| ())
        })
    }

    pub fn remove_task(
        &self,
        order_id: OrderId,
        task_id: TaskId,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.remove_task(task_id, now))
    }

    pub fn clear_tasks(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.clear_tasks(now))
    }

    pub fn accept(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.accept(now))
    }

    pub fn mark_scheduled(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.mark_scheduled(now))
    }

    pub fn start(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.start(now))
    }

    pub fn complete(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.complete(now))
    }

    pub fn cancel(
        &self,
        order_id: OrderId,
        reason: Option<&str>,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.cancel(reason, now))
    }

    pub fn assign_photographer(
        &self,
        order_id: OrderId,
        photographer_id: PhotographerId,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.assign_photographer(photographer_id, now)
        })
    }

    pub fn unassign_photographer(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.unassign_photographer(now))
    }

    pub fn set_schedule(
        &self,
        order_id: OrderId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        notes: Option<&str>,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.set_schedule(start, end, notes, now)
        })
    }

    pub fn clear_schedule(&self, order_id: OrderId) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.clear_schedule(now))
    }

    pub fn assign_task(
        &self,
        order_id: OrderId,
        task_id: TaskId,
        user_id: UserId,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.assign_task(task_id, user_id, now)
        })
    }

    pub fn unassign_task(
        &self,
        order_id: OrderId,
        task_id: TaskId,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| order.unassign_task(task_id, now))
    }

    pub fn set_task_schedule(
        &self,
        order_id: OrderId,
        task_id: TaskId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.set_task_schedule(task_id, start, end, now)
        })
    }

    pub fn clear_task_schedule(
        &self,
        order_id: OrderId,
        task_id: TaskId,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.clear_task_schedule(task_id, now)
        })
    }

    pub fn update_task_notes(
        &self,
        order_id: OrderId,
        task_id: TaskId,
        notes: Option<&str>,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.update_task_notes(task_id, notes, now)
        })
    }

    pub fn set_task_status(
        &self,
        order_id: OrderId,
        task_id: TaskId,
        to: TaskStatus,
    ) -> Result<OrderView, LifecycleError> {
        self.update(order_id, |order, now| {
            order.set_task_status(task_id, to, now)
        })
    }

    /// Load → invoke exactly one aggregate operation → commit.
    ///
    /// The save is conditional on the version observed at load time, so two
    /// callers racing on the same order cannot both commit against a stale
    /// read of the task list.
    fn update(
        &self,
        order_id: OrderId,
        op: impl FnOnce(&mut ShootOrder, DateTime<Utc>) -> Result<(), DomainError>,
    ) -> Result<OrderView, LifecycleError> {
        let mut order = self.repo.load(order_id)?.ok_or(LifecycleError::NotFound)?;
        let loaded_version = order.version();

        op(&mut order, Utc::now())?;

        self.repo.save(&order, ExpectedVersion::Exact(loaded_version))?;
        debug!(
            order_id = %order_id,
            status = %order.status(),
            version = order.version(),
            "order state committed"
        );
        Ok(OrderView::from(&order))
    }
}
