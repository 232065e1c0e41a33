//! Aggregate root: `ShootOrder`.
//!
//! All mutation happens through the aggregate's own operations. Each
//! operation validates against the current status first, applies its whole
//! effect in memory, and bumps the aggregate version; no operation can leave
//! the order in an inconsistent intermediate state. `now` is always passed in
//! so decisions stay deterministic under test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shootflow_core::{
    AgencyId, AggregateRoot, DomainError, DomainResult, ListingId, OrderId, PhotographerId,
    StudioId, TaskId, UserId,
};

use crate::currency::Currency;
use crate::schedule::ScheduleWindow;
use crate::status::{OrderStatus, StatusChange, next_status};
use crate::task::{ShootTask, TaskStatus, TaskType, normalize_text};

/// Input for the `place` factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub agency_id: AgencyId,
    /// Unset means an unclaimed marketplace order.
    pub studio_id: Option<StudioId>,
    pub listing_id: ListingId,
    pub title: String,
    /// 3-letter ISO code; defaults to AUD when unset.
    pub currency: Option<String>,
    pub created_by: UserId,
}

/// Aggregate root: one agency's photography order against one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootOrder {
    id: OrderId,
    agency_id: AgencyId,
    studio_id: Option<StudioId>,
    listing_id: ListingId,
    assigned_photographer_id: Option<PhotographerId>,
    title: String,
    currency: Currency,
    /// Derived: sum of task prices in minor units. Never set directly.
    total_amount: i64,
    status: OrderStatus,
    created_by: UserId,
    cancellation_reason: Option<String>,
    schedule: Option<ScheduleWindow>,
    scheduling_notes: Option<String>,
    tasks: Vec<ShootTask>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl ShootOrder {
    /// Place a new order: status `Placed`, no tasks, total 0.
    pub fn place(cmd: PlaceOrder, now: DateTime<Utc>) -> DomainResult<Self> {
        let title = cmd.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        let currency = match cmd.currency.as_deref() {
            Some(code) => Currency::parse(code)?,
            None => Currency::default(),
        };

        Ok(Self {
            id: OrderId::new(),
            agency_id: cmd.agency_id,
            studio_id: cmd.studio_id,
            listing_id: cmd.listing_id,
            assigned_photographer_id: None,
            title: title.to_string(),
            currency,
            total_amount: 0,
            status: OrderStatus::Placed,
            created_by: cmd.created_by,
            cancellation_reason: None,
            schedule: None,
            scheduling_notes: None,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn agency_id(&self) -> AgencyId {
        self.agency_id
    }

    pub fn studio_id(&self) -> Option<StudioId> {
        self.studio_id
    }

    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    pub fn assigned_photographer_id(&self) -> Option<PhotographerId> {
        self.assigned_photographer_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Sum of all priced tasks, in minor units of the order's currency.
    pub fn total_amount(&self) -> i64 {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn schedule(&self) -> Option<ScheduleWindow> {
        self.schedule
    }

    pub fn scheduling_notes(&self) -> Option<&str> {
        self.scheduling_notes.as_deref()
    }

    pub fn tasks(&self) -> &[ShootTask] {
        &self.tasks
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Final orders (`Completed` / `Cancelled`) permit no further mutation.
    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }

    // ---- task ledger ----

    /// Append a new task and recompute the total.
    pub fn add_task(
        &mut self,
        task_type: TaskType,
        notes: Option<&str>,
        price: Option<i64>,
        now: DateTime<Utc>,
    ) -> DomainResult<TaskId> {
        self.ensure_mutable()?;
        let task = ShootTask::new(self.id, task_type, notes, price)?;
        // Check the prospective total before committing the task, so a
        // rejected add leaves the ledger untouched.
        let new_total = Self::summed_prices(self.tasks.iter().chain(core::iter::once(&task)))?;
        let task_id = task.id_typed();
        self.tasks.push(task);
        self.total_amount = new_total;
        self.touch(now);
        Ok(task_id)
    }

    /// Remove a task by id and recompute the total.
    pub fn remove_task(&mut self, task_id: TaskId, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id_typed() == task_id)
            .ok_or(DomainError::NotFound)?;
        self.tasks.remove(idx);
        self.total_amount = Self::summed_prices(self.tasks.iter())?;
        self.touch(now);
        Ok(())
    }

    /// Drop every task; total goes back to 0.
    pub fn clear_tasks(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.tasks.clear();
        self.total_amount = Self::summed_prices(self.tasks.iter())?;
        self.touch(now);
        Ok(())
    }

    // ---- status machine ----

    pub fn accept(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.apply_change(StatusChange::Accept, now)
    }

    pub fn mark_scheduled(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.apply_change(StatusChange::MarkScheduled, now)
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.apply_change(StatusChange::Start, now)
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.apply_change(StatusChange::Complete, now)
    }

    /// Cancel the order, storing an optional trimmed reason.
    ///
    /// Cancelling an already cancelled order is a no-op (the original reason
    /// is kept); cancelling a completed order fails.
    pub fn cancel(&mut self, reason: Option<&str>, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == OrderStatus::Cancelled {
            return Ok(());
        }
        self.status = next_status(self.status, StatusChange::Cancel, self.tasks.len())?;
        self.cancellation_reason = normalize_text(reason);
        self.touch(now);
        Ok(())
    }

    // ---- photographer assignment ----

    pub fn assign_photographer(
        &mut self,
        photographer_id: PhotographerId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.assigned_photographer_id = Some(photographer_id);
        self.touch(now);
        Ok(())
    }

    pub fn unassign_photographer(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.assigned_photographer_id = None;
        self.touch(now);
        Ok(())
    }

    // ---- order-level schedule ----

    /// Set the order-level schedule window and notes.
    pub fn set_schedule(
        &mut self,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.schedule = Some(ScheduleWindow::validate(start, end, now)?);
        self.scheduling_notes = normalize_text(notes);
        self.touch(now);
        Ok(())
    }

    /// Clear the schedule window and notes together.
    pub fn clear_schedule(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.schedule = None;
        self.scheduling_notes = None;
        self.touch(now);
        Ok(())
    }

    // ---- task-level operations (reached only through the order) ----

    pub fn assign_task(
        &mut self,
        task_id: TaskId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.task_mut(task_id)?.assign(user_id);
        self.touch(now);
        Ok(())
    }

    pub fn unassign_task(&mut self, task_id: TaskId, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.task_mut(task_id)?.unassign();
        self.touch(now);
        Ok(())
    }

    /// Task-level schedule, independent of the order-level window but
    /// validated by the same policy.
    pub fn set_task_schedule(
        &mut self,
        task_id: TaskId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.task_mut(task_id)?.set_schedule(start, end, now)?;
        self.touch(now);
        Ok(())
    }

    pub fn clear_task_schedule(&mut self, task_id: TaskId, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.task_mut(task_id)?.clear_schedule();
        self.touch(now);
        Ok(())
    }

    pub fn update_task_notes(
        &mut self,
        task_id: TaskId,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.task_mut(task_id)?.set_notes(notes);
        self.touch(now);
        Ok(())
    }

    /// Move a task through its own small lifecycle.
    pub fn set_task_status(
        &mut self,
        task_id: TaskId,
        to: TaskStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.task_mut(task_id)?.transition(to)?;
        self.touch(now);
        Ok(())
    }

    // ---- internals ----

    fn apply_change(&mut self, change: StatusChange, now: DateTime<Utc>) -> DomainResult<()> {
        self.status = next_status(self.status, change, self.tasks.len())?;
        self.touch(now);
        Ok(())
    }

    fn ensure_mutable(&self) -> DomainResult<()> {
        if self.is_final() {
            return Err(DomainError::invalid_transition(format!(
                "order is {}; no further changes permitted",
                self.status
            )));
        }
        Ok(())
    }

    fn task_mut(&mut self, task_id: TaskId) -> DomainResult<&mut ShootTask> {
        self.tasks
            .iter_mut()
            .find(|t| t.id_typed() == task_id)
            .ok_or(DomainError::NotFound)
    }

    /// Full re-sum over task prices, accumulated in `i128` so valid `i64`
    /// prices cannot overflow mid-sum. Deliberately not incremental so the
    /// total can never drift from the ledger.
    fn summed_prices<'a>(tasks: impl Iterator<Item = &'a ShootTask>) -> DomainResult<i64> {
        let total: i128 = tasks.filter_map(|t| t.price()).map(i128::from).sum();
        i64::try_from(total).map_err(|_| {
            DomainError::validation("order total exceeds the maximum representable amount")
        })
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }
}

impl AggregateRoot for ShootOrder {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
