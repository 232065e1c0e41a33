//! Cross-component tests: service + repository working together.

use std::sync::{Arc, Mutex, atomic::AtomicBool, atomic::Ordering};

use chrono::{Duration, Utc};

use shootflow_core::{AgencyId, ExpectedVersion, ListingId, OrderId, PhotographerId, UserId};
use shootflow_orders::{OrderStatus, ShootOrder, TaskStatus, TaskType};

use crate::in_memory::InMemoryOrderRepository;
use crate::repository::{OrderRepository, RepositoryError};
use crate::service::{LifecycleError, LifecycleService, PlaceOrderRequest};

fn place_request() -> PlaceOrderRequest {
    PlaceOrderRequest {
        agency_id: AgencyId::new(),
        studio_id: None,
        listing_id: ListingId::new(),
        title: "12 Harbour St listing shoot".to_string(),
        currency: None,
        created_by: UserId::new(),
    }
}

fn service() -> LifecycleService<Arc<InMemoryOrderRepository>> {
    LifecycleService::new(Arc::new(InMemoryOrderRepository::new()))
}

#[test]
fn full_lifecycle_happy_path() {
    let service = service();

    let placed = service.place_order(place_request()).unwrap();
    assert_eq!(placed.status, OrderStatus::Placed);
    assert_eq!(placed.total_amount, 0);
    assert!(placed.tasks.is_empty());

    let order_id = placed.id;
    service.accept(order_id).unwrap();

    let view = service
        .add_task(
            order_id,
            TaskType::EXTERIOR | TaskType::DRONE,
            Some("include backyard"),
            Some(25_000),
        )
        .unwrap();
    assert_eq!(view.total_amount, 25_000);
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].notes.as_deref(), Some("include backyard"));

    let start = Utc::now() + Duration::days(2);
    let view = service
        .set_schedule(order_id, start, Some(start + Duration::hours(3)), None)
        .unwrap();
    assert_eq!(view.scheduled_start_utc, Some(start));

    let view = service.mark_scheduled(order_id).unwrap();
    assert_eq!(view.status, OrderStatus::Scheduled);

    let photographer = PhotographerId::new();
    let view = service.assign_photographer(order_id, photographer).unwrap();
    assert_eq!(view.assigned_photographer_id, Some(photographer));

    let view = service.start(order_id).unwrap();
    assert_eq!(view.status, OrderStatus::InProgress);

    let view = service.complete(order_id).unwrap();
    assert_eq!(view.status, OrderStatus::Completed);

    // Nothing mutates past completion; the stored view stays stable.
    let err = service
        .add_task(order_id, TaskType::INTERIOR, None, Some(100))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidTransition(_)));
    assert_eq!(service.get_order(order_id).unwrap(), view);
}

#[test]
fn task_level_operations_through_the_service() {
    let service = service();
    let order_id = service.place_order(place_request()).unwrap().id;

    let view = service
        .add_task(order_id, TaskType::FLOOR_PLAN, None, Some(8_000))
        .unwrap();
    let task_id = view.tasks[0].id;

    let assignee = UserId::new();
    let view = service.assign_task(order_id, task_id, assignee).unwrap();
    assert_eq!(view.tasks[0].assignee_user_id, Some(assignee));

    let start = Utc::now() + Duration::hours(6);
    let view = service
        .set_task_schedule(order_id, task_id, start, None)
        .unwrap();
    assert_eq!(view.tasks[0].scheduled_start_utc, Some(start));

    let view = service
        .set_task_status(order_id, task_id, TaskStatus::Scheduled)
        .unwrap();
    assert_eq!(view.tasks[0].status, TaskStatus::Scheduled);

    let view = service
        .update_task_notes(order_id, task_id, Some("  north-facing  "))
        .unwrap();
    assert_eq!(view.tasks[0].notes.as_deref(), Some("north-facing"));

    let view = service.clear_task_schedule(order_id, task_id).unwrap();
    assert_eq!(view.tasks[0].scheduled_start_utc, None);

    let view = service.unassign_task(order_id, task_id).unwrap();
    assert_eq!(view.tasks[0].assignee_user_id, None);

    let err = service
        .remove_task(order_id, shootflow_core::TaskId::new())
        .unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound));
}

#[test]
fn cancel_through_the_service_is_idempotent() {
    let service = service();
    let order_id = service.place_order(place_request()).unwrap().id;
    service.accept(order_id).unwrap();

    let first = service.cancel(order_id, Some("client withdrew")).unwrap();
    assert_eq!(first.status, OrderStatus::Cancelled);
    assert_eq!(first.cancellation_reason.as_deref(), Some("client withdrew"));

    let second = service.cancel(order_id, None).unwrap();
    assert_eq!(second.status, OrderStatus::Cancelled);
    assert_eq!(second.cancellation_reason.as_deref(), Some("client withdrew"));
    assert_eq!(second.version, first.version);
}

#[test]
fn unknown_order_id_is_not_found() {
    let service = service();
    let missing = OrderId::new();

    assert!(matches!(
        service.get_order(missing).unwrap_err(),
        LifecycleError::NotFound
    ));
    assert!(matches!(
        service.accept(missing).unwrap_err(),
        LifecycleError::NotFound
    ));
}

#[test]
fn invalid_place_input_is_a_validation_error() {
    let service = service();

    let mut request = place_request();
    request.title = "   ".to_string();
    assert!(matches!(
        service.place_order(request).unwrap_err(),
        LifecycleError::Validation(_)
    ));

    let mut request = place_request();
    request.currency = Some("dollars".to_string());
    assert!(matches!(
        service.place_order(request).unwrap_err(),
        LifecycleError::Validation(_)
    ));
}

/// Repository wrapper that keeps serving the snapshot taken at arm time,
/// simulating two callers whose reads both happened before either write.
struct StaleReadRepository {
    inner: InMemoryOrderRepository,
    stale: Mutex<Option<ShootOrder>>,
}

impl StaleReadRepository {
    fn new() -> Self {
        Self {
            inner: InMemoryOrderRepository::new(),
            stale: Mutex::new(None),
        }
    }

    fn arm(&self, order_id: OrderId) {
        let snapshot = self.inner.load(order_id).unwrap();
        *self.stale.lock().unwrap() = snapshot;
    }
}

impl OrderRepository for StaleReadRepository {
    fn load(&self, order_id: OrderId) -> Result<Option<ShootOrder>, RepositoryError> {
        if let Some(snapshot) = self.stale.lock().unwrap().clone() {
            if snapshot.id_typed() == order_id {
                return Ok(Some(snapshot));
            }
        }
        self.inner.load(order_id)
    }

    fn save(&self, order: &ShootOrder, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        self.inner.save(order, expected)
    }
}

#[test]
fn concurrent_add_tasks_against_a_stale_read_cannot_both_commit() {
    let repo = Arc::new(StaleReadRepository::new());
    let service = LifecycleService::new(Arc::clone(&repo));

    let order_id = service.place_order(place_request()).unwrap().id;
    repo.arm(order_id);

    // Both "callers" now observe the same pre-write task list.
    service
        .add_task(order_id, TaskType::EXTERIOR, None, Some(150))
        .unwrap();
    let err = service
        .add_task(order_id, TaskType::INTERIOR, None, Some(200))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Conflict(_)));

    // Exactly one task made it in.
    let stored = repo.inner.load(order_id).unwrap().unwrap();
    assert_eq!(stored.tasks().len(), 1);
    assert_eq!(stored.total_amount(), 150);
}

/// Repository wrapper whose saves can be switched to fail, for asserting the
/// all-or-nothing commit contract.
struct FailingSaveRepository {
    inner: InMemoryOrderRepository,
    fail_saves: AtomicBool,
}

impl FailingSaveRepository {
    fn new() -> Self {
        Self {
            inner: InMemoryOrderRepository::new(),
            fail_saves: AtomicBool::new(false),
        }
    }
}

impl OrderRepository for FailingSaveRepository {
    fn load(&self, order_id: OrderId) -> Result<Option<ShootOrder>, RepositoryError> {
        self.inner.load(order_id)
    }

    fn save(&self, order: &ShootOrder, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("disk on fire".to_string()));
        }
        self.inner.save(order, expected)
    }
}

#[test]
fn failed_commit_leaves_no_partial_changes_visible() {
    let repo = Arc::new(FailingSaveRepository::new());
    let service = LifecycleService::new(Arc::clone(&repo));

    let placed = service.place_order(place_request()).unwrap();
    let order_id = placed.id;

    repo.fail_saves.store(true, Ordering::SeqCst);
    let err = service
        .add_task(order_id, TaskType::TWILIGHT, None, Some(12_000))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Persistence(_)));

    repo.fail_saves.store(false, Ordering::SeqCst);
    let view = service.get_order(order_id).unwrap();
    assert!(view.tasks.is_empty());
    assert_eq!(view.total_amount, 0);
    assert_eq!(view, placed);
}
