//! Storage port for the shoot order aggregate.
//!
//! The aggregate must not know how it is loaded or saved; this narrow port is
//! what any storage technology implements. A save covers the whole aggregate
//! — scalar fields **and** the task collection — as one atomic unit.

use thiserror::Error;

use shootflow_core::{ExpectedVersion, OrderId};
use shootflow_orders::ShootOrder;

/// Repository operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, illegal transitions).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Optimistic concurrency check failed (stored version differs from the
    /// version the caller loaded).
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    /// The underlying store failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Load/save port for `ShootOrder` aggregates.
///
/// Contract:
/// - `load` returns the aggregate together with its **full** task collection
///   in one consistent read, or `None` if the id is unknown;
/// - `save` persists the whole aggregate atomically, but only if the stored
///   version still matches `expected` (an absent aggregate counts as version
///   0). On a mismatch it fails with [`RepositoryError::Conflict`] and leaves
///   the stored state untouched. Partial writes are never visible.
pub trait OrderRepository: Send + Sync {
    fn load(&self, order_id: OrderId) -> Result<Option<ShootOrder>, RepositoryError>;

    fn save(&self, order: &ShootOrder, expected: ExpectedVersion) -> Result<(), RepositoryError>;
}

impl<R: OrderRepository + ?Sized> OrderRepository for std::sync::Arc<R> {
    fn load(&self, order_id: OrderId) -> Result<Option<ShootOrder>, RepositoryError> {
        (**self).load(order_id)
    }

    fn save(&self, order: &ShootOrder, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).save(order, expected)
    }
}
