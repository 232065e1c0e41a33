//! Orchestration boundary for the shoot order lifecycle.
//!
//! This crate owns no business rules. It loads the aggregate through the
//! [`repository::OrderRepository`] port, invokes exactly one aggregate
//! operation per request, and commits the result atomically.

pub mod in_memory;
pub mod repository;
pub mod service;
pub mod view;

pub use in_memory::InMemoryOrderRepository;
pub use repository::{OrderRepository, RepositoryError};
pub use service::{LifecycleError, LifecycleService, PlaceOrderRequest};
pub use view::{OrderView, TaskView};

#[cfg(test)]
mod integration_tests;
