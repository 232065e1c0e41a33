//! Shoot Orders domain module.
//!
//! This crate contains the business rules for photography shoot orders,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). The `ShootOrder` aggregate owns its task collection outright;
//! tasks are never addressable outside their order.

pub mod currency;
pub mod order;
pub mod schedule;
pub mod status;
pub mod task;

pub use currency::Currency;
pub use order::{PlaceOrder, ShootOrder};
pub use schedule::{SCHEDULING_GRACE_SECONDS, ScheduleWindow, scheduling_grace};
pub use status::{OrderStatus, StatusChange, next_status};
pub use task::{ShootTask, TaskStatus, TaskType};
