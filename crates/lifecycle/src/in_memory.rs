//! In-memory order repository.
//!
//! Intended for tests/dev. The version check and the replace happen under one
//! write lock, which gives the same atomicity a transactional store would.

use std::collections::HashMap;
use std::sync::RwLock;

use shootflow_core::{AggregateRoot, ExpectedVersion, OrderId};
use shootflow_orders::ShootOrder;

use crate::repository::{OrderRepository, RepositoryError};

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, ShootOrder>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders (test helper).
    pub fn len(&self) -> usize {
        self.orders.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn load(&self, order_id: OrderId) -> Result<Option<ShootOrder>, RepositoryError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        Ok(orders.get(&order_id).cloned())
    }

    fn save(&self, order: &ShootOrder, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;

        // An absent aggregate counts as version 0 (fresh insert).
        let current = orders
            .get(&order.id_typed())
            .map(|o| o.version())
            .unwrap_or(0);

        if !expected.matches(current) {
            return Err(RepositoryError::Conflict(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        orders.insert(order.id_typed(), order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shootflow_core::{AgencyId, ListingId, UserId};
    use shootflow_orders::PlaceOrder;

    fn place() -> ShootOrder {
        ShootOrder::place(
            PlaceOrder {
                agency_id: AgencyId::new(),
                studio_id: None,
                listing_id: ListingId::new(),
                title: "Test shoot".to_string(),
                currency: None,
                created_by: UserId::new(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn save_and_load_round_trip() {
        let repo = InMemoryOrderRepository::new();
        let order = place();

        repo.save(&order, ExpectedVersion::Exact(0)).unwrap();
        let loaded = repo.load(order.id_typed()).unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[test]
    fn load_of_unknown_id_is_none() {
        let repo = InMemoryOrderRepository::new();
        assert_eq!(repo.load(OrderId::new()).unwrap(), None);
    }

    #[test]
    fn stale_save_is_rejected_and_leaves_store_unchanged() {
        let repo = InMemoryOrderRepository::new();
        let order = place();
        repo.save(&order, ExpectedVersion::Exact(0)).unwrap();

        // Two writers load the same version-1 aggregate.
        let mut a = repo.load(order.id_typed()).unwrap().unwrap();
        let mut b = repo.load(order.id_typed()).unwrap().unwrap();

        a.accept(Utc::now()).unwrap();
        repo.save(&a, ExpectedVersion::Exact(1)).unwrap();

        // The second writer's copy is now stale; its commit must not win.
        b.cancel(None, Utc::now()).unwrap();
        let err = repo.save(&b, ExpectedVersion::Exact(1)).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let loaded = repo.load(order.id_typed()).unwrap().unwrap();
        assert_eq!(loaded, a);
    }
}
