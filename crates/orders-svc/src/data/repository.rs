//! Raw order storage. Private to the data layer: nothing here checks access.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use fieldsec::{EncryptedString, PrincipalId};

use super::orders::Order;

/// Unchecked order storage.
#[cfg_attr(test, mockall::automock)]
pub trait OrderRepository: Send + Sync {
    /// Fetch one order by id, without any access check.
    fn find(&self, id: u64) -> Option<Order>;

    /// Every stored order, in id order.
    fn all(&self) -> Vec<Order>;

    /// Persist a new order and return it with its assigned id.
    fn insert(&self, owner_id: PrincipalId, item: String, shipping_address: EncryptedString) -> Order;
}

/// In-memory repository standing in for a database table.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    rows: RwLock<BTreeMap<u64, Order>>,
}

impl OrderRepository for InMemoryOrderRepository {
    fn find(&self, id: u64) -> Option<Order> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<Order> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.values().cloned().collect()
    }

    fn insert(&self, owner_id: PrincipalId, item: String, shipping_address: EncryptedString) -> Order {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let id = rows.keys().next_back().map_or(1, |last| last + 1);
        let order = Order {
            id,
            owner_id,
            item,
            shipping_address,
        };
        rows.insert(id, order.clone());
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_assigned_sequentially() {
        let repo = InMemoryOrderRepository::default();
        let owner = PrincipalId::new_v4();
        let a = repo.insert(owner, "a".into(), EncryptedString::from_stored("x"));
        let b = repo.insert(owner, "b".into(), EncryptedString::from_stored("y"));
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.find(2).unwrap().item, "b");
        assert!(repo.find(3).is_none());
        assert_eq!(repo.all().len(), 2);
    }
}
