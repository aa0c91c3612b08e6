//! [`OrderService`]: guarded reads and encrypting writes of orders.

use std::sync::Arc;

use common::protocol::OrderResponse;
use common::ServiceError;
use fieldsec::access::{can_view, filter_visible, AccessDenied, Decision, OwnedRecord, RecordRef};
use fieldsec::{EncryptedString, FieldCipher, Permission, Principal, PrincipalId};
use tracing::{debug, info, warn};

use super::repository::{InMemoryOrderRepository, OrderRepository};
use super::{ensure_plaintext, open_failure, seal_failure};

/// Permission that lets a principal read orders it does not own.
pub const VIEW_OVERRIDE: Permission = Permission::ViewOrdersForOthers;

/// An order as stored: the shipping address is ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: u64,
    pub owner_id: PrincipalId,
    pub item: String,
    pub shipping_address: EncryptedString,
}

impl OwnedRecord for Order {
    fn record_ref(&self) -> RecordRef {
        RecordRef::new("order", self.id)
    }

    fn owner_id(&self) -> PrincipalId {
        self.owner_id
    }
}

/// An order after access was granted and its fields decrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub id: u64,
    pub owner_id: PrincipalId,
    pub item: String,
    pub shipping_address: String,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        Self {
            id: view.id,
            owner_id: view.owner_id.to_string(),
            item: view.item,
            shipping_address: view.shipping_address,
        }
    }
}

/// Order access for request handlers.
///
/// The repository is private: every read goes through the row guard first.
pub struct OrderService<R = InMemoryOrderRepository> {
    repo: R,
    cipher: Arc<FieldCipher>,
}

impl OrderService<InMemoryOrderRepository> {
    /// Service backed by an empty in-memory table.
    pub fn in_memory(cipher: Arc<FieldCipher>) -> Self {
        Self::new(InMemoryOrderRepository::default(), cipher)
    }
}

impl<R: OrderRepository> OrderService<R> {
    fn new(repo: R, cipher: Arc<FieldCipher>) -> Self {
        Self { repo, cipher }
    }

    /// Fetch one order for `principal`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if no such order exists.
    /// - [`ServiceError::Forbidden`] if `principal` neither owns the order nor
    ///   holds [`VIEW_OVERRIDE`]. Nothing is decrypted in that case.
    /// - [`ServiceError::DataIntegrity`] if a stored field fails to decrypt.
    pub fn get_by_id(&self, id: u64, principal: &Principal) -> Result<OrderView, ServiceError> {
        let order = self
            .repo
            .find(id)
            .ok_or_else(|| ServiceError::NotFound(format!("order #{id}")))?;

        if let Decision::Deny(denial) = can_view(principal, &order, VIEW_OVERRIDE) {
            warn!(
                requester = %denial.requester,
                record = %denial.record,
                permission = ?denial.permission,
                reasons = ?denial.reasons,
                "order access denied"
            );
            return Err(ServiceError::Forbidden(AccessDenied(denial).to_string()));
        }

        self.open(order)
    }

    /// All orders `principal` may view, decrypted. Other rows are dropped silently.
    pub fn list_visible(&self, principal: &Principal) -> Result<Vec<OrderView>, ServiceError> {
        let (visible, denied) = filter_visible(principal, self.repo.all(), VIEW_OVERRIDE);
        debug!(
            requester = %principal.id,
            visible = visible.len(),
            filtered = denied.len(),
            "listed orders"
        );
        visible.into_iter().map(|order| self.open(order)).collect()
    }

    /// Create an order owned by `owner`, encrypting the shipping address before storage.
    ///
    /// # Errors
    ///
    /// [`ServiceError::BadRequest`] if the address already carries the
    /// encrypted value marker.
    pub fn create(
        &self,
        owner: &Principal,
        item: String,
        shipping_address: &str,
    ) -> Result<OrderView, ServiceError> {
        ensure_plaintext("shipping_address", shipping_address)?;
        let sealed = EncryptedString::seal(&self.cipher, shipping_address)
            .map_err(|e| seal_failure("shipping_address", e))?;
        let order = self.repo.insert(owner.id, item, sealed);
        info!(order_id = order.id, owner = %owner.id, "order created");
        Ok(OrderView {
            id: order.id,
            owner_id: order.owner_id,
            item: order.item,
            shipping_address: shipping_address.to_owned(),
        })
    }

    fn open(&self, order: Order) -> Result<OrderView, ServiceError> {
        let shipping_address = order
            .shipping_address
            .open(&self.cipher)
            .map_err(|e| open_failure(&order.record_ref(), "shipping_address", e))?;
        Ok(OrderView {
            id: order.id,
            owner_id: order.owner_id,
            item: order.item,
            shipping_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repository::MockOrderRepository;
    use crate::test_support::test_cipher;

    fn principal(name: &str, permissions: &[Permission]) -> Principal {
        Principal::new(PrincipalId::new_v4(), name, permissions.iter().copied())
    }

    fn stored(cipher: &FieldCipher, id: u64, owner: &Principal, address: &str) -> Order {
        Order {
            id,
            owner_id: owner.id,
            item: "widget".into(),
            shipping_address: EncryptedString::seal(cipher, address).unwrap(),
        }
    }

    #[test]
    fn owner_reads_decrypted_order() {
        let cipher = test_cipher();
        let user1 = principal("user1", &[]);
        let order = stored(&cipher, 1, &user1, "10 Main St");

        let mut repo = MockOrderRepository::new();
        repo.expect_find().withf(|id| *id == 1).return_const(Some(order));

        let svc = OrderService::new(repo, cipher);
        let view = svc.get_by_id(1, &user1).unwrap();
        assert_eq!(view.shipping_address, "10 Main St");
        assert_eq!(view.owner_id, user1.id);
    }

    #[test]
    fn non_owner_is_forbidden() {
        let cipher = test_cipher();
        let user1 = principal("user1", &[]);
        let user2 = principal("user2", &[Permission::BasicPrivileges]);
        let order = stored(&cipher, 1, &user1, "10 Main St");

        let mut repo = MockOrderRepository::new();
        repo.expect_find().return_const(Some(order));

        let svc = OrderService::new(repo, cipher);
        let err = svc.get_by_id(1, &user2).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(ref m) if m.contains("order #1")));
    }

    #[test]
    fn denied_read_never_touches_ciphertext() {
        // A corrupt envelope would fail with DataIntegrity if it were opened.
        let cipher = test_cipher();
        let user1 = principal("user1", &[]);
        let user2 = principal("user2", &[]);
        let order = Order {
            id: 4,
            owner_id: user1.id,
            item: "widget".into(),
            shipping_address: EncryptedString::from_stored("//Encrypted:AAAA"),
        };

        let mut repo = MockOrderRepository::new();
        repo.expect_find().return_const(Some(order));

        let svc = OrderService::new(repo, cipher);
        assert!(matches!(svc.get_by_id(4, &user2), Err(ServiceError::Forbidden(_))));
        assert!(matches!(svc.get_by_id(4, &user1), Err(ServiceError::DataIntegrity(_))));
    }

    #[test]
    fn override_permission_reads_foreign_order() {
        let cipher = test_cipher();
        let user1 = principal("user1", &[]);
        let admin = principal("admin", &[Permission::ViewOrdersForOthers]);
        let order = stored(&cipher, 1, &user1, "10 Main St");

        let mut repo = MockOrderRepository::new();
        repo.expect_find().return_const(Some(order));

        let svc = OrderService::new(repo, cipher);
        assert_eq!(svc.get_by_id(1, &admin).unwrap().shipping_address, "10 Main St");
    }

    #[test]
    fn missing_order_is_not_found() {
        let mut repo = MockOrderRepository::new();
        repo.expect_find().return_const(None);

        let svc = OrderService::new(repo, test_cipher());
        let err = svc.get_by_id(99, &principal("user1", &[])).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn list_filters_per_row() {
        let cipher = test_cipher();
        let user1 = principal("user1", &[]);
        let user2 = principal("user2", &[]);
        let admin = principal("admin", &[Permission::ViewOrdersForOthers]);
        let rows = vec![
            stored(&cipher, 1, &user1, "a"),
            stored(&cipher, 2, &user2, "b"),
            stored(&cipher, 3, &user1, "c"),
        ];

        let mut repo = MockOrderRepository::new();
        repo.expect_all().returning(move || rows.clone());
        let svc = OrderService::new(repo, cipher);

        let mine: Vec<u64> = svc.list_visible(&user1).unwrap().iter().map(|o| o.id).collect();
        assert_eq!(mine, vec![1, 3]);
        assert_eq!(svc.list_visible(&admin).unwrap().len(), 3);
    }

    #[test]
    fn create_stores_ciphertext_only() {
        let cipher = test_cipher();
        let svc = OrderService::in_memory(cipher);
        let user1 = principal("user1", &[]);

        let view = svc.create(&user1, "widget".into(), "123 Secret Ln").unwrap();
        assert_eq!(view.shipping_address, "123 Secret Ln");

        let row = svc.repo.find(view.id).unwrap();
        assert!(row.shipping_address.is_sealed());
        assert!(!row.shipping_address.as_stored().contains("Secret"));
        assert_eq!(svc.get_by_id(view.id, &user1).unwrap(), view);
    }

    #[test]
    fn create_refuses_foreign_ciphertext() {
        let cipher = test_cipher();
        let victim_ssn = cipher.encrypt_field("123-45-6789").unwrap();
        let svc = OrderService::in_memory(cipher);
        let attacker = principal("attacker", &[]);

        let err = svc.create(&attacker, "x".into(), &victim_ssn).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(ref m) if m.contains("shipping_address")));
        assert!(svc.list_visible(&attacker).unwrap().is_empty());
    }

    #[test]
    fn create_refuses_marker_prefixed_junk() {
        let svc = OrderService::in_memory(test_cipher());
        let user1 = principal("user1", &[]);

        let err = svc.create(&user1, "x".into(), "//Encrypted:hello").unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert!(svc.list_visible(&user1).unwrap().is_empty());
    }

    #[test]
    fn marker_inside_address_round_trips() {
        let svc = OrderService::in_memory(test_cipher());
        let user1 = principal("user1", &[]);

        let view = svc.create(&user1, "x".into(), "c/o //Encrypted: Ltd").unwrap();
        assert_eq!(svc.get_by_id(view.id, &user1).unwrap(), view);
    }
}
