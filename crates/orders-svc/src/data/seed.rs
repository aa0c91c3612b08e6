//! Demo data: an admin who may read everyone's orders and two ordinary users.

use common::ServiceError;
use fieldsec::{Permission, Principal};
use tracing::info;

use super::{OrderService, UserDirectory};

/// Principals created by [`seed_demo_data`].
#[derive(Debug, Clone)]
pub struct DemoPrincipals {
    pub admin: Principal,
    pub user1: Principal,
    pub user2: Principal,
}

/// Register the demo principals and one order for each ordinary user.
///
/// Principal ids are random per process; callers log them so they can be used
/// in the identity header.
pub fn seed_demo_data(
    users: &UserDirectory,
    orders: &OrderService,
) -> Result<DemoPrincipals, ServiceError> {
    let admin = users.register(
        "admin@example.com",
        [
            Permission::BasicPrivileges,
            Permission::ManageProducts,
            Permission::ViewOrdersForOthers,
        ],
        None,
    )?;
    let user1 = users.register(
        "user1@example.com",
        [Permission::BasicPrivileges],
        Some("123-45-6789"),
    )?;
    let user2 = users.register(
        "user2@example.com",
        [Permission::BasicPrivileges],
        Some("987-65-4321"),
    )?;

    orders.create(&user1, "Blue widget".into(), "1 First Ave")?;
    orders.create(&user2, "Red widget".into(), "2 Second St")?;

    info!("demo data seeded");
    Ok(DemoPrincipals { admin, user1, user2 })
}
