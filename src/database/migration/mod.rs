use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250301_000001_create_customers_table;
mod m20250301_000002_create_services_table;
mod m20250301_000003_create_purchases_table;
mod m20250301_000004_create_payments_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_customers_table::Migration),
            Box::new(m20250301_000002_create_services_table::Migration),
            Box::new(m20250301_000003_create_purchases_table::Migration),
            Box::new(m20250301_000004_create_payments_table::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Customers {
    Table,
    Id,
    Name,
    Email,
    AccountStatus,
}

#[derive(Iden)]
pub enum Services {
    Table,
    Id,
    Name,
    ServiceType,
    BasePrice,
    IsRecurring,
    BillingCycle,
}

#[derive(Iden)]
pub enum Purchases {
    Table,
    Id,
    CustomerId,
    ServiceId,
    StartDate,
    EndDate,
    Status,
}

#[derive(Iden)]
pub enum Payments {
    Table,
    Id,
    CustomerId,
    PurchaseId,
    Amount,
    Currency,
    PaymentMethod,
    Status,
    Timestamp,
}
