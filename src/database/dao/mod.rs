pub mod customers;
pub mod payments;
pub mod purchases;
pub mod services;

pub use customers::CustomersDao;
pub use payments::{CustomerTotals, PaymentsDao, RecentPayment, ServiceTypeTotals};
pub use purchases::{BillablePurchase, PurchasesDao};
pub use services::ServicesDao;

/// Rows per INSERT statement for bulk loads, kept well under SQLite's bind limit
pub const INSERT_BATCH_SIZE: usize = 500;
