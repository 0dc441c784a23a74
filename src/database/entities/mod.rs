pub mod customers;
pub mod payments;
pub mod purchases;
pub mod services;

pub use customers::Entity as Customers;
pub use payments::Entity as Payments;
pub use purchases::Entity as Purchases;
pub use services::Entity as Services;

pub use customers::AccountStatus;
pub use payments::{Currency, PaymentMethod, PaymentStatus};
pub use purchases::PurchaseStatus;
pub use services::{BillingCycle, ServiceType};

// Type aliases
pub type CustomerRecord = customers::Model;
pub type ServiceRecord = services::Model;
pub type PurchaseRecord = purchases::Model;
pub type PaymentRecord = payments::Model;
