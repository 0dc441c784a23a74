use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(num_value = 1)]
    #[default]
    Pending,
    #[sea_orm(num_value = 2)]
    Completed,
    #[sea_orm(num_value = 3)]
    Failed,
    #[sea_orm(num_value = 4)]
    Refunded,
}

impl PaymentStatus {
    /// Only completed payments count towards the success rate
    pub fn is_successful(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(num_value = 1)]
    CreditCard,
    #[sea_orm(num_value = 2)]
    BankTransfer,
    #[sea_orm(num_value = 3)]
    MobilePayment,
    #[sea_orm(num_value = 4)]
    CashPayment,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[sea_orm(num_value = 1)]
    Eur,
    #[sea_orm(num_value = 2)]
    #[default]
    Bgn,
    #[sea_orm(num_value = 3)]
    Usd,
    #[sea_orm(num_value = 4)]
    Gbp,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Payment)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub purchase_id: i32,
    pub amount: f64,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::purchases::Entity",
        from = "Column::PurchaseId",
        to = "super::purchases::Column::Id"
    )]
    Purchase,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create a pending payment in the default currency
    pub fn new(
        customer_id: i32,
        purchase_id: i32,
        amount: f64,
        payment_method: PaymentMethod,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            customer_id,
            purchase_id,
            amount,
            currency: Currency::default(),
            payment_method,
            status: PaymentStatus::default(),
            timestamp,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}
