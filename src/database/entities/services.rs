use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category a service belongs to; the grouping key of service statistics
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[sea_orm(num_value = 1)]
    Internet,
    #[sea_orm(num_value = 2)]
    Mobile,
    #[sea_orm(num_value = 3)]
    OneOff,
    #[sea_orm(num_value = 4)]
    Tv,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Internet => "internet",
            ServiceType::Mobile => "mobile",
            ServiceType::OneOff => "one_off",
            ServiceType::Tv => "tv",
        }
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
pub enum BillingCycle {
    #[sea_orm(num_value = 1)]
    Monthly,
    #[sea_orm(num_value = 2)]
    Yearly,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Service)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub service_type: ServiceType,
    pub base_price: f64,
    pub is_recurring: bool,
    pub billing_cycle: Option<BillingCycle>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchases::Entity")]
    Purchases,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create a one-off service; use [`Model::recurring`] for subscriptions
    pub fn new(name: impl Into<String>, service_type: ServiceType, base_price: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            service_type,
            base_price,
            is_recurring: false,
            billing_cycle: None,
        }
    }

    /// Builder method to mark the service as recurring with the given cycle
    pub fn recurring(mut self, billing_cycle: BillingCycle) -> Self {
        self.is_recurring = true;
        self.billing_cycle = Some(billing_cycle);
        self
    }
}
