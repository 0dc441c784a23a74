use super::INSERT_BATCH_SIZE;
use crate::database::entities::{
    Currency, PaymentMethod, PaymentRecord, PaymentStatus, ServiceType, customers, payments,
    purchases, services,
};
use crate::database::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveEnum, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    Iterable, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, Set, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A payment joined with the customer who made it and the service it paid for
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
pub struct RecentPayment {
    pub payment_id: i32,
    pub customer_id: i32,
    pub customer_name: String,
    pub service_name: String,
    pub service_type: ServiceType,
    pub amount: f64,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub timestamp: DateTime<Utc>,
}

/// Raw per-service-type sums as returned by the database
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ServiceTypeTotals {
    pub service_type: ServiceType,
    pub total_payments: i64,
    pub total_amount: f64,
    pub successful_payments: i64,
    pub credit_card_payments: i64,
    pub bank_transfer_payments: i64,
    pub mobile_payments: i64,
    pub cash_payments: i64,
}

/// Raw per-customer sums as returned by the database
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct CustomerTotals {
    pub customer_id: i32,
    pub customer_name: String,
    pub total_spent: f64,
    pub payment_count: i64,
}

/// Payments DAO: writes for seeding plus the read-only dashboard aggregations
#[derive(Clone)]
pub struct PaymentsDao {
    db: DatabaseConnection,
}

impl PaymentsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_active_model(payment: &PaymentRecord) -> payments::ActiveModel {
        payments::ActiveModel {
            id: ActiveValue::NotSet,
            customer_id: Set(payment.customer_id),
            purchase_id: Set(payment.purchase_id),
            amount: Set(payment.amount),
            currency: Set(payment.currency),
            payment_method: Set(payment.payment_method),
            status: Set(payment.status),
            timestamp: Set(payment.timestamp),
        }
    }

    fn validate(payment: &PaymentRecord) -> DatabaseResult<()> {
        if payment.amount < 0.0 || !payment.amount.is_finite() {
            return Err(DatabaseError::Constraint(format!(
                "payment amount must be a non-negative number, got {}",
                payment.amount
            )));
        }
        Ok(())
    }

    /// Payments whose customer, purchase and purchased service all exist
    fn well_formed() -> Select<payments::Entity> {
        payments::Entity::find()
            .join(JoinType::InnerJoin, payments::Relation::Customer.def())
            .join(JoinType::InnerJoin, payments::Relation::Purchase.def())
            .join(JoinType::InnerJoin, purchases::Relation::Service.def())
    }

    /// `SUM(CASE WHEN payments.<column> IN (values) THEN 1 ELSE 0 END)`
    fn count_matching(
        column: payments::Column,
        values: impl IntoIterator<Item = i32>,
    ) -> SimpleExpr {
        Func::sum(
            Expr::case(
                Expr::col((payments::Entity, column)).is_in(values),
                Expr::val(1),
            )
            .finally(Expr::val(0)),
        )
        .into()
    }

    /// Insert a payment and return its ID
    pub async fn create(&self, payment: &PaymentRecord) -> DatabaseResult<i32> {
        Self::validate(payment)?;

        let result = payments::Entity::insert(Self::to_active_model(payment))
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.last_insert_id)
    }

    /// Insert payments in batches inside a single transaction.
    /// Nothing is written if any record has a negative amount.
    pub async fn insert_many(&self, records: &[PaymentRecord]) -> DatabaseResult<u64> {
        records.iter().try_for_each(Self::validate)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        for chunk in records.chunks(INSERT_BATCH_SIZE) {
            payments::Entity::insert_many(chunk.iter().map(Self::to_active_model))
                .exec(&txn)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records.len() as u64)
    }

    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<PaymentRecord>> {
        payments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// All payments attributed to a customer, oldest first
    pub async fn find_by_customer(&self, customer_id: i32) -> DatabaseResult<Vec<PaymentRecord>> {
        payments::Entity::find()
            .filter(payments::Column::CustomerId.eq(customer_id))
            .order_by_asc(payments::Column::Timestamp)
            .order_by_asc(payments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn count(&self) -> DatabaseResult<u64> {
        payments::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Number of payments that take part in aggregations
    pub async fn count_well_formed(&self) -> DatabaseResult<u64> {
        Self::well_formed()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Sum of all payment amounts, 0 for an empty table
    pub async fn total_amount(&self) -> DatabaseResult<f64> {
        let total: Option<Option<f64>> = payments::Entity::find()
            .select_only()
            .column_as(payments::Column::Amount.sum(), "total_amount")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(total.flatten().unwrap_or(0.0))
    }

    pub async fn delete_all(&self) -> DatabaseResult<u64> {
        let result = payments::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// The `limit` most recent payments, newest first; equal timestamps
    /// are ordered by payment ID descending
    pub async fn recent_payments(&self, limit: u64) -> DatabaseResult<Vec<RecentPayment>> {
        Self::well_formed()
            .select_only()
            .column_as(payments::Column::Id, "payment_id")
            .column_as(payments::Column::CustomerId, "customer_id")
            .column_as(customers::Column::Name, "customer_name")
            .column_as(services::Column::Name, "service_name")
            .column_as(services::Column::ServiceType, "service_type")
            .column_as(payments::Column::Amount, "amount")
            .column_as(payments::Column::Currency, "currency")
            .column_as(payments::Column::PaymentMethod, "payment_method")
            .column_as(payments::Column::Status, "status")
            .column_as(payments::Column::Timestamp, "timestamp")
            .order_by_desc(payments::Column::Timestamp)
            .order_by_desc(payments::Column::Id)
            .limit(limit)
            .into_model::<RecentPayment>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Payment sums grouped by the service type of each payment's purchase,
    /// ordered by service type
    pub async fn service_type_totals(&self) -> DatabaseResult<Vec<ServiceTypeTotals>> {
        Self::well_formed()
            .select_only()
            .column_as(services::Column::ServiceType, "service_type")
            .column_as(payments::Column::Id.count(), "total_payments")
            .column_as(payments::Column::Amount.sum(), "total_amount")
            .column_as(
                Self::count_matching(
                    payments::Column::Status,
                    PaymentStatus::iter()
                        .filter(PaymentStatus::is_successful)
                        .map(|status| status.to_value()),
                ),
                "successful_payments",
            )
            .column_as(
                Self::count_matching(
                    payments::Column::PaymentMethod,
                    [PaymentMethod::CreditCard.to_value()],
                ),
                "credit_card_payments",
            )
            .column_as(
                Self::count_matching(
                    payments::Column::PaymentMethod,
                    [PaymentMethod::BankTransfer.to_value()],
                ),
                "bank_transfer_payments",
            )
            .column_as(
                Self::count_matching(
                    payments::Column::PaymentMethod,
                    [PaymentMethod::MobilePayment.to_value()],
                ),
                "mobile_payments",
            )
            .column_as(
                Self::count_matching(
                    payments::Column::PaymentMethod,
                    [PaymentMethod::CashPayment.to_value()],
                ),
                "cash_payments",
            )
            .group_by(services::Column::ServiceType)
            .order_by_asc(services::Column::ServiceType)
            .into_model::<ServiceTypeTotals>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// The `limit` customers with the highest total spend; ties are broken
    /// by customer ID ascending
    pub async fn top_customer_totals(&self, limit: u64) -> DatabaseResult<Vec<CustomerTotals>> {
        Self::well_formed()
            .select_only()
            .column_as(customers::Column::Id, "customer_id")
            .column_as(customers::Column::Name, "customer_name")
            .column_as(payments::Column::Amount.sum(), "total_spent")
            .column_as(payments::Column::Id.count(), "payment_count")
            .group_by(customers::Column::Id)
            .group_by(customers::Column::Name)
            .order_by_desc(payments::Column::Amount.sum())
            .order_by_asc(customers::Column::Id)
            .limit(limit)
            .into_model::<CustomerTotals>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }
}
