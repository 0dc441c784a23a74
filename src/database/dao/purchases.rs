use super::INSERT_BATCH_SIZE;
use crate::database::entities::{PurchaseRecord, purchases, services};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveValue, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

/// A purchase together with who owns it and what it costs
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct BillablePurchase {
    pub purchase_id: i32,
    pub customer_id: i32,
    pub base_price: f64,
}

/// Purchases DAO for database operations
#[derive(Clone)]
pub struct PurchasesDao {
    db: DatabaseConnection,
}

impl PurchasesDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_active_model(purchase: &PurchaseRecord) -> purchases::ActiveModel {
        purchases::ActiveModel {
            id: ActiveValue::NotSet,
            customer_id: Set(purchase.customer_id),
            service_id: Set(purchase.service_id),
            start_date: Set(purchase.start_date),
            end_date: Set(purchase.end_date),
            status: Set(purchase.status),
        }
    }

    pub async fn create(&self, purchase: &PurchaseRecord) -> DatabaseResult<i32> {
        let result = purchases::Entity::insert(Self::to_active_model(purchase))
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.last_insert_id)
    }

    pub async fn insert_many(&self, records: &[PurchaseRecord]) -> DatabaseResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        for chunk in records.chunks(INSERT_BATCH_SIZE) {
            purchases::Entity::insert_many(chunk.iter().map(Self::to_active_model))
                .exec(&txn)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records.len() as u64)
    }

    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<PurchaseRecord>> {
        purchases::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Every purchase whose service exists, with that service's base price
    pub async fn billable(&self) -> DatabaseResult<Vec<BillablePurchase>> {
        purchases::Entity::find()
            .select_only()
            .column_as(purchases::Column::Id, "purchase_id")
            .column_as(purchases::Column::CustomerId, "customer_id")
            .column_as(services::Column::BasePrice, "base_price")
            .join(JoinType::InnerJoin, purchases::Relation::Service.def())
            .order_by_asc(purchases::Column::Id)
            .into_model::<BillablePurchase>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn count(&self) -> DatabaseResult<u64> {
        purchases::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn delete_all(&self) -> DatabaseResult<u64> {
        let result = purchases::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
