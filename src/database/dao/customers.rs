use super::INSERT_BATCH_SIZE;
use crate::database::entities::{CustomerRecord, customers};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

/// Customers DAO for database operations
#[derive(Clone)]
pub struct CustomersDao {
    db: DatabaseConnection,
}

impl CustomersDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_active_model(customer: &CustomerRecord) -> customers::ActiveModel {
        customers::ActiveModel {
            id: ActiveValue::NotSet,
            name: Set(customer.name.clone()),
            email: Set(customer.email.clone()),
            account_status: Set(customer.account_status),
        }
    }

    /// Insert a customer and return its ID
    pub async fn create(&self, customer: &CustomerRecord) -> DatabaseResult<i32> {
        let result = customers::Entity::insert(Self::to_active_model(customer))
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.last_insert_id)
    }

    /// Insert customers in batches inside a single transaction
    pub async fn insert_many(&self, records: &[CustomerRecord]) -> DatabaseResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        for chunk in records.chunks(INSERT_BATCH_SIZE) {
            customers::Entity::insert_many(chunk.iter().map(Self::to_active_model))
                .exec(&txn)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records.len() as u64)
    }

    /// Find customer by ID
    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<CustomerRecord>> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// All customer IDs in ascending order
    pub async fn all_ids(&self) -> DatabaseResult<Vec<i32>> {
        customers::Entity::find()
            .select_only()
            .column(customers::Column::Id)
            .order_by_asc(customers::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn count(&self) -> DatabaseResult<u64> {
        customers::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn delete_all(&self) -> DatabaseResult<u64> {
        let result = customers::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
