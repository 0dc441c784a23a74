use super::INSERT_BATCH_SIZE;
use crate::database::entities::{ServiceRecord, services};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};

/// Services DAO for the static service catalog
#[derive(Clone)]
pub struct ServicesDao {
    db: DatabaseConnection,
}

impl ServicesDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_active_model(service: &ServiceRecord) -> services::ActiveModel {
        services::ActiveModel {
            id: ActiveValue::NotSet,
            name: Set(service.name.clone()),
            service_type: Set(service.service_type),
            base_price: Set(service.base_price),
            is_recurring: Set(service.is_recurring),
            billing_cycle: Set(service.billing_cycle),
        }
    }

    fn validate(service: &ServiceRecord) -> DatabaseResult<()> {
        if service.base_price < 0.0 || !service.base_price.is_finite() {
            return Err(DatabaseError::Constraint(format!(
                "service base price must be a non-negative number, got {}",
                service.base_price
            )));
        }
        Ok(())
    }

    pub async fn create(&self, service: &ServiceRecord) -> DatabaseResult<i32> {
        Self::validate(service)?;

        let result = services::Entity::insert(Self::to_active_model(service))
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.last_insert_id)
    }

    pub async fn insert_many(&self, records: &[ServiceRecord]) -> DatabaseResult<u64> {
        records.iter().try_for_each(Self::validate)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        for chunk in records.chunks(INSERT_BATCH_SIZE) {
            services::Entity::insert_many(chunk.iter().map(Self::to_active_model))
                .exec(&txn)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records.len() as u64)
    }

    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<ServiceRecord>> {
        services::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// The whole catalog ordered by ID
    pub async fn list(&self) -> DatabaseResult<Vec<ServiceRecord>> {
        services::Entity::find()
            .order_by_asc(services::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn count(&self) -> DatabaseResult<u64> {
        services::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn delete_all(&self) -> DatabaseResult<u64> {
        let result = services::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
