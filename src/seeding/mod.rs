//! Synthetic data for the dashboard
//!
//! Populates customers, the telecom service catalog, purchases and payments
//! with reproducible random data, and clears them again.

pub mod catalog;

pub use catalog::{CatalogEntry, TELECOM_CATALOG};

use crate::database::dao::BillablePurchase;
use crate::database::entities::{
    AccountStatus, Currency, CustomerRecord, PaymentMethod, PaymentRecord, PaymentStatus,
    PurchaseRecord, PurchaseStatus, ServiceRecord,
};
use crate::database::{DatabaseError, DatabaseManager};
use crate::metrics::track_seeded_rows;
use chrono::{DateTime, Duration, Utc};
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use sea_orm::Iterable;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Rows generated before each bulk insert
const GENERATION_BATCH_SIZE: usize = 10_000;

/// Share of payments made by the purchase's own customer
const SAME_CUSTOMER_PROBABILITY: f64 = 0.95;

/// Dates are spread over this many days before `now`
const HISTORY_DAYS: i64 = 365;

const SUBSCRIPTION_DAYS: i64 = 30;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Cannot create {wanted}: no {missing} available")]
    MissingData {
        wanted: &'static str,
        missing: &'static str,
    },
    #[error("Invalid service popularity weights: {0}")]
    Weights(String),
}

/// How much data to generate
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub customers: usize,
    pub purchases: usize,
    pub payments: usize,
    /// Seed for the random number generator; the same seed and `now`
    /// produce the same data
    pub seed: u64,
    /// Empty all tables first
    pub clear_first: bool,
    /// Reference point for generated dates
    pub now: DateTime<Utc>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            customers: 1_000,
            purchases: 1_000,
            payments: 1_000,
            seed: 42,
            clear_first: true,
            now: Utc::now(),
        }
    }
}

/// Rows created by a seeding run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub customers: u64,
    pub services: u64,
    pub purchases: u64,
    pub payments: u64,
    pub total_amount: f64,
    pub elapsed_ms: u64,
}

/// Rows removed by [`clear`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClearReport {
    pub payments: u64,
    pub purchases: u64,
    pub services: u64,
    pub customers: u64,
}

/// Delete everything, dependents first
pub async fn clear(database: &dyn DatabaseManager) -> Result<ClearReport, DatabaseError> {
    let report = ClearReport {
        payments: database.payments().delete_all().await?,
        purchases: database.purchases().delete_all().await?,
        services: database.services().delete_all().await?,
        customers: database.customers().delete_all().await?,
    };

    info!(
        payments = report.payments,
        purchases = report.purchases,
        services = report.services,
        customers = report.customers,
        "Database cleared"
    );
    Ok(report)
}

pub struct DataGenerator {
    database: Arc<dyn DatabaseManager>,
    rng: StdRng,
    now: DateTime<Utc>,
}

impl DataGenerator {
    pub fn new(database: Arc<dyn DatabaseManager>, seed: u64, now: DateTime<Utc>) -> Self {
        Self {
            database,
            rng: StdRng::seed_from_u64(seed),
            now,
        }
    }

    /// Clear (optionally) and populate all four tables
    pub async fn run(
        database: Arc<dyn DatabaseManager>,
        options: &SeedOptions,
    ) -> Result<SeedReport, SeedError> {
        let start = Instant::now();

        if options.clear_first {
            clear(database.as_ref()).await?;
        }

        let mut generator = Self::new(database, options.seed, options.now);
        let customers = generator.create_customers(options.customers).await?;
        let services = generator.create_services().await?;
        let purchases = generator.create_purchases(options.purchases).await?;
        let (payments, total_amount) = generator.create_payments(options.payments).await?;

        let report = SeedReport {
            customers,
            services,
            purchases,
            payments,
            total_amount: catalog::round_cents(total_amount),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            customers = report.customers,
            services = report.services,
            purchases = report.purchases,
            payments = report.payments,
            total_amount = report.total_amount,
            elapsed_ms = report.elapsed_ms,
            "Seeding completed"
        );
        Ok(report)
    }

    fn random_past_date(&mut self) -> DateTime<Utc> {
        self.now - Duration::days(self.rng.random_range(1..=HISTORY_DAYS))
    }

    fn pick<T: Copy>(&mut self, values: &[T]) -> Option<T> {
        values.choose(&mut self.rng).copied()
    }

    /// Customers named `customer_{i}` with a random account status
    pub async fn create_customers(&mut self, count: usize) -> Result<u64, SeedError> {
        let statuses: Vec<_> = AccountStatus::iter().collect();
        let offset = self.database.customers().count().await? as usize;
        let mut created = 0u64;

        for batch_start in (0..count).step_by(GENERATION_BATCH_SIZE) {
            let batch_end = (batch_start + GENERATION_BATCH_SIZE).min(count);
            let records: Vec<_> = (batch_start..batch_end)
                .map(|i| {
                    let n = offset + i;
                    let status = self.pick(&statuses).unwrap_or_default();
                    CustomerRecord::new(format!("customer_{n}"), format!("customer_{n}@example.com"))
                        .with_status(status)
                })
                .collect();

            created += self.database.customers().insert_many(&records).await?;
            info!(created, total = count, "Inserted customers");
        }

        track_seeded_rows("customers", created);
        Ok(created)
    }

    /// The fixed telecom catalog with prices drawn per tier. Entries already
    /// stored under the same name are left as they are.
    pub async fn create_services(&mut self) -> Result<u64, SeedError> {
        let existing: HashSet<String> = self
            .database
            .services()
            .list()
            .await?
            .into_iter()
            .map(|service| service.name)
            .collect();

        let records: Vec<ServiceRecord> = TELECOM_CATALOG
            .iter()
            .filter(|entry| !existing.contains(entry.name))
            .map(|entry| entry.to_record(&mut self.rng))
            .collect();

        if records.is_empty() {
            info!("Telecom service catalog already present");
            return Ok(0);
        }

        let created = self.database.services().insert_many(&records).await?;
        info!(created, "Inserted telecom service catalog");
        track_seeded_rows("services", created);
        Ok(created)
    }

    /// Purchases by random customers of services drawn by popularity
    pub async fn create_purchases(&mut self, count: usize) -> Result<u64, SeedError> {
        if count == 0 {
            return Ok(0);
        }

        let customer_ids = self.database.customers().all_ids().await?;
        let services = self.database.services().list().await?;
        if customer_ids.is_empty() {
            return Err(SeedError::MissingData {
                wanted: "purchases",
                missing: "customers",
            });
        }
        if services.is_empty() {
            return Err(SeedError::MissingData {
                wanted: "purchases",
                missing: "services",
            });
        }

        let weights = WeightedIndex::new(
            services
                .iter()
                .map(|service| catalog::popularity_of(&service.name)),
        )
        .map_err(|e| SeedError::Weights(e.to_string()))?;
        let statuses: Vec<_> = PurchaseStatus::iter().collect();
        let mut created = 0u64;

        for batch_start in (0..count).step_by(GENERATION_BATCH_SIZE) {
            let batch_size = GENERATION_BATCH_SIZE.min(count - batch_start);
            let mut records = Vec::with_capacity(batch_size);

            for _ in 0..batch_size {
                let service = &services[weights.sample(&mut self.rng)];
                let customer_id = self.pick(&customer_ids).unwrap_or_default();
                let start_date = self.random_past_date();
                let status = self.pick(&statuses).unwrap_or_default();

                let mut purchase =
                    PurchaseRecord::new(customer_id, service.id, start_date).with_status(status);
                if service.is_recurring {
                    purchase = purchase.with_end_date(start_date + Duration::days(SUBSCRIPTION_DAYS));
                }
                records.push(purchase);
            }

            created += self.database.purchases().insert_many(&records).await?;
            info!(created, total = count, "Inserted purchases");
        }

        track_seeded_rows("purchases", created);
        Ok(created)
    }

    /// Payments for random purchases at the service's base price. Most are
    /// made by the purchase's customer, the rest by a random customer.
    /// Returns the number of rows and the sum of their amounts.
    pub async fn create_payments(&mut self, count: usize) -> Result<(u64, f64), SeedError> {
        if count == 0 {
            return Ok((0, 0.0));
        }

        let customer_ids = self.database.customers().all_ids().await?;
        let billable: Vec<BillablePurchase> = self.database.purchases().billable().await?;
        if customer_ids.is_empty() || billable.is_empty() {
            return Err(SeedError::MissingData {
                wanted: "payments",
                missing: if customer_ids.is_empty() {
                    "customers"
                } else {
                    "purchases"
                },
            });
        }

        let currencies: Vec<_> = Currency::iter().collect();
        let methods: Vec<_> = PaymentMethod::iter().collect();
        let statuses: Vec<_> = PaymentStatus::iter().collect();
        let mut created = 0u64;
        let mut total_amount = 0.0;

        for batch_start in (0..count).step_by(GENERATION_BATCH_SIZE) {
            let batch_size = GENERATION_BATCH_SIZE.min(count - batch_start);
            let mut records = Vec::with_capacity(batch_size);

            for _ in 0..batch_size {
                let purchase = &billable[self.rng.random_range(0..billable.len())];
                let customer_id = if self.rng.random_bool(SAME_CUSTOMER_PROBABILITY) {
                    purchase.customer_id
                } else {
                    self.pick(&customer_ids).unwrap_or(purchase.customer_id)
                };
                let method = self.pick(&methods).unwrap_or(PaymentMethod::CreditCard);
                let currency = self.pick(&currencies).unwrap_or_default();
                let status = self.pick(&statuses).unwrap_or_default();
                let timestamp = self.random_past_date();

                total_amount += purchase.base_price;
                records.push(
                    PaymentRecord::new(
                        customer_id,
                        purchase.purchase_id,
                        purchase.base_price,
                        method,
                        timestamp,
                    )
                    .with_currency(currency)
                    .with_status(status),
                );
            }

            created += self.database.payments().insert_many(&records).await?;
            info!(created, total = count, "Inserted payments");
        }

        track_seeded_rows("payments", created);
        Ok((created, total_amount))
    }
}
