use crate::database::entities::{BillingCycle, ServiceRecord, ServiceType};
use rand::Rng;

/// One entry of the fixed telecom catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub service_type: ServiceType,
    /// Base price is drawn uniformly from this range
    pub price_range: (f64, f64),
    /// Relative share of purchases
    pub popularity: f64,
}

const fn entry(
    name: &'static str,
    service_type: ServiceType,
    low: f64,
    high: f64,
    popularity: f64,
) -> CatalogEntry {
    CatalogEntry {
        name,
        service_type,
        price_range: (low, high),
        popularity,
    }
}

pub const TELECOM_CATALOG: [CatalogEntry; 20] = [
    entry("Fiber Optic 100Mbps", ServiceType::Internet, 25.0, 45.0, 0.15),
    entry("Fiber Optic 500Mbps", ServiceType::Internet, 50.0, 80.0, 0.12),
    entry("Fiber Optic 1Gbps", ServiceType::Internet, 80.0, 120.0, 0.08),
    entry("Cable Internet 50Mbps", ServiceType::Internet, 20.0, 35.0, 0.10),
    entry("Cable Internet 200Mbps", ServiceType::Internet, 40.0, 60.0, 0.09),
    entry("DSL Internet 25Mbps", ServiceType::Internet, 15.0, 25.0, 0.06),
    entry("DSL Internet 50Mbps", ServiceType::Internet, 20.0, 35.0, 0.05),
    entry("Wireless Internet 100Mbps", ServiceType::Internet, 25.0, 45.0, 0.04),
    entry("Mobile Plan 5GB", ServiceType::Mobile, 15.0, 25.0, 0.12),
    entry("Mobile Plan 10GB", ServiceType::Mobile, 20.0, 30.0, 0.10),
    entry("Mobile Plan 20GB", ServiceType::Mobile, 25.0, 35.0, 0.08),
    entry("Mobile Plan Unlimited", ServiceType::Mobile, 40.0, 60.0, 0.06),
    entry("Mobile Plan Family 4GB", ServiceType::Mobile, 30.0, 45.0, 0.08),
    entry("Mobile Plan Family 10GB", ServiceType::Mobile, 30.0, 45.0, 0.06),
    entry("Mobile Plan Business 50GB", ServiceType::Mobile, 35.0, 50.0, 0.03),
    entry("Basic TV Package", ServiceType::Tv, 15.0, 25.0, 0.08),
    entry("Premium TV Package", ServiceType::Tv, 30.0, 50.0, 0.06),
    entry("Sports TV Package", ServiceType::Tv, 20.0, 35.0, 0.05),
    entry("Movie TV Package", ServiceType::Tv, 20.0, 35.0, 0.04),
    entry("Family TV Package", ServiceType::Tv, 15.0, 25.0, 0.06),
];

/// Popularity used for services that are not part of the catalog
pub const DEFAULT_POPULARITY: f64 = 0.01;

/// Round to whole cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl CatalogEntry {
    /// A monthly recurring service with a freshly drawn price
    pub fn to_record<R: Rng + ?Sized>(&self, rng: &mut R) -> ServiceRecord {
        let (low, high) = self.price_range;
        let price = round_cents(rng.random_range(low..high));
        ServiceRecord::new(self.name, self.service_type, price).recurring(BillingCycle::Monthly)
    }
}

/// Popularity of a service by catalog name
pub fn popularity_of(name: &str) -> f64 {
    TELECOM_CATALOG
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.popularity)
        .unwrap_or(DEFAULT_POPULARITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_catalog_shape() {
        let count = |t: ServiceType| {
            TELECOM_CATALOG
                .iter()
                .filter(|entry| entry.service_type == t)
                .count()
        };
        assert_eq!(count(ServiceType::Internet), 8);
        assert_eq!(count(ServiceType::Mobile), 7);
        assert_eq!(count(ServiceType::Tv), 5);
        assert!(TELECOM_CATALOG.iter().all(|e| e.price_range.0 < e.price_range.1));
    }

    #[test]
    fn test_record_price_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for entry in TELECOM_CATALOG.iter() {
            let record = entry.to_record(&mut rng);
            assert!(record.base_price >= entry.price_range.0);
            assert!(record.base_price <= entry.price_range.1);
            assert_eq!(record.base_price, round_cents(record.base_price));
            assert!(record.is_recurring);
            assert_eq!(record.billing_cycle, Some(BillingCycle::Monthly));
        }
    }

    #[test]
    fn test_popularity_lookup() {
        assert_eq!(popularity_of("Fiber Optic 100Mbps"), 0.15);
        assert_eq!(popularity_of("Carrier Pigeon"), DEFAULT_POPULARITY);
    }
}
