use crate::database::dao::{CustomerTotals, ServiceTypeTotals};
use crate::database::entities::ServiceType;
use serde::Serialize;
use utoipa::ToSchema;

/// `numerator / denominator`, or 0 when there is nothing to divide by
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// How the payments of one service type were made
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PaymentMethodBreakdown {
    pub credit_card: i64,
    pub bank_transfer: i64,
    pub mobile_payment: i64,
    pub cash_payment: i64,
}

/// Payment statistics for every service of one type
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ServiceTypeStats {
    pub service_type: ServiceType,
    pub total_payments: i64,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub successful_payments: i64,
    /// Fraction in `0.0..=1.0`
    pub success_rate: f64,
    pub payment_methods: PaymentMethodBreakdown,
}

impl From<ServiceTypeTotals> for ServiceTypeStats {
    fn from(totals: ServiceTypeTotals) -> Self {
        let count = totals.total_payments as f64;
        Self {
            service_type: totals.service_type,
            total_payments: totals.total_payments,
            total_amount: totals.total_amount,
            avg_amount: ratio(totals.total_amount, count),
            successful_payments: totals.successful_payments,
            success_rate: ratio(totals.successful_payments as f64, count),
            payment_methods: PaymentMethodBreakdown {
                credit_card: totals.credit_card_payments,
                bank_transfer: totals.bank_transfer_payments,
                mobile_payment: totals.mobile_payments,
                cash_payment: totals.cash_payments,
            },
        }
    }
}

/// A customer ranked by total spend
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TopCustomer {
    pub customer_id: i32,
    pub customer_name: String,
    pub total_spent: f64,
    pub payment_count: i64,
    pub avg_payment: f64,
}

impl From<CustomerTotals> for TopCustomer {
    fn from(totals: CustomerTotals) -> Self {
        Self {
            customer_id: totals.customer_id,
            customer_name: totals.customer_name,
            total_spent: totals.total_spent,
            payment_count: totals.payment_count,
            avg_payment: ratio(totals.total_spent, totals.payment_count as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(total_payments: i64, total_amount: f64, successful: i64) -> ServiceTypeTotals {
        ServiceTypeTotals {
            service_type: ServiceType::Mobile,
            total_payments,
            total_amount,
            successful_payments: successful,
            credit_card_payments: total_payments,
            bank_transfer_payments: 0,
            mobile_payments: 0,
            cash_payments: 0,
        }
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn test_service_type_stats_derivation() {
        let stats = ServiceTypeStats::from(totals(3, 250.0, 2));
        assert_eq!(stats.total_payments, 3);
        assert!((stats.avg_amount - 83.333).abs() < 1e-3);
        assert!((stats.success_rate - 0.667).abs() < 1e-3);
        assert_eq!(stats.payment_methods.credit_card, 3);
    }

    #[test]
    fn test_empty_group_has_zero_rates() {
        let stats = ServiceTypeStats::from(totals(0, 0.0, 0));
        assert_eq!(stats.avg_amount, 0.0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn test_top_customer_average() {
        let customer = TopCustomer::from(CustomerTotals {
            customer_id: 7,
            customer_name: "customer_7".to_string(),
            total_spent: 90.0,
            payment_count: 4,
        });
        assert_eq!(customer.avg_payment, 22.5);

        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["customer_name"], "customer_7");
        assert_eq!(json["avg_payment"], 22.5);
    }
}
