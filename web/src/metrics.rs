//! Business metrics for the flash-sale service.
//!
//! Counters are recorded at the point of occurrence in `seckill-core`;
//! this module registers their descriptions so the Prometheus exporter
//! can present them.
//!
//! # Exported Metrics
//!
//! - `seckill_purchases_total` - Successful purchases
//! - `seckill_sold_out_total` - Reservations rejected for exhausted stock
//! - `seckill_rate_limited_total` - Requests rejected by the admission gate
//! - `seckill_compensation_failures_total` - Failed compensation releases
//!   (counter/ledger drift requiring manual reconciliation)

use ::metrics::describe_counter;

/// Register descriptions for all business metrics.
///
/// Call once at application startup, after the exporter is installed.
pub fn register_business_metrics() {
    describe_counter!(
        "seckill_purchases_total",
        "Total number of successful purchases"
    );
    describe_counter!(
        "seckill_sold_out_total",
        "Reservations rejected because stock was exhausted"
    );
    describe_counter!(
        "seckill_rate_limited_total",
        "Requests rejected by the per-client admission gate"
    );
    describe_counter!(
        "seckill_compensation_failures_total",
        "Compensation releases that failed, leaving counter/ledger drift"
    );

    tracing::info!("Business metrics registered");
}
