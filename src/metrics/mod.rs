use lazy_static::lazy_static;
use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    /// Time clock punches, labelled by kind (in/out).
    pub static ref PUNCHES_TOTAL: IntCounterVec = register_int_counter_vec_with_registry!(
        "brigade_punches_total",
        "Time clock punches processed",
        &["kind"],
        REGISTRY
    )
    .expect("punches counter registers once");

    /// Inventory ledger mutations, labelled by operation.
    pub static ref LEDGER_OPS_TOTAL: IntCounterVec = register_int_counter_vec_with_registry!(
        "brigade_ledger_ops_total",
        "Inventory ledger operations applied",
        &["op"],
        REGISTRY
    )
    .expect("ledger counter registers once");

    pub static ref PAYMENTS_CAPTURED_TOTAL: IntCounter = register_int_counter_with_registry!(
        "brigade_payments_captured_total",
        "Bills captured at the point of sale",
        REGISTRY
    )
    .expect("payments counter registers once");

    pub static ref TRAINING_FAULTS_TOTAL: IntCounter = register_int_counter_with_registry!(
        "brigade_training_faults_total",
        "Training faults recorded across all locations",
        REGISTRY
    )
    .expect("faults counter registers once");
}

/// Renders the registry in the Prometheus text exposition format.
pub fn export_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_export() {
        PUNCHES_TOTAL.with_label_values(&["in"]).inc();
        TRAINING_FAULTS_TOTAL.inc();

        let exported = export_metrics();
        assert!(exported.contains("brigade_punches_total"));
        assert!(exported.contains("brigade_training_faults_total"));
    }
}
