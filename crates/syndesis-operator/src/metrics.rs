use prometheus::{IntCounterVec, IntGaugeVec, Opts};

lazy_static::lazy_static! {
    pub static ref MIGRATIONS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        Opts::new(
            "syndesis_operator_migrations_total",
            "Outcomes of the startup API migration pipeline"
        ),
        &["result"]
    )
    .unwrap();

    pub static ref API_INSTANCES: IntGaugeVec = prometheus::register_int_gauge_vec!(
        Opts::new(
            "syndesis_operator_api_instances",
            "Syndesis resources found at startup per schema version"
        ),
        &["namespace", "version"]
    )
    .unwrap();

    pub static ref LEGACY_ADOPTION_ATTEMPTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        Opts::new(
            "syndesis_operator_legacy_adoption_attempts_total",
            "Attempts to adopt a pre-CRD installation"
        ),
        &["result"]
    )
    .unwrap();
}

pub fn increment_migrations_total(result: &str) {
    MIGRATIONS_TOTAL.with_label_values(&[result]).inc();
}

pub fn set_api_instances(namespace: &str, version: &str, count: i64) {
    API_INSTANCES
        .with_label_values(&[namespace, version])
        .set(count);
}

pub fn increment_legacy_adoption_attempts(result: &str) {
    LEGACY_ADOPTION_ATTEMPTS_TOTAL
        .with_label_values(&[result])
        .inc();
}
