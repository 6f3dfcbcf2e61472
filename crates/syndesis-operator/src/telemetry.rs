use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "syndesis_operator=info,kube=info";

/// Install the global tracing subscriber.
///
/// Output is JSON unless `LOG_FORMAT=text`, which is easier to read when
/// running the operator locally against a cluster.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("text") => registry.with(fmt::layer()).init(),
        _ => registry.with(fmt::layer().json()).init(),
    }
}
