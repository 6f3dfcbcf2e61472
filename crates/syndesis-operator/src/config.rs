use clap::Args;

pub const DEFAULT_LEGACY_CONFIG_SECRET: &str = "syndesis-global-config";
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Runtime settings, taken from command-line flags with environment
/// fallbacks.
#[derive(Args, Clone, Debug)]
pub struct OperatorConfig {
    /// Namespace holding the Syndesis installation.
    #[arg(long, env = "WATCH_NAMESPACE")]
    pub namespace: Option<String>,

    /// Secret holding the environment-style settings of a pre-CRD
    /// installation.
    #[arg(long, env = "LEGACY_CONFIG_SECRET", default_value = DEFAULT_LEGACY_CONFIG_SECRET)]
    pub legacy_config_secret: String,

    /// Port of the metrics and health endpoints.
    #[arg(long, env = "METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            legacy_config_secret: DEFAULT_LEGACY_CONFIG_SECRET.to_string(),
            metrics_port: DEFAULT_METRICS_PORT,
        }
    }
}
