use kube::Client;
use tracing::info;

use crate::config::OperatorConfig;
use crate::registry::SchemaRegistry;

/// Everything the migration pipeline and the legacy adopter need to talk to
/// the cluster. Built once at startup and shared behind an `Arc`.
pub struct Context {
    pub client: Client,
    /// Namespace holding the single `Syndesis` resource.
    pub namespace: String,
    /// Known schema versions of the `Syndesis` kind.
    pub registry: SchemaRegistry,
    /// Name of the Secret holding the settings of a pre-CRD installation.
    pub legacy_config_secret: String,
}

impl Context {
    pub fn new(client: Client, namespace: String, config: &OperatorConfig) -> Self {
        info!(%namespace, secret = %config.legacy_config_secret, "operator context initialised");
        Self {
            client,
            namespace,
            registry: SchemaRegistry::new(),
            legacy_config_secret: config.legacy_config_secret.clone(),
        }
    }
}
