use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::addons::AddonsSpec;
use super::types::*;
use crate::SyndesisStatus;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "syndesis.io",
    version = "v1beta1",
    kind = "Syndesis",
    plural = "syndesises",
    derive = "PartialEq",
    namespaced,
    status = "SyndesisStatus",
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".status.version"}"#,
    printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.reason","priority":1}"#
)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SyndesisSpec {
    /// Scheduled backups.
    #[serde(default)]
    pub backup: BackupConfig,

    /// External hostname of the installation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_hostname: String,

    /// Install the sample database and demo data.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub demo_data: bool,

    /// Configuration of the core components.
    #[serde(default)]
    pub components: ComponentsSpec,

    /// Optional features that can be switched on.
    #[serde(default)]
    pub addons: AddonsSpec,

    /// Migrate an existing older resource into this one on the next operator
    /// start. Cleared once the migration ran.
    #[serde(default)]
    pub force_migration: bool,
}

impl Syndesis {
    /// Lifecycle phase, treating an absent status as `Missing`.
    pub fn phase(&self) -> crate::SyndesisPhase {
        self.status.as_ref().map(|s| s.phase.clone()).unwrap_or_default()
    }
}
