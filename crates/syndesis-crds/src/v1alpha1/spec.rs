use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::*;
use crate::SyndesisStatus;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "syndesis.io",
    version = "v1alpha1",
    kind = "Syndesis",
    plural = "syndesises",
    derive = "PartialEq",
    namespaced,
    status = "SyndesisStatus",
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".status.version"}"#
)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SyndesisSpec {
    /// External hostname of the installation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_hostname: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_data: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_integrations: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_support: Option<bool>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_stream_namespace: String,

    #[serde(default)]
    pub integration: IntegrationSpec,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub registry: String,

    #[serde(default)]
    pub components: ComponentsSpec,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub open_shift_master: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub open_shift_console_url: String,

    /// Namespace used for subject access review checks.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sar_namespace: String,

    /// Addon name to addon parameters, e.g. `{"todo": {"enabled": "true"}}`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub addons: BTreeMap<String, AddonParameters>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub maven_repositories: BTreeMap<String, String>,
}

/// Free-form parameters of a single legacy addon.
pub type AddonParameters = BTreeMap<String, String>;

impl Syndesis {
    /// Return the parameter map of the named addon, if configured.
    pub fn addon(&self, name: &str) -> Option<&AddonParameters> {
        self.spec.addons.get(name)
    }

    /// Lifecycle phase, treating an absent status as `Missing`.
    pub fn phase(&self) -> crate::SyndesisPhase {
        self.status.as_ref().map(|s| s.phase.clone()).unwrap_or_default()
    }
}
