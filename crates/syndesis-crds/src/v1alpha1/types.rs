use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Resource name of the memory entry in `limits`/`requests`.
pub const RESOURCE_MEMORY: &str = "memory";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IntegrationSpec {
    /// Maximum number of integrations a single user may create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    /// Interval in seconds for checking integration state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_check_interval: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComponentsSpec {
    #[serde(default)]
    pub server: ServerConfiguration,
    #[serde(default)]
    pub meta: MetaConfiguration,
    #[serde(default)]
    pub db: DbConfiguration,
    #[serde(default)]
    pub prometheus: PrometheusConfiguration,
    #[serde(default)]
    pub grafana: GrafanaConfiguration,
    #[serde(default)]
    pub oauth: OauthConfiguration,
}

/// Kubernetes-style compute requirements keyed by resource name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, Quantity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<BTreeMap<String, Quantity>>,
}

impl Resources {
    /// Memory limit, if one is set.
    pub fn memory_limit(&self) -> Option<&Quantity> {
        self.limits.as_ref()?.get(RESOURCE_MEMORY)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourcesWithVolume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, Quantity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<BTreeMap<String, Quantity>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_capacity: String,
}

impl ResourcesWithVolume {
    pub fn memory_limit(&self) -> Option<&Quantity> {
        self.limits.as_ref()?.get(RESOURCE_MEMORY)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfiguration {
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub features: ServerFeatures,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerFeatures {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expose_via3_scale: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub management_url_for3scale: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetaConfiguration {
    #[serde(default)]
    pub resources: ResourcesWithVolume,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DbConfiguration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub database: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_stream_namespace: String,
    #[serde(default)]
    pub resources: ResourcesWithVolume,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrometheusConfiguration {
    #[serde(default)]
    pub resources: ResourcesWithVolume,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GrafanaConfiguration {
    #[serde(default)]
    pub resources: Resources,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OauthConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_sar_check: Option<bool>,
}
