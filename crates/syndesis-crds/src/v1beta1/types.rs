use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BackupConfig {
    /// Backup cron schedule, e.g. `daily` or `every 3m`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schedule: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComponentsSpec {
    #[serde(default)]
    pub oauth: OauthConfiguration,
    #[serde(default)]
    pub server: ServerConfiguration,
    #[serde(default)]
    pub meta: MetaConfiguration,
    #[serde(default)]
    pub database: DatabaseConfiguration,
    #[serde(default)]
    pub prometheus: PrometheusConfiguration,
    #[serde(default)]
    pub grafana: GrafanaConfiguration,
    #[serde(default)]
    pub upgrade: UpgradeConfiguration,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OauthConfiguration {
    /// Disable subject access review checks altogether.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_sar_check: bool,
    /// Users need to be able to list pods in this namespace to log in.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sar_namespace: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourcesWithVolume {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_capacity: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourcesWithPersistentVolume {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_capacity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_name: String,
    /// One of `ReadWriteOnce`, `ReadOnlyMany`, `ReadWriteMany`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_access_mode: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_storage_class: String,
    /// Labels a pre-provisioned volume must carry to be bound.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volume_labels: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeOnlyResources {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_capacity: String,
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
    /// Maximum number of integrations a single user may create.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub integration_limit: i32,
    /// Interval in seconds for checking integration state.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub integration_state_check_interval: i32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deploy_integrations: bool,
    /// Additional maven repositories, name to URL. Left unset rather than
    /// empty so that an untouched resource does not show a diff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven_repositories: Option<BTreeMap<String, String>>,
    /// 3scale management URL.
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
pub struct DatabaseConfiguration {
    /// PostgreSQL user used to access the database.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Name of the PostgreSQL database.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Host and port of the database.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Use an external database instead of the bundled one.
    #[serde(
        default,
        rename = "externalDbURL",
        skip_serializing_if = "String::is_empty"
    )]
    pub external_db_url: String,
    #[serde(default)]
    pub resources: ResourcesWithPersistentVolume,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrometheusConfiguration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rules: String,
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
pub struct UpgradeConfiguration {
    #[serde(default)]
    pub resources: VolumeOnlyResources,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}
