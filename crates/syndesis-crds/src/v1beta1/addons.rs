use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Typed addon switches. Every addon carries at least an `enabled` flag.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddonsSpec {
    #[serde(default)]
    pub jaeger: JaegerConfiguration,
    #[serde(default)]
    pub ops: AddonSpec,
    #[serde(default)]
    pub todo: AddonSpec,
    #[serde(default)]
    pub knative: AddonSpec,
    #[serde(default)]
    pub dv: DvConfiguration,
    #[serde(default, rename = "camelk")]
    pub camel_k: AddonSpec,
    #[serde(default)]
    pub public_api: PublicApiConfiguration,
}

/// Names of the addons known to this schema, as used for map keys in older
/// schemas.
pub const KNOWN_ADDONS: &[&str] = &["jaeger", "ops", "todo", "knative", "dv", "camelk", "publicApi"];

impl AddonsSpec {
    /// Mutable access to the `enabled` flag of the named addon.
    ///
    /// Returns `None` for names this schema does not know about.
    pub fn enabled_mut(&mut self, name: &str) -> Option<&mut bool> {
        match name {
            "jaeger" => Some(&mut self.jaeger.enabled),
            "ops" => Some(&mut self.ops.enabled),
            "todo" => Some(&mut self.todo.enabled),
            "knative" => Some(&mut self.knative.enabled),
            "dv" => Some(&mut self.dv.enabled),
            "camelk" => Some(&mut self.camel_k.enabled),
            "publicApi" => Some(&mut self.public_api.enabled),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddonSpec {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enabled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JaegerConfiguration {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub client_only: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub operator_only: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query_uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub collector_uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sampler_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sampler_param: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DvConfiguration {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enabled: bool,
    #[serde(default)]
    pub resources: super::types::Resources,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PublicApiConfiguration {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enabled: bool,
    /// Hostname of the exposed public API.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_hostname: String,
    /// Let any authenticated user access the API instead of requiring pod
    /// access in the SAR namespace.
    #[serde(
        default,
        rename = "disable-sar-check",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub disable_sar_check: bool,
}
