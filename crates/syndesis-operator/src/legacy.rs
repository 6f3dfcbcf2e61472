//! Adoption of installations that predate the `Syndesis` custom resource.
//!
//! Such installations keep their settings as environment-style keys in a
//! global config Secret. When that Secret carries the legacy markers and no
//! `Syndesis` resource exists yet, a `v1alpha1` resource is synthesized from
//! the settings so that the regular migration path can pick it up.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::Api;
use kube::core::DynamicObject;
use kube::{Client, ResourceExt};
use syndesis_crds::{SyndesisPhase, SyndesisStatus, SyndesisStatusReason, v1alpha1, v1beta1};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::Context;
use crate::error::{Error, ignore_not_found};
use crate::metrics::increment_legacy_adoption_attempts;
use crate::writer;

/// Delay between failed adoption attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Keys that must be present and non-empty for an installation to count as
/// legacy.
pub const MARKER_KEYS: &[&str] = &[keys::SYNDESIS_VERSION, keys::ROUTE_HOSTNAME];

/// Environment-style keys understood in the legacy global config.
pub mod keys {
    pub const SYNDESIS_VERSION: &str = "SYNDESIS_VERSION";
    pub const ROUTE_HOSTNAME: &str = "ROUTE_HOSTNAME";
    pub const SAR_PROJECT: &str = "SAR_PROJECT";
    pub const DEMO_DATA_ENABLED: &str = "DEMO_DATA_ENABLED";
    pub const MAX_INTEGRATIONS_PER_USER: &str = "MAX_INTEGRATIONS_PER_USER";
    pub const INTEGRATION_STATE_CHECK_INTERVAL: &str = "INTEGRATION_STATE_CHECK_INTERVAL";
    pub const POSTGRESQL_USER: &str = "POSTGRESQL_USER";
    pub const POSTGRESQL_DATABASE: &str = "POSTGRESQL_DATABASE";
    pub const POSTGRESQL_MEMORY_LIMIT: &str = "POSTGRESQL_MEMORY_LIMIT";
    pub const POSTGRESQL_VOLUME_CAPACITY: &str = "POSTGRESQL_VOLUME_CAPACITY";
    pub const SERVER_MEMORY_LIMIT: &str = "SERVER_MEMORY_LIMIT";
    pub const META_MEMORY_LIMIT: &str = "META_MEMORY_LIMIT";
    pub const META_VOLUME_CAPACITY: &str = "META_VOLUME_CAPACITY";
    pub const PROMETHEUS_MEMORY_LIMIT: &str = "PROMETHEUS_MEMORY_LIMIT";
    pub const PROMETHEUS_VOLUME_CAPACITY: &str = "PROMETHEUS_VOLUME_CAPACITY";
    pub const OPENSHIFT_MANAGEMENT_URL_FOR3SCALE: &str = "OPENSHIFT_MANAGEMENT_URL_FOR3SCALE";
}

/// Settings read from the legacy global config Secret.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacySettings(BTreeMap<String, String>);

impl LegacySettings {
    /// Decode the Secret data. Values that are not valid UTF-8 are skipped.
    pub fn from_secret(secret: &Secret) -> Self {
        let mut settings = BTreeMap::new();
        for (key, value) in secret.data.iter().flatten() {
            match String::from_utf8(value.0.clone()) {
                Ok(v) => {
                    settings.insert(key.clone(), v);
                }
                Err(_) => warn!(%key, "legacy setting is not valid UTF-8, skipping"),
            }
        }
        Self(settings)
    }

    /// Non-empty value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// True when every marker key carries a value.
    pub fn is_legacy(&self) -> bool {
        MARKER_KEYS.iter().all(|k| self.get(k).is_some())
    }

    fn string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(%key, value = %raw, "ignoring unparseable legacy setting");
                None
            }
        }
    }

    fn memory_limit(&self, key: &str) -> Option<BTreeMap<String, Quantity>> {
        self.get(key).map(|m| {
            BTreeMap::from([(
                v1alpha1::RESOURCE_MEMORY.to_string(),
                Quantity(m.to_string()),
            )])
        })
    }

    /// Build the legacy resource describing this installation.
    pub fn to_resource(&self, namespace: &str) -> v1alpha1::Syndesis {
        let mut spec = v1alpha1::SyndesisSpec {
            route_hostname: self.string(keys::ROUTE_HOSTNAME),
            sar_namespace: self.string(keys::SAR_PROJECT),
            demo_data: self.parsed(keys::DEMO_DATA_ENABLED),
            integration: v1alpha1::IntegrationSpec {
                limit: self.parsed(keys::MAX_INTEGRATIONS_PER_USER),
                state_check_interval: self.parsed(keys::INTEGRATION_STATE_CHECK_INTERVAL),
            },
            ..Default::default()
        };

        let c = &mut spec.components;
        c.db.user = self.string(keys::POSTGRESQL_USER);
        c.db.database = self.string(keys::POSTGRESQL_DATABASE);
        c.db.resources.limits = self.memory_limit(keys::POSTGRESQL_MEMORY_LIMIT);
        c.db.resources.volume_capacity = self.string(keys::POSTGRESQL_VOLUME_CAPACITY);
        c.server.resources.limits = self.memory_limit(keys::SERVER_MEMORY_LIMIT);
        c.server.features.management_url_for3scale =
            self.string(keys::OPENSHIFT_MANAGEMENT_URL_FOR3SCALE);
        c.meta.resources.limits = self.memory_limit(keys::META_MEMORY_LIMIT);
        c.meta.resources.volume_capacity = self.string(keys::META_VOLUME_CAPACITY);
        c.prometheus.resources.limits = self.memory_limit(keys::PROMETHEUS_MEMORY_LIMIT);
        c.prometheus.resources.volume_capacity = self.string(keys::PROMETHEUS_VOLUME_CAPACITY);

        let mut resource = v1alpha1::Syndesis::new(v1beta1::DEFAULT_NAME, spec);
        resource.metadata.namespace = Some(namespace.to_string());
        resource.status = Some(SyndesisStatus {
            phase: SyndesisPhase::UpgradingLegacy,
            reason: SyndesisStatusReason::NotYetCreated,
            version: self.string(keys::SYNDESIS_VERSION),
            ..Default::default()
        });
        resource
    }
}

/// Result of a single adoption attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Adoption {
    /// No legacy config, or it lacks the markers.
    NotLegacy,
    /// A `Syndesis` resource already exists in the namespace.
    AlreadyManaged,
    /// A legacy resource with this name was created.
    Adopted(String),
}

impl Adoption {
    fn as_label(&self) -> &'static str {
        match self {
            Adoption::NotLegacy => "not_legacy",
            Adoption::AlreadyManaged => "already_managed",
            Adoption::Adopted(_) => "adopted",
        }
    }
}

pub struct LegacyAdopter {
    ctx: Arc<Context>,
    retry_interval: Duration,
}

impl LegacyAdopter {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self {
            ctx,
            retry_interval: RETRY_INTERVAL,
        }
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    fn client(&self) -> Client {
        self.ctx.client.clone()
    }

    async fn read_settings(&self) -> Result<Option<LegacySettings>, Error> {
        let api = Api::<Secret>::namespaced(self.client(), &self.ctx.namespace);
        let secret = ignore_not_found(api.get(&self.ctx.legacy_config_secret).await)?;
        Ok(secret.as_ref().map(LegacySettings::from_secret))
    }

    /// Detect a legacy installation and create its `v1alpha1` resource.
    ///
    /// Creation writes the object and then its status. When an earlier
    /// attempt got through the first call only, the object it left behind is
    /// recognized by its name, its missing phase and a spec equal to what the
    /// settings describe, and only the status is written.
    pub async fn adopt_once(&self) -> Result<Adoption, Error> {
        let ns = &self.ctx.namespace;

        let Some(settings) = self.read_settings().await? else {
            debug!(%ns, secret = %self.ctx.legacy_config_secret, "no legacy config found");
            return Ok(Adoption::NotLegacy);
        };
        if !settings.is_legacy() {
            debug!(%ns, "legacy config lacks marker keys");
            return Ok(Adoption::NotLegacy);
        }

        let resource = settings.to_resource(ns);
        let api = Api::<v1alpha1::Syndesis>::namespaced(self.client(), ns);

        let existing = self
            .ctx
            .registry
            .list_api(self.client(), ns)
            .list(&Default::default())
            .await;
        let existing = ignore_not_found(existing)?.map(|l| l.items).unwrap_or_default();
        if !existing.is_empty() {
            let Some(pending) = unfinished_adoption(&existing, &resource) else {
                debug!(%ns, "Syndesis resource already present, nothing to adopt");
                return Ok(Adoption::AlreadyManaged);
            };
            let name = pending.name_any();
            info!(%ns, %name, "resuming incomplete adoption");
            writer::write_status(&api, &pending).await?;
            return Ok(Adoption::Adopted(name));
        }

        let created = writer::upsert(&api, &resource).await?;
        let name = created.name_any();
        info!(%ns, %name, version = %settings.string(keys::SYNDESIS_VERSION), "adopted legacy installation");
        Ok(Adoption::Adopted(name))
    }

    /// Retry [`adopt_once`](Self::adopt_once) until it succeeds or `cancel`
    /// fires. Returns `None` when cancelled first.
    pub async fn run(self, cancel: CancellationToken) -> Option<Adoption> {
        let mut attempt: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                info!("legacy adoption cancelled");
                return None;
            }
            attempt += 1;

            match self.adopt_once().await {
                Ok(adoption) => {
                    increment_legacy_adoption_attempts(adoption.as_label());
                    info!(attempt, result = adoption.as_label(), "legacy adoption check finished");
                    return Some(adoption);
                }
                Err(e) => {
                    increment_legacy_adoption_attempts("error");
                    warn!(
                        attempt,
                        error = %e,
                        retry_in_secs = self.retry_interval.as_secs_f64(),
                        "legacy adoption failed, retrying"
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("legacy adoption cancelled");
                    return None;
                }
                _ = tokio::time::sleep(self.retry_interval) => {}
            }
        }
    }
}

/// The object a previous adoption created without getting to its status,
/// with `expected`'s status applied. `None` when `existing` holds anything
/// else.
fn unfinished_adoption(
    existing: &[DynamicObject],
    expected: &v1alpha1::Syndesis,
) -> Option<v1alpha1::Syndesis> {
    let [obj] = existing else {
        return None;
    };
    if obj.name_any() != v1beta1::DEFAULT_NAME {
        return None;
    }
    let phase = obj.data.get("status").and_then(|s| s.get("phase"));
    if phase.and_then(|p| p.as_str()).is_some_and(|p| !p.is_empty()) {
        return None;
    }

    let value = serde_json::to_value(obj).ok()?;
    let mut found = serde_json::from_value::<v1alpha1::Syndesis>(value).ok()?;
    if found.spec != expected.spec {
        return None;
    }
    found.status = expected.status.clone();
    Some(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::ByteString;

    fn secret(entries: &[(&str, &str)]) -> Secret {
        Secret {
            data: Some(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn markers_must_be_present_and_non_empty() {
        let full = LegacySettings::from_secret(&secret(&[
            ("SYNDESIS_VERSION", "1.8.0"),
            ("ROUTE_HOSTNAME", "foo.example.com"),
        ]));
        assert!(full.is_legacy());

        let empty_value = LegacySettings::from_secret(&secret(&[
            ("SYNDESIS_VERSION", "1.8.0"),
            ("ROUTE_HOSTNAME", ""),
        ]));
        assert!(!empty_value.is_legacy());

        let missing = LegacySettings::from_secret(&secret(&[("ROUTE_HOSTNAME", "foo.example.com")]));
        assert!(!missing.is_legacy());

        assert!(!LegacySettings::from_secret(&Secret::default()).is_legacy());
    }

    #[test]
    fn invalid_utf8_values_are_skipped() {
        let mut s = secret(&[("SYNDESIS_VERSION", "1.8.0")]);
        s.data
            .as_mut()
            .unwrap()
            .insert("ROUTE_HOSTNAME".into(), ByteString(vec![0xff, 0xfe]));
        let settings = LegacySettings::from_secret(&s);
        assert_eq!(settings.get("SYNDESIS_VERSION"), Some("1.8.0"));
        assert_eq!(settings.get("ROUTE_HOSTNAME"), None);
    }

    #[test]
    fn resource_is_synthesized_from_settings() {
        let settings = LegacySettings::from_secret(&secret(&[
            ("SYNDESIS_VERSION", "1.8.0"),
            ("ROUTE_HOSTNAME", "foo.example.com"),
            ("SAR_PROJECT", "myproject"),
            ("DEMO_DATA_ENABLED", "true"),
            ("MAX_INTEGRATIONS_PER_USER", "3"),
            ("INTEGRATION_STATE_CHECK_INTERVAL", "not-a-number"),
            ("POSTGRESQL_USER", "syndesis"),
            ("POSTGRESQL_DATABASE", "syndesis"),
            ("POSTGRESQL_VOLUME_CAPACITY", "1Gi"),
            ("SERVER_MEMORY_LIMIT", "800Mi"),
            ("META_MEMORY_LIMIT", "512Mi"),
        ]));

        let resource = settings.to_resource("test");
        assert_eq!(resource.metadata.name.as_deref(), Some("app"));
        assert_eq!(resource.metadata.namespace.as_deref(), Some("test"));
        assert!(resource.metadata.resource_version.is_none());

        let spec = &resource.spec;
        assert_eq!(spec.route_hostname, "foo.example.com");
        assert_eq!(spec.sar_namespace, "myproject");
        assert_eq!(spec.demo_data, Some(true));
        assert_eq!(spec.integration.limit, Some(3));
        assert_eq!(spec.integration.state_check_interval, None);
        assert_eq!(spec.components.db.user, "syndesis");
        assert_eq!(spec.components.db.resources.volume_capacity, "1Gi");
        assert_eq!(
            spec.components.server.resources.memory_limit(),
            Some(&Quantity("800Mi".into()))
        );
        assert_eq!(
            spec.components.meta.resources.memory_limit(),
            Some(&Quantity("512Mi".into()))
        );
        assert!(spec.components.prometheus.resources.limits.is_none());

        let status = resource.status.as_ref().unwrap();
        assert_eq!(status.phase, SyndesisPhase::UpgradingLegacy);
        assert_eq!(status.reason, SyndesisStatusReason::NotYetCreated);
        assert_eq!(status.version, "1.8.0");
    }

    fn listed(name: &str, spec: &v1alpha1::SyndesisSpec, status: serde_json::Value) -> DynamicObject {
        serde_json::from_value(serde_json::json!({
            "apiVersion": "syndesis.io/v1beta1",
            "kind": "Syndesis",
            "metadata": { "name": name, "namespace": "test", "resourceVersion": "6" },
            "spec": spec,
            "status": status,
        }))
        .unwrap()
    }

    fn adopted_settings() -> LegacySettings {
        LegacySettings::from_secret(&secret(&[
            ("SYNDESIS_VERSION", "1.8.0"),
            ("ROUTE_HOSTNAME", "foo.example.com"),
            ("POSTGRESQL_MEMORY_LIMIT", "255Mi"),
        ]))
    }

    #[test]
    fn object_without_status_from_same_settings_is_resumed() {
        let expected = adopted_settings().to_resource("test");
        let existing = [listed("app", &expected.spec, serde_json::json!({}))];

        let pending = unfinished_adoption(&existing, &expected).unwrap();
        assert_eq!(pending.metadata.resource_version.as_deref(), Some("6"));
        assert_eq!(pending.phase(), SyndesisPhase::UpgradingLegacy);
        assert_eq!(pending.status, expected.status);
    }

    #[test]
    fn managed_or_foreign_objects_are_not_resumed() {
        let expected = adopted_settings().to_resource("test");

        let with_phase = [listed("app", &expected.spec, serde_json::json!({ "phase": "Installed" }))];
        assert!(unfinished_adoption(&with_phase, &expected).is_none());

        let renamed = [listed("other", &expected.spec, serde_json::json!({}))];
        assert!(unfinished_adoption(&renamed, &expected).is_none());

        let mut edited = expected.spec.clone();
        edited.route_hostname = "bar.example.com".into();
        let different = [listed("app", &edited, serde_json::json!({}))];
        assert!(unfinished_adoption(&different, &expected).is_none());

        let two = [
            listed("app", &expected.spec, serde_json::json!({})),
            listed("app", &expected.spec, serde_json::json!({})),
        ];
        assert!(unfinished_adoption(&two, &expected).is_none());
    }
}
