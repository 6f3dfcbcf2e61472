//! Field translation from the legacy `v1alpha1` schema into the canonical
//! `v1beta1` schema.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use syndesis_crds::{SyndesisPhase, SyndesisStatusReason, v1alpha1, v1beta1};
use tracing::{debug, info};

/// A migration only runs for an installed legacy resource whose canonical
/// counterpart explicitly asks for it.
pub fn is_eligible(legacy: &v1alpha1::Syndesis, current: &v1beta1::Syndesis) -> bool {
    legacy.phase() == SyndesisPhase::Installed && current.spec.force_migration
}

/// Human-readable status description left on a migrated resource.
pub fn migrated_description() -> String {
    format!(
        "App migrated from {} to {}",
        v1alpha1::API_VERSION,
        v1beta1::API_VERSION
    )
}

/// Translate `legacy` into `current` in place.
///
/// Returns `false` and leaves `current` untouched unless the pair is
/// eligible. A successful run clears `forceMigration`, so running it again
/// on the result is a no-op.
pub fn migrate(legacy: &v1alpha1::Syndesis, current: &mut v1beta1::Syndesis) -> bool {
    if !is_eligible(legacy, current) {
        debug!(
            phase = %legacy.phase(),
            force_migration = current.spec.force_migration,
            "migration not eligible"
        );
        return false;
    }

    let old = &legacy.spec;
    let spec = &mut current.spec;

    migrate_addons(&old.addons, &mut spec.addons);

    let features = &mut spec.components.server.features;
    if !old.maven_repositories.is_empty() {
        features.maven_repositories = Some(old.maven_repositories.clone());
    }
    if let Some(limit) = old.integration.limit {
        features.integration_limit = limit;
    }
    if let Some(interval) = old.integration.state_check_interval {
        features.integration_state_check_interval = interval;
    }
    if let Some(deploy) = old.deploy_integrations {
        features.deploy_integrations = deploy;
    }
    copy_non_empty(
        &old.components.server.features.management_url_for3scale,
        &mut features.management_url_for3scale,
    );

    let components = &mut spec.components;
    copy_memory(
        old.components.server.resources.memory_limit(),
        &mut components.server.resources.memory,
    );

    let db = &old.components.db;
    copy_non_empty(&db.database, &mut components.database.name);
    copy_non_empty(&db.user, &mut components.database.user);
    copy_memory(
        db.resources.memory_limit(),
        &mut components.database.resources.memory,
    );
    copy_non_empty(
        &db.resources.volume_capacity,
        &mut components.database.resources.volume_capacity,
    );

    if let Some(disable) = old.components.oauth.disable_sar_check {
        components.oauth.disable_sar_check = disable;
    }
    copy_non_empty(&old.sar_namespace, &mut components.oauth.sar_namespace);

    let meta = &old.components.meta.resources;
    copy_memory(meta.memory_limit(), &mut components.meta.resources.memory);
    copy_non_empty(
        &meta.volume_capacity,
        &mut components.meta.resources.volume_capacity,
    );

    let prometheus = &old.components.prometheus.resources;
    copy_memory(
        prometheus.memory_limit(),
        &mut components.prometheus.resources.memory,
    );
    copy_non_empty(
        &prometheus.volume_capacity,
        &mut components.prometheus.resources.volume_capacity,
    );

    copy_memory(
        old.components.grafana.resources.memory_limit(),
        &mut components.grafana.resources.memory,
    );

    if let Some(demo) = old.demo_data {
        spec.demo_data = demo;
    }
    copy_non_empty(&old.route_hostname, &mut spec.route_hostname);

    spec.force_migration = false;

    let status = current.status.get_or_insert_with(Default::default);
    status.version = legacy
        .status
        .as_ref()
        .map(|s| s.version.clone())
        .unwrap_or_default();
    status.phase = SyndesisPhase::Installed;
    status.reason = SyndesisStatusReason::Migrated;
    status.description = migrated_description();

    info!(version = %status.version, "migrated legacy resource");
    true
}

/// Enable every known addon whose legacy parameters say `enabled: "true"`.
fn migrate_addons(old: &BTreeMap<String, v1alpha1::AddonParameters>, addons: &mut v1beta1::AddonsSpec) {
    for (name, params) in old {
        match addons.enabled_mut(name) {
            Some(flag) => {
                if params.get("enabled").is_some_and(|v| v == "true") {
                    *flag = true;
                }
            }
            None => debug!(addon = %name, "dropping unknown legacy addon"),
        }
    }
}

fn copy_memory(limit: Option<&Quantity>, target: &mut String) {
    if let Some(q) = limit {
        *target = q.0.clone();
    }
}

fn copy_non_empty(source: &str, target: &mut String) {
    if !source.is_empty() {
        *target = source.to_string();
    }
}
