//! Startup pipeline that leaves exactly one canonical `Syndesis` resource
//! behind: fetch every stored object, classify it by schema, enforce the
//! singleton rule, migrate a legacy object forward and write the result.

pub mod migrate;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, ListParams};
use kube::{Client, ResourceExt};
use syndesis_crds::{v1alpha1, v1beta1};
use tracing::{debug, info, warn};

use crate::context::Context;
use crate::error::{Error, ignore_not_found};
use crate::metrics::{increment_migrations_total, set_api_instances};
use crate::registry::{Classified, SchemaVersion};
use crate::writer;

/// Stored objects grouped by the schema they decoded as, in list order.
#[derive(Clone, Debug, Default)]
pub struct Candidates {
    pub current: Vec<v1beta1::Syndesis>,
    pub legacy: Vec<v1alpha1::Syndesis>,
}

impl Candidates {
    pub fn push(&mut self, classified: Classified) {
        match classified {
            Classified::Current(s) => self.current.push(*s),
            Classified::Legacy(s) => self.legacy.push(*s),
        }
    }

    pub fn len(&self) -> usize {
        self.current.len() + self.legacy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// At most one resource may exist across all schema versions.
    pub fn enforce_singleton(&self) -> Result<(), Error> {
        if self.len() > 1 {
            return Err(Error::TooManyInstances {
                legacy: self.legacy.len(),
                current: self.current.len(),
            });
        }
        Ok(())
    }
}

impl FromIterator<Classified> for Candidates {
    fn from_iter<I: IntoIterator<Item = Classified>>(iter: I) -> Self {
        let mut candidates = Self::default();
        for c in iter {
            candidates.push(c);
        }
        candidates
    }
}

/// List every `Syndesis` object in the namespace and classify it.
///
/// A 404 on the list (the CRD is not installed) counts as no objects.
pub async fn fetch_candidates(ctx: &Context) -> Result<Candidates, Error> {
    let api = ctx.registry.list_api(ctx.client.clone(), &ctx.namespace);
    let items = match ignore_not_found(api.list(&ListParams::default()).await)? {
        Some(list) => list.items,
        None => {
            debug!(namespace = %ctx.namespace, "Syndesis API not served, nothing to classify");
            Vec::new()
        }
    };

    let mut candidates = Candidates::default();
    for obj in &items {
        let classified = ctx.registry.classify(obj)?;
        debug!(name = %classified.name(), version = %classified.version(), "classified resource");
        candidates.push(classified);
    }
    Ok(candidates)
}

/// Canonical object standing in for `legacy` when no canonical one exists.
///
/// Both versions are views of the same stored object, so the new one keeps
/// the legacy identity, including the `resourceVersion` it was read at.
pub fn synthesize_current(legacy: &v1alpha1::Syndesis, namespace: &str) -> v1beta1::Syndesis {
    let name = legacy
        .metadata
        .name
        .clone()
        .unwrap_or_else(|| v1beta1::DEFAULT_NAME.to_string());
    v1beta1::Syndesis {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace.to_string()),
            resource_version: legacy.metadata.resource_version.clone(),
            ..Default::default()
        },
        spec: v1beta1::SyndesisSpec {
            force_migration: true,
            ..Default::default()
        },
        status: None,
    }
}

/// What the pipeline found and did.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// No `Syndesis` resource exists.
    NoResource,
    /// Only a canonical resource exists.
    UpToDate,
    /// A legacy resource exists but is not eligible for migration yet.
    NotEligible,
    /// The legacy resource was migrated and the canonical one written.
    Migrated(Box<v1beta1::Syndesis>),
}

impl Outcome {
    fn as_label(&self) -> &'static str {
        match self {
            Outcome::NoResource => "no_resource",
            Outcome::UpToDate => "up_to_date",
            Outcome::NotEligible => "not_eligible",
            Outcome::Migrated(_) => "migrated",
        }
    }
}

/// Holds the legacy and canonical resources of one namespace between
/// discovery and write-back.
pub struct ApiMigrator {
    client: Client,
    namespace: String,
    legacy: Option<v1alpha1::Syndesis>,
    current: Option<v1beta1::Syndesis>,
    migrated: bool,
}

impl ApiMigrator {
    /// Fetch, classify and singleton-check, then load the full objects.
    pub async fn discover(ctx: &Context) -> Result<Self, Error> {
        let candidates = fetch_candidates(ctx).await?;
        set_api_instances(
            &ctx.namespace,
            SchemaVersion::V1Alpha1.api_version(),
            candidates.legacy.len() as i64,
        );
        set_api_instances(
            &ctx.namespace,
            SchemaVersion::V1Beta1.api_version(),
            candidates.current.len() as i64,
        );
        candidates.enforce_singleton()?;

        let legacy = match candidates.legacy.first() {
            Some(c) => {
                let api = Api::<v1alpha1::Syndesis>::namespaced(ctx.client.clone(), &ctx.namespace);
                ignore_not_found(api.get(&c.name_any()).await)?
            }
            None => None,
        };

        let current = match candidates.current.first() {
            Some(c) => {
                let api = Api::<v1beta1::Syndesis>::namespaced(ctx.client.clone(), &ctx.namespace);
                ignore_not_found(api.get(&c.name_any()).await)?
            }
            None => legacy
                .as_ref()
                .map(|l| synthesize_current(l, &ctx.namespace)),
        };

        Ok(Self {
            client: ctx.client.clone(),
            namespace: ctx.namespace.clone(),
            legacy,
            current,
            migrated: false,
        })
    }

    pub fn legacy(&self) -> Option<&v1alpha1::Syndesis> {
        self.legacy.as_ref()
    }

    pub fn current(&self) -> Option<&v1beta1::Syndesis> {
        self.current.as_ref()
    }

    /// Translate the legacy resource into the canonical one when eligible.
    pub fn migrate(&mut self) -> bool {
        let (Some(legacy), Some(current)) = (self.legacy.as_ref(), self.current.as_mut()) else {
            return false;
        };
        self.migrated = migrate::migrate(legacy, current);
        self.migrated
    }

    /// Write the canonical resource back if a migration ran.
    ///
    /// An ineligible legacy resource is left untouched; writing the empty
    /// canonical stand-in would replace the stored legacy object.
    pub async fn write(&self) -> Result<Option<v1beta1::Syndesis>, Error> {
        let (Some(legacy), Some(current)) = (self.legacy.as_ref(), self.current.as_ref()) else {
            return Ok(None);
        };
        if !self.migrated {
            return Ok(None);
        }

        info!(
            from_name = %legacy.name_any(),
            from_version = %legacy.status.as_ref().map(|s| s.version.as_str()).unwrap_or_default(),
            to_name = %current.name_any(),
            "updating Syndesis API"
        );
        let api = Api::<v1beta1::Syndesis>::namespaced(self.client.clone(), &self.namespace);
        writer::upsert(&api, current).await.map(Some)
    }

    fn outcome(&self, written: Option<v1beta1::Syndesis>) -> Outcome {
        match (&self.legacy, &self.current, written) {
            (_, _, Some(w)) => Outcome::Migrated(Box::new(w)),
            (Some(_), _, None) => Outcome::NotEligible,
            (None, Some(_), None) => Outcome::UpToDate,
            (None, None, None) => Outcome::NoResource,
        }
    }
}

/// Run discovery, migration and write-back once.
pub async fn run(ctx: &Context) -> Result<Outcome, Error> {
    let result = run_inner(ctx).await;
    match &result {
        Ok(outcome) => increment_migrations_total(outcome.as_label()),
        Err(e) => {
            increment_migrations_total("error");
            warn!(namespace = %ctx.namespace, error = %e, "API migration failed");
        }
    }
    result
}

async fn run_inner(ctx: &Context) -> Result<Outcome, Error> {
    let mut migrator = ApiMigrator::discover(ctx).await?;
    if migrator.migrate() {
        info!(namespace = %ctx.namespace, "legacy Syndesis resource migrated in memory");
    } else if let Some(legacy) = migrator.legacy() {
        info!(
            name = %legacy.name_any(),
            phase = %legacy.phase(),
            "legacy Syndesis resource not eligible for migration"
        );
    }
    let written = migrator.write().await?;
    let outcome = migrator.outcome(written);
    info!(namespace = %ctx.namespace, outcome = outcome.as_label(), "API migration finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syndesis_crds::SyndesisPhase;

    fn legacy_named(name: &str) -> v1alpha1::Syndesis {
        let mut s = v1alpha1::Syndesis::new(name, Default::default());
        s.metadata.resource_version = Some("42".into());
        s.status = Some(syndesis_crds::SyndesisStatus {
            phase: SyndesisPhase::Installed,
            ..Default::default()
        });
        s
    }

    #[test]
    fn singleton_allows_zero_or_one() {
        assert!(Candidates::default().enforce_singleton().is_ok());

        let one_legacy = Candidates {
            legacy: vec![legacy_named("app")],
            ..Default::default()
        };
        assert!(one_legacy.enforce_singleton().is_ok());

        let one_current = Candidates {
            current: vec![v1beta1::Syndesis::new("app", Default::default())],
            ..Default::default()
        };
        assert!(one_current.enforce_singleton().is_ok());
    }

    #[test]
    fn singleton_rejects_any_pair() {
        let two_current = Candidates {
            current: vec![
                v1beta1::Syndesis::new("a", Default::default()),
                v1beta1::Syndesis::new("b", Default::default()),
            ],
            ..Default::default()
        };
        let err = two_current.enforce_singleton().unwrap_err();
        assert!(matches!(err, Error::TooManyInstances { legacy: 0, current: 2 }));

        let mixed = Candidates {
            current: vec![v1beta1::Syndesis::new("a", Default::default())],
            legacy: vec![legacy_named("b")],
        };
        assert!(matches!(
            mixed.enforce_singleton(),
            Err(Error::TooManyInstances { legacy: 1, current: 1 })
        ));
    }

    #[test]
    fn synthesized_current_reuses_legacy_identity() {
        let current = synthesize_current(&legacy_named("syndesis"), "test");
        assert_eq!(current.metadata.name.as_deref(), Some("syndesis"));
        assert_eq!(current.metadata.namespace.as_deref(), Some("test"));
        assert_eq!(current.metadata.resource_version.as_deref(), Some("42"));
        assert!(current.spec.force_migration);
        assert!(current.status.is_none());
    }

    #[test]
    fn synthesized_current_falls_back_to_default_name() {
        let mut legacy = legacy_named("x");
        legacy.metadata.name = None;
        let current = synthesize_current(&legacy, "test");
        assert_eq!(current.metadata.name.as_deref(), Some("app"));
    }
}
