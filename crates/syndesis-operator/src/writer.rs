use std::fmt::Debug;

use kube::api::{Api, Patch, PatchParams, PostParams};
use kube::core::{ApiResource, DynamicObject};
use kube::{Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::Error;

/// Persist `obj`, creating it when it was never read from the cluster and
/// replacing it otherwise.
///
/// A replace carries the `resourceVersion` the object was fetched with, so a
/// write computed from stale state is rejected by the API server with a
/// conflict. On that path the status is written first and the replace is
/// pinned to the `resourceVersion` the status write returned. A failure
/// between the two calls therefore leaves the stored spec untouched and the
/// whole write can be repeated. A create has no prior state to protect and
/// writes the status afterwards. Errors are returned as they come; nothing is
/// retried here.
pub async fn upsert<K>(api: &Api<K>, obj: &K) -> Result<K, Error>
where
    K: Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned,
{
    let name = obj.name_any();
    let pp = PostParams::default();

    match obj.resource_version() {
        None => {
            info!(%name, "creating resource");
            let created = api.create(&pp, obj).await.map_err(Error::Kube)?;
            let mut pending = obj.clone();
            pending.meta_mut().resource_version = created.resource_version();
            match write_status(api, &pending).await? {
                Some(patched) => decode(patched),
                None => Ok(created),
            }
        }
        Some(rv) => {
            let mut pending = obj.clone();
            if let Some(patched) = write_status(api, obj).await? {
                pending.meta_mut().resource_version = patched.resource_version();
            }
            info!(%name, fetched = %rv, resource_version = ?pending.resource_version(), "replacing resource");
            api.replace(&name, &pp, &pending).await.map_err(Error::Kube)
        }
    }
}

/// Merge-patch the status block of `obj` through the status subresource,
/// pinned to the `resourceVersion` it carries. Returns `None` without a call
/// when `obj` has no status.
///
/// The response is left schema-less: before a replace lands, the stored spec
/// may still be in the shape of another version.
pub async fn write_status<K>(api: &Api<K>, obj: &K) -> Result<Option<DynamicObject>, Error>
where
    K: Resource<DynamicType = ()> + Clone + Serialize,
{
    let name = obj.name_any();
    let Some(status) = status_of(obj)? else {
        debug!(%name, "no status to write");
        return Ok(None);
    };

    let patch = json!({
        "metadata": { "resourceVersion": obj.resource_version() },
        "status": status,
    });
    debug!(%name, resource_version = ?obj.resource_version(), "writing status");
    status_api(api, obj)
        .patch_status(&name, &PatchParams::default(), &Patch::Merge(patch))
        .await
        .map(Some)
        .map_err(Error::Kube)
}

fn status_api<K>(api: &Api<K>, obj: &K) -> Api<DynamicObject>
where
    K: Resource<DynamicType = ()> + Clone,
{
    let resource = ApiResource::erase::<K>(&());
    let client = api.clone().into_client();
    match obj.namespace() {
        Some(ns) => Api::namespaced_with(client, &ns, &resource),
        None => Api::default_namespaced_with(client, &resource),
    }
}

fn decode<K: DeserializeOwned>(obj: DynamicObject) -> Result<K, Error> {
    serde_json::to_value(obj)
        .and_then(serde_json::from_value)
        .map_err(Error::Serialization)
}

fn status_of<K: Serialize>(obj: &K) -> Result<Option<Value>, Error> {
    let value = serde_json::to_value(obj).map_err(Error::Serialization)?;
    Ok(value.get("status").filter(|s| !s.is_null()).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syndesis_crds::{SyndesisPhase, SyndesisStatus, v1beta1};

    #[test]
    fn status_is_extracted_only_when_set() {
        let mut s = v1beta1::Syndesis::new("app", Default::default());
        assert_eq!(status_of(&s).unwrap(), None);

        s.status = Some(SyndesisStatus {
            phase: SyndesisPhase::PostUpgradeRun,
            ..Default::default()
        });
        assert_eq!(
            status_of(&s).unwrap(),
            Some(json!({ "phase": "PostUpgradeRun" }))
        );
    }
}
