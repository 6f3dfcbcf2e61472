//! Known schema versions of the `Syndesis` kind and the trial decoding that
//! tells them apart.
//!
//! Objects of every version come back from the API server labelled with the
//! version used in the request, so the label says nothing about the shape of
//! the stored document. Classification therefore decodes each document
//! against the schemas, newest first, and keeps the first that fits.

use std::fmt;

use kube::api::Api;
use kube::core::{ApiResource, DynamicObject};
use kube::{Client, ResourceExt};
use syndesis_crds::{v1alpha1, v1beta1};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V1Alpha1,
    V1Beta1,
}

impl SchemaVersion {
    /// Every known version, newest first.
    pub const NEWEST_FIRST: [SchemaVersion; 2] = [SchemaVersion::V1Beta1, SchemaVersion::V1Alpha1];

    pub fn api_version(&self) -> &'static str {
        match self {
            Self::V1Alpha1 => v1alpha1::API_VERSION,
            Self::V1Beta1 => v1beta1::API_VERSION,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_version())
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to serialize {name}: {source}")]
    Serialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{name} matches no known Syndesis schema (v1beta1: {current}; v1alpha1: {legacy})")]
    Unrecognized {
        name: String,
        current: serde_json::Error,
        legacy: serde_json::Error,
    },
}

/// A fetched document decoded into the schema it matched.
#[derive(Clone, Debug, PartialEq)]
pub enum Classified {
    Current(Box<v1beta1::Syndesis>),
    Legacy(Box<v1alpha1::Syndesis>),
}

impl Classified {
    pub fn version(&self) -> SchemaVersion {
        match self {
            Self::Current(_) => SchemaVersion::V1Beta1,
            Self::Legacy(_) => SchemaVersion::V1Alpha1,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Current(s) => s.name_any(),
            Self::Legacy(s) => s.name_any(),
        }
    }
}

/// API identities of every served version. Constructed once at startup and
/// handed to whatever needs to list or decode `Syndesis` objects.
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    current: ApiResource,
    legacy: ApiResource,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            current: ApiResource::erase::<v1beta1::Syndesis>(&()),
            legacy: ApiResource::erase::<v1alpha1::Syndesis>(&()),
        }
    }

    pub fn resource(&self, version: SchemaVersion) -> &ApiResource {
        match version {
            SchemaVersion::V1Alpha1 => &self.legacy,
            SchemaVersion::V1Beta1 => &self.current,
        }
    }

    /// Schema-less API for listing every `Syndesis` object in a namespace,
    /// addressed through the newest API identity.
    pub fn list_api(&self, client: Client, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(client, namespace, &self.current)
    }

    /// Decode `obj` against each known schema, newest first.
    pub fn classify(&self, obj: &DynamicObject) -> Result<Classified, DecodeError> {
        let name = obj.name_any();
        let value = serde_json::to_value(obj).map_err(|source| DecodeError::Serialization {
            name: name.clone(),
            source,
        })?;

        let current = match serde_json::from_value::<v1beta1::Syndesis>(value.clone()) {
            Ok(s) => return Ok(Classified::Current(Box::new(s))),
            Err(e) => e,
        };
        let legacy = match serde_json::from_value::<v1alpha1::Syndesis>(value) {
            Ok(s) => return Ok(Classified::Legacy(Box::new(s))),
            Err(e) => e,
        };

        Err(DecodeError::Unrecognized {
            name,
            current,
            legacy,
        })
    }
}
