//! Custom resource definitions for the `syndesis.io` API group.
//!
//! Two schema versions of the `Syndesis` kind are served side by side:
//! [`v1alpha1`] is the legacy representation kept around so that older
//! installations can be read and migrated, [`v1beta1`] is the canonical
//! storage version.

pub mod v1alpha1;
pub mod v1beta1;

mod phase;
mod status;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::CustomResourceExt;
use kube::core::crd::{MergeError, merge_crds};

pub use phase::{SyndesisPhase, SyndesisStatusReason};
pub use status::{BackupStatus, SyndesisStatus};

/// API group shared by every version of the `Syndesis` kind.
pub const GROUP: &str = "syndesis.io";
/// Kind shared by every version.
pub const KIND: &str = "Syndesis";
/// Plural resource name used in API paths.
pub const PLURAL: &str = "syndesises";
/// Version the API server persists objects in.
pub const STORAGE_VERSION: &str = "v1beta1";

/// Single CRD serving both versions, stored as [`STORAGE_VERSION`].
pub fn merged_crd() -> Result<CustomResourceDefinition, MergeError> {
    merge_crds(
        vec![v1alpha1::Syndesis::crd(), v1beta1::Syndesis::crd()],
        STORAGE_VERSION,
    )
}
