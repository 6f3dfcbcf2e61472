use thiserror::Error;

use crate::registry::DecodeError;

/// Errors raised by the migration pipeline, the writer and the legacy
/// adopter.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    Kube(#[source] kube::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(
        "unsupported number of Syndesis resources: v1alpha1: {legacy}, v1beta1: {current} (at most one is allowed)"
    )]
    TooManyInstances { legacy: usize, current: usize },
}

impl Error {
    /// True for an optimistic-concurrency rejection (HTTP 409) from the API
    /// server.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Kube(kube::Error::Api(resp)) if resp.code == 409)
    }
}

/// Map a 404 from the API server to `None`.
pub(crate) fn ignore_not_found<T>(res: Result<T, kube::Error>) -> Result<Option<T>, Error> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(None),
        Err(e) => Err(Error::Kube(e)),
    }
}
