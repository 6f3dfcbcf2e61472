//! Legacy `syndesis.io/v1alpha1` schema.
//!
//! Addons are an open map of string parameters and resource limits use the
//! Kubernetes `Quantity` type. The operator never writes this version except
//! when adopting a pre-CRD installation.
//!
//! Like [`v1beta1`](crate::v1beta1), the spec structs reject unknown fields,
//! so a canonical document that fails its own decode cannot be mistaken for a
//! legacy one.

mod spec;
mod types;

pub use spec::*;
pub use types::*;

/// `apiVersion` string of this schema.
pub const API_VERSION: &str = "syndesis.io/v1alpha1";
