//! Canonical `syndesis.io/v1beta1` schema.
//!
//! Spec structs reject unknown fields so that a document shaped for an older
//! schema fails to decode here instead of being silently accepted.

mod addons;
mod spec;
mod types;

pub use addons::*;
pub use spec::*;
pub use types::*;

/// `apiVersion` string of this schema.
pub const API_VERSION: &str = "syndesis.io/v1beta1";

/// Name given to a canonical resource when no legacy name can be reused.
pub const DEFAULT_NAME: &str = "app";
