use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::phase::{SyndesisPhase, SyndesisStatusReason};

/// Observed state of a `Syndesis` resource. The field set is identical across
/// API versions, so both versions share this type.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyndesisStatus {
    #[serde(default, skip_serializing_if = "SyndesisPhase::is_missing")]
    #[schemars(with = "String")]
    pub phase: SyndesisPhase,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub upgrade_attempts: i32,
    /// RFC 3339 timestamp of the most recent failed upgrade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_upgrade_failure: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force_upgrade: bool,
    #[serde(default, skip_serializing_if = "SyndesisStatusReason::is_missing")]
    #[schemars(with = "String")]
    pub reason: SyndesisStatusReason,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_version: String,
    #[serde(default, skip_serializing_if = "BackupStatus::is_empty")]
    pub backup: BackupStatus,
}

/// Schedule bookkeeping of the backup job.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatus {
    /// When the next backup is planned.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next: String,
    /// When the previous backup ran.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub previous: String,
}

impl BackupStatus {
    pub fn is_empty(&self) -> bool {
        self.next.is_empty() && self.previous.is_empty()
    }
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}
