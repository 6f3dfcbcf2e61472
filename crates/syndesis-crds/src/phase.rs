use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Status enums are free-form strings on the wire. Known values get a
/// variant, anything else is kept verbatim in `Other` so that a status
/// written by a newer operator still decodes.
macro_rules! open_string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            /// Serialized as the empty string.
            #[default]
            Missing,
            $($(#[$vmeta])* $variant,)*
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    Self::Missing => "",
                    $(Self::$variant => $wire,)*
                    Self::Other(s) => s,
                }
            }

            pub fn is_missing(&self) -> bool {
                matches!(self, Self::Missing)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    "" => Self::Missing,
                    $($wire => Self::$variant,)*
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s.as_str()))
            }
        }
    };
}

open_string_enum! {
    /// Lifecycle phase of a `Syndesis` resource, shared by all API versions.
    pub enum SyndesisPhase {
        Installing => "Installing",
        Starting => "Starting",
        StartupFailed => "StartupFailed",
        Installed => "Installed",
        NotInstalled => "NotInstalled",
        Upgrading => "Upgrading",
        PostUpgradeRun => "PostUpgradeRun",
        PostUpgradeRunSucceed => "PostUpgradeRunSucceed",
        UpgradeFailureBackoff => "UpgradeFailureBackoff",
        UpgradeFailed => "UpgradeFailed",
        /// A pre-CRD installation was adopted and awaits its first reconcile.
        UpgradingLegacy => "UpgradingLegacy",
    }
}

open_string_enum! {
    /// Machine-readable reason attached to the status block.
    pub enum SyndesisStatusReason {
        Duplicate => "Duplicate",
        DeploymentNotReady => "DeploymentNotReady",
        UpgradeFailed => "UpgradeFailed",
        TooManyUpgradeAttempts => "TooManyUpgradeAttempts",
        PostUpgradeRun => "PostUpgradeRun",
        Migrated => "Migrated",
        NotYetCreated => "NotYetCreated",
    }
}
