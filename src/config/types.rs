//! Typed values carried inside the configuration trees.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::units::{self, UnitError};

/// An optional boolean that distinguishes "not set" from an explicit value.
///
/// Serialized as `true`, `false` or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Toggle {
    /// The field was not supplied.
    #[default]
    Unset,
    /// Explicitly enabled.
    Enabled,
    /// Explicitly disabled.
    Disabled,
}

impl Toggle {
    /// Resolve against the value used when the field is unset.
    pub fn resolve(self, default: bool) -> bool {
        match self {
            Toggle::Unset => default,
            Toggle::Enabled => true,
            Toggle::Disabled => false,
        }
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Toggle::Unset,
            Some(true) => Toggle::Enabled,
            Some(false) => Toggle::Disabled,
        }
    }
}

impl From<Toggle> for Option<bool> {
    fn from(value: Toggle) -> Self {
        match value {
            Toggle::Unset => None,
            Toggle::Enabled => Some(true),
            Toggle::Disabled => Some(false),
        }
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

/// Granularity of the metrics collected by the platform Prometheus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionProfile {
    /// Every metric and label (the default).
    #[default]
    Full,
    /// Only what the platform needs to function.
    Minimal,
}

impl CollectionProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionProfile::Full => "full",
            CollectionProfile::Minimal => "minimal",
        }
    }
}

impl fmt::Display for CollectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a collection profile outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not a supported collection profile, supported profiles are: full, minimal")]
pub struct UnknownCollectionProfile(pub String);

impl FromStr for CollectionProfile {
    type Err = UnknownCollectionProfile;

    /// An empty string selects the default profile.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "full" => Ok(CollectionProfile::Full),
            "minimal" => Ok(CollectionProfile::Minimal),
            other => Err(UnknownCollectionProfile(other.to_string())),
        }
    }
}

/// Sentinel requesting a limit derived from cluster capacity.
pub const AUTOMATIC_BODY_SIZE_LIMIT: &str = "automatic";

/// Parsed form of `enforcedBodySizeLimit`.
///
/// The literal text is kept so that a configured value passes through
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BodySizeLimit {
    /// No limit configured.
    #[default]
    Unset,
    /// `"0"`: the limit is explicitly switched off.
    Disabled,
    /// A concrete size.
    Literal { text: String, bytes: u64 },
    /// `"automatic"`: resolve from the current pod capacity.
    Automatic,
}

impl BodySizeLimit {
    /// Build a literal limit from a byte count, rendered in whole mebibytes.
    pub fn from_bytes_mib_ceil(bytes: u64) -> Self {
        let text = units::format_mib_ceil(bytes);
        let bytes = bytes.div_ceil(units::MIB).saturating_mul(units::MIB);
        BodySizeLimit::Literal { text, bytes }
    }

    /// The configured text, or an empty string when unset.
    pub fn as_str(&self) -> &str {
        match self {
            BodySizeLimit::Unset => "",
            BodySizeLimit::Disabled => "0",
            BodySizeLimit::Literal { text, .. } => text,
            BodySizeLimit::Automatic => AUTOMATIC_BODY_SIZE_LIMIT,
        }
    }

    /// Effective limit in bytes, if one applies.
    pub fn bytes(&self) -> Option<u64> {
        match self {
            BodySizeLimit::Literal { bytes, .. } => Some(*bytes),
            _ => None,
        }
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, BodySizeLimit::Automatic)
    }
}

impl FromStr for BodySizeLimit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(BodySizeLimit::Unset),
            "0" => Ok(BodySizeLimit::Disabled),
            AUTOMATIC_BODY_SIZE_LIMIT => Ok(BodySizeLimit::Automatic),
            literal => Ok(BodySizeLimit::Literal {
                bytes: units::parse_size(literal)?,
                text: literal.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for BodySizeLimit {
    type Error = UnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BodySizeLimit> for String {
    fn from(value: BodySizeLimit) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BodySizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
