//! Configuration parsing, defaulting and loading from disk.
//!
//! # Responsibilities
//! - Decode the administrator and user-workload documents
//! - Guarantee every sub-tree is populated, even for empty input
//! - Optionally reject unknown keys and unsupported values (strict mode)
//!
//! # Design Decisions
//! - Keys match schema fields case-insensitively (`prometheusk8s` reads as
//!   `prometheusK8s`); free-form maps such as labels keep their keys verbatim

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{ClusterMonitoringConfiguration, UserWorkloadConfiguration};
use crate::config::types::CollectionProfile;
use crate::lifecycle::cycle::CycleSources;

/// Boxed error returned by external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which configuration document a failure relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    ClusterMonitoring,
    UserWorkload,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::ClusterMonitoring => f.write_str("cluster monitoring"),
            ConfigOrigin::UserWorkload => f.write_str("user workload"),
        }
    }
}

/// Failure of a call into an external collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The collaborator returned an error.
    #[error(transparent)]
    Failed(BoxError),

    /// The cycle was cancelled while waiting.
    #[error("operation cancelled")]
    Cancelled,

    /// The cycle deadline passed while waiting.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Error type for configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML/JSON or does not match the schema.
    #[error("failed to parse {origin} configuration: {source}")]
    Malformed {
        origin: ConfigOrigin,
        #[source]
        source: serde_yaml::Error,
    },

    /// A value violates its grammar, range or enumeration.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// An external collaborator failed or was cancelled.
    #[error("{context}: {source}")]
    External {
        context: &'static str,
        #[source]
        source: CollaboratorError,
    },

    /// A configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    pub fn external(context: &'static str, source: CollaboratorError) -> Self {
        Self::External { context, source }
    }
}

/// Aggregate configuration for one reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub cluster_monitoring_configuration: ClusterMonitoringConfiguration,
    pub user_workload_configuration: UserWorkloadConfiguration,
}

impl Config {
    /// Baseline configuration with no overrides.
    pub fn new_default() -> Self {
        Self::default()
    }

    /// Parse the administrator document.
    ///
    /// An empty document is valid and yields the defaults. With `strict`,
    /// unknown keys and unsupported collection profiles are rejected here
    /// instead of being ignored or left to the precheck.
    pub fn parse(content: &str, strict: bool) -> Result<Self> {
        let cluster_monitoring: ClusterMonitoringConfiguration =
            decode(content, ConfigOrigin::ClusterMonitoring, strict)?;

        if strict {
            cluster_monitoring
                .prometheus_k8s
                .collection_profile
                .parse::<CollectionProfile>()
                .map_err(|e| ConfigError::invalid_value("prometheusK8s.collectionProfile", e))?;
        }

        Ok(Self {
            cluster_monitoring_configuration: cluster_monitoring,
            user_workload_configuration: UserWorkloadConfiguration::default(),
        })
    }

    /// Parse the administrator document, then attach the user-workload one.
    pub fn parse_with_user_workload(admin: &str, user_workload: &str, strict: bool) -> Result<Self> {
        let mut config = Self::parse(admin, strict)?;
        config.user_workload_configuration = UserWorkloadConfiguration::parse(user_workload)?;
        Ok(config)
    }

    /// Load both documents from disk. A `None` path means the source was
    /// not supplied.
    pub fn load(admin: Option<&Path>, user_workload: Option<&Path>, strict: bool) -> Result<Self> {
        let sources = CycleSources::load(admin, user_workload)?;
        Self::parse_with_user_workload(&sources.cluster_monitoring, &sources.user_workload, strict)
    }
}

impl UserWorkloadConfiguration {
    /// Parse the user-workload document. An empty document is valid.
    pub fn parse(content: &str) -> Result<Self> {
        decode(content, ConfigOrigin::UserWorkload, false)
    }
}

fn decode<T>(content: &str, origin: ConfigOrigin, strict: bool) -> Result<T>
where
    T: DeserializeOwned + Serialize + Default,
{
    let malformed = |source: serde_yaml::Error| ConfigError::Malformed { origin, source };

    // Comment-only or blank documents decode to null.
    let mut raw: Value = serde_yaml::from_str(content).map_err(malformed)?;
    if raw.is_null() {
        tracing::debug!(%origin, "Empty configuration, using defaults");
        return Ok(T::default());
    }

    let template = serde_yaml::to_value(T::default()).map_err(malformed)?;
    let parsed: T = if normalize_keys(&mut raw, &template) {
        tracing::debug!(%origin, "Matched configuration keys case-insensitively");
        // Round-trip through text so scalars keep their plain-string reading.
        let normalized = serde_yaml::to_string(&raw).map_err(malformed)?;
        serde_yaml::from_str(&normalized).map_err(malformed)?
    } else {
        serde_yaml::from_str(content).map_err(malformed)?
    };

    if strict {
        let known = serde_yaml::to_value(&parsed).map_err(malformed)?;
        if let Some(path) = find_unknown_key(&raw, &known, "") {
            return Err(ConfigError::invalid_value(path, "unknown field"));
        }
    }

    tracing::debug!(%origin, strict, "Configuration parsed");
    Ok(parsed)
}

/// Rename keys that equal a schema field ignoring ASCII case to the field's
/// own spelling, descending only into sub-trees the schema defines. An exact
/// match always wins over a case-folded one. Returns true if anything changed.
fn normalize_keys(raw: &mut Value, template: &Value) -> bool {
    let (Value::Mapping(raw), Value::Mapping(template)) = (raw, template) else {
        return false;
    };

    let mut renamed = false;
    let keys: Vec<Value> = raw.keys().cloned().collect();
    for key in keys {
        let Value::String(name) = &key else { continue };
        if template.contains_key(&key) {
            continue;
        }
        let canonical = template
            .keys()
            .find(|field| matches!(field, Value::String(field) if field.eq_ignore_ascii_case(name)));
        if let Some(canonical) = canonical {
            if raw.contains_key(canonical) {
                continue;
            }
            if let Some(value) = raw.remove(&key) {
                raw.insert(canonical.clone(), value);
                renamed = true;
            }
        }
    }

    for (key, value) in raw.iter_mut() {
        if let Some(field) = template.get(key) {
            renamed |= normalize_keys(value, field);
        }
    }
    renamed
}

/// Walk the raw document alongside the re-serialized typed value and return
/// the dotted path of the first key the schema does not know.
fn find_unknown_key(raw: &Value, known: &Value, prefix: &str) -> Option<String> {
    match (raw, known) {
        (Value::Mapping(raw), Value::Mapping(known)) => raw.iter().find_map(|(key, value)| {
            let name = match key {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
            };
            let path = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}.{name}")
            };
            match known.get(key) {
                Some(known_value) => find_unknown_key(value, known_value, &path),
                None => Some(path),
            }
        }),
        (Value::Sequence(raw), Value::Sequence(known)) => raw
            .iter()
            .zip(known)
            .enumerate()
            .find_map(|(i, (raw, known))| find_unknown_key(raw, known, &format!("{prefix}[{i}]"))),
        _ => None,
    }
}
