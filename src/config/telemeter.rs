//! Telemetry client enablement and credential loading.

use crate::config::loader::{BoxError, CollaboratorError, Config, ConfigError, Result};
use crate::config::schema::TelemeterClientConfig;

impl TelemeterClientConfig {
    /// Telemetry is opt-in by default once both credentials are present; an
    /// explicit `enabled: false` always wins.
    pub fn is_enabled(&self) -> bool {
        !self.cluster_id.is_empty() && !self.token.is_empty() && self.enabled.resolve(true)
    }
}

impl Config {
    pub fn telemeter_client_enabled(&self) -> bool {
        self.cluster_monitoring_configuration.telemeter_client.is_enabled()
    }

    /// Fill the cluster ID from the cluster when the configuration left it empty.
    pub fn load_cluster_id<F>(&mut self, load: F) -> Result<()>
    where
        F: FnOnce() -> std::result::Result<String, BoxError>,
    {
        let telemeter = &mut self.cluster_monitoring_configuration.telemeter_client;
        if !telemeter.cluster_id.is_empty() {
            return Ok(());
        }

        telemeter.cluster_id = load().map_err(|e| {
            ConfigError::external("failed to load cluster ID", CollaboratorError::Failed(e))
        })?;
        Ok(())
    }

    /// Fill the telemetry token from the cluster when the configuration left it empty.
    pub fn load_token<F>(&mut self, load: F) -> Result<()>
    where
        F: FnOnce() -> std::result::Result<String, BoxError>,
    {
        let telemeter = &mut self.cluster_monitoring_configuration.telemeter_client;
        if !telemeter.token.is_empty() {
            return Ok(());
        }

        telemeter.token = load().map_err(|e| {
            ConfigError::external("failed to load telemeter token", CollaboratorError::Failed(e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Toggle;

    fn telemeter(cluster_id: &str, token: &str, enabled: Toggle) -> TelemeterClientConfig {
        TelemeterClientConfig {
            cluster_id: cluster_id.to_string(),
            token: token.to_string(),
            enabled,
        }
    }

    #[test]
    fn test_enablement_truth_table() {
        let cases = [
            ("", "", Toggle::Unset, false),
            ("", "", Toggle::Enabled, false),
            ("", "", Toggle::Disabled, false),
            ("test", "", Toggle::Unset, false),
            ("test", "", Toggle::Disabled, false),
            ("test", "", Toggle::Enabled, false),
            ("", "test", Toggle::Unset, false),
            ("", "test", Toggle::Disabled, false),
            ("", "test", Toggle::Enabled, false),
            // opt-in by default
            ("test", "test", Toggle::Unset, true),
            ("test", "test", Toggle::Enabled, true),
            ("test", "test", Toggle::Disabled, false),
        ];

        for (i, (cluster_id, token, enabled, expected)) in cases.into_iter().enumerate() {
            assert_eq!(
                telemeter(cluster_id, token, enabled).is_enabled(),
                expected,
                "case {i}: clusterID={cluster_id:?} token={token:?} enabled={enabled:?}"
            );
        }
    }

    #[test]
    fn test_default_config_is_disabled() {
        assert!(!Config::new_default().telemeter_client_enabled());
    }

    #[test]
    fn test_load_credentials_only_when_missing() {
        let mut config = Config::parse("telemeterClient:\n  clusterID: configured\n", false).unwrap();

        config
            .load_cluster_id(|| panic!("configured cluster ID must not be reloaded"))
            .unwrap();
        config.load_token(|| Ok("from-pull-secret".to_string())).unwrap();

        let telemeter = &config.cluster_monitoring_configuration.telemeter_client;
        assert_eq!(telemeter.cluster_id, "configured");
        assert_eq!(telemeter.token, "from-pull-secret");
        assert!(config.telemeter_client_enabled());
    }

    #[test]
    fn test_load_credentials_failure() {
        let mut config = Config::new_default();
        let err = config.load_cluster_id(|| Err("cluster version not found".into())).unwrap_err();
        assert!(matches!(err, ConfigError::External { .. }));
        assert!(err.to_string().contains("cluster version not found"));
    }
}
