//! Read-through accessors over the HTTP proxy settings.

use crate::config::loader::{BoxError, CollaboratorError, Config, ConfigError, Result};
use crate::config::schema::HttpConfig;

impl Config {
    pub fn http_proxy(&self) -> &str {
        &self.cluster_monitoring_configuration.http.http_proxy
    }

    pub fn https_proxy(&self) -> &str {
        &self.cluster_monitoring_configuration.http.https_proxy
    }

    pub fn no_proxy(&self) -> &str {
        &self.cluster_monitoring_configuration.http.no_proxy
    }

    /// Adopt the cluster-wide proxy settings when none were configured.
    pub fn load_proxy<F>(&mut self, load: F) -> Result<()>
    where
        F: FnOnce() -> std::result::Result<HttpConfig, BoxError>,
    {
        if !self.cluster_monitoring_configuration.http.is_empty() {
            return Ok(());
        }

        let proxy = load().map_err(|e| {
            ConfigError::external("failed to load cluster proxy", CollaboratorError::Failed(e))
        })?;
        tracing::debug!(
            http_proxy = %proxy.http_proxy,
            https_proxy = %proxy.https_proxy,
            no_proxy = %proxy.no_proxy,
            "Using cluster-wide proxy settings"
        );
        self.cluster_monitoring_configuration.http = proxy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_values_read_through() {
        let content = "http:\n  httpProxy: http://test.com\n  httpsProxy: https://test.com\n  noProxy: https://example.com\n";
        let config = Config::parse(content, false).unwrap();

        assert_eq!(config.http_proxy(), "http://test.com");
        assert_eq!(config.https_proxy(), "https://test.com");
        assert_eq!(config.no_proxy(), "https://example.com");
    }

    #[test]
    fn test_proxy_defaults_to_empty() {
        let config = Config::new_default();
        assert_eq!(config.http_proxy(), "");
        assert_eq!(config.https_proxy(), "");
        assert_eq!(config.no_proxy(), "");
    }

    #[test]
    fn test_load_proxy_keeps_configured_values() {
        let mut config = Config::parse("http:\n  noProxy: .cluster.local\n", false).unwrap();
        config
            .load_proxy(|| Ok(HttpConfig {
                http_proxy: "http://cluster-proxy:3128".into(),
                ..Default::default()
            }))
            .unwrap();

        assert_eq!(config.http_proxy(), "");
        assert_eq!(config.no_proxy(), ".cluster.local");
    }

    #[test]
    fn test_load_proxy_from_cluster() {
        let mut config = Config::new_default();
        config
            .load_proxy(|| Ok(HttpConfig {
                http_proxy: "http://cluster-proxy:3128".into(),
                https_proxy: "http://cluster-proxy:3128".into(),
                no_proxy: ".svc".into(),
            }))
            .unwrap();
        assert_eq!(config.https_proxy(), "http://cluster-proxy:3128");

        let mut config = Config::new_default();
        assert!(config.load_proxy(|| Err("proxy not readable".into())).is_err());
    }
}
