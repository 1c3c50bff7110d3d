use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::fetch::http::DEFAULT_TIMEOUT;
use crate::routing::UnmeasuredPolicy;
use crate::topology::RemapTables;

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub controller: ControllerConfig,
    pub remap: RemapTables,
    pub routing: RoutingConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.controller.validate()?;
        self.routing.validate()?;
        Self::validate_remap(&self.remap)
    }

    fn validate_remap(remap: &RemapTables) -> Result<(), ValidationError> {
        let tables = [
            ("dpids", &remap.dpids),
            ("stations", &remap.stations),
            ("docker_hosts", &remap.docker_hosts),
        ];
        for (name, table) in tables {
            if let Some((key, _)) = table.iter().find(|(_, label)| label.trim().is_empty()) {
                return Err(ValidationError::InvalidRemap(format!(
                    "{} entry '{}' maps to an empty label",
                    name, key
                )));
            }
        }

        let stations: HashSet<&String> = remap.stations.values().collect();
        if let Some(label) = remap.docker_hosts.values().find(|l| stations.contains(l)) {
            return Err(ValidationError::InvalidRemap(format!(
                "label '{}' is both a station and a docker host",
                label
            )));
        }

        Ok(())
    }
}

/// Where the controller lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub base_url: String,
    pub links_path: String,
    pub devices_path: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl ControllerConfig {
    pub fn links_url(&self) -> String {
        join_url(&self.base_url, &self.links_path)
    }

    pub fn devices_url(&self) -> String {
        join_url(&self.base_url, &self.devices_path)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::InvalidController(
                "base_url cannot be empty".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidController(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ValidationError::InvalidController(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Path ranking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// What an unmeasured link does to its path's cost
    pub unmeasured_links: UnmeasuredPolicy,
    /// Cost added per unmeasured link under the `penalize` policy
    pub unmeasured_penalty: u64,
    pub max_telemetry_workers: usize,
    /// Budget for all telemetry fetches of one optimal-path query
    #[serde(with = "humantime_serde")]
    pub deadline: Duration,
}

impl RoutingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_telemetry_workers == 0 {
            return Err(ValidationError::InvalidRouting(
                "max_telemetry_workers must be at least 1".to_string(),
            ));
        }
        if self.deadline.is_zero() {
            return Err(ValidationError::InvalidRouting(
                "deadline must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid controller configuration: {0}")]
    InvalidController(String),
    #[error("Invalid remap configuration: {0}")]
    InvalidRemap(String),
    #[error("Invalid routing configuration: {0}")]
    InvalidRouting(String),
}

/// Default implementations
impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            links_path: "/wm/topology/links/json".to_string(),
            devices_path: "/wm/device/".to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            unmeasured_links: UnmeasuredPolicy::Zero,
            unmeasured_penalty: 1_000_000_000,
            max_telemetry_workers: 8,
            deadline: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.controller.links_url(), "http://localhost:8080/wm/topology/links/json");
        assert_eq!(config.controller.devices_url(), "http://localhost:8080/wm/device/");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
controller:
  base_url: "http://10.0.0.100:8080/"
  request_timeout: 2s
routing:
  unmeasured_links: penalize
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.controller.request_timeout, Duration::from_secs(2));
        assert_eq!(config.controller.links_url(), "http://10.0.0.100:8080/wm/topology/links/json");
        assert_eq!(config.routing.unmeasured_links, UnmeasuredPolicy::Penalize);
        assert_eq!(config.routing.max_telemetry_workers, 8);
        assert!(config.remap.dpids.is_empty());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = Config::default();
        config.controller.base_url = "localhost:8080".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidController(_))));
    }

    #[test]
    fn test_rejects_zero_workers() {
        let mut config = Config::default();
        config.routing.max_telemetry_workers = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidRouting(_))));
    }

    #[test]
    fn test_rejects_conflicting_remap_labels() {
        let mut config = Config::default();
        config.remap.stations.insert("10.0.0.2".to_string(), "x1".to_string());
        config.remap.docker_hosts.insert("10.0.0.3".to_string(), "x1".to_string());
        assert!(matches!(config.validate(), Err(ValidationError::InvalidRemap(_))));

        config.remap.docker_hosts.clear();
        config.remap.dpids.insert("1".to_string(), " ".to_string());
        assert!(config.validate().is_err());
    }
}
