use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    info!(
        "Remap tables: {} dpids, {} stations, {} docker hosts",
        config.remap.dpids.len(),
        config.remap.stations.len(),
        config.remap.docker_hosts.len()
    );

    config.validate()?;

    Ok(config)
}

/// Load the file if one was given, otherwise fall back to defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// CLI arguments that take precedence over the YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub controller: Option<String>,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(controller) = &overrides.controller {
        info!("Controller override: {}", controller);
        config.controller.base_url = controller.clone();
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
