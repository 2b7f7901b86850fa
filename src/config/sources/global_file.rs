//! Global config file source: `$XDG_CONFIG_HOME/cityreg/config.toml`

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};

/// Add the global config file to builder when it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Ok(config_home) = xdg::config_home() else {
        return Ok(builder);
    };
    let path = config_home.join("cityreg").join("config.toml");
    Ok(builder.add_source(File::from(path).required(false)))
}
