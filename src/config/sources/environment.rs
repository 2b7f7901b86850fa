//! Environment variable source: CITYREG_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::Map;

/// Prefix for environment overrides, e.g. `CITYREG__REGISTRY__ADMIN`.
pub const ENV_PREFIX: &str = "CITYREG";

/// Add environment variable overlay to builder.
/// Uses CITYREG_ prefix and __ as separator for nested keys.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(source(None)))
}

/// Environment source reading `vars` instead of the process environment when given.
///
/// Values stay strings; typed fields are converted on deserialize, so
/// digit-only addresses are never reparsed as numbers.
pub fn source(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .source(vars)
}
