//! MergeService: orchestrates sources, applies merge policy, deserializes to RegistryConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::RegistryConfig;
use config::{ConfigError, File, Map};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from workspace and standard sources.
    /// Precedence: global file (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<RegistryConfig, ConfigError> {
        Self::load_with_env(workspace_root, None)
    }

    /// Same layering as [`MergeService::load`], reading `env_vars` in place of
    /// the process environment when given.
    pub fn load_with_env(
        workspace_root: &Path,
        env_vars: Option<Map<String, String>>,
    ) -> Result<RegistryConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(environment::source(env_vars));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<RegistryConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
