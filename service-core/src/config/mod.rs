use config::{Config as Cfg, ConfigBuilder, Environment, File, builder::DefaultState};
use std::path::Path;

/// Standard source stack shared by the services: `.env`, then an optional
/// YAML file, then `APP__*` environment variables (`APP__SERVER__PORT`).
///
/// Callers add service-specific overrides before building.
pub fn layered(config_file: &Path) -> ConfigBuilder<DefaultState> {
    dotenvy::dotenv().ok();

    Cfg::builder()
        .add_source(File::from(config_file).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
}

/// Resolve the service's `config/` directory whether the binary runs from the
/// workspace root or from the crate directory.
pub fn config_directory(crate_dir: &str) -> std::io::Result<std::path::PathBuf> {
    let base_path = std::env::current_dir()?;

    if base_path.ends_with(crate_dir) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(crate_dir).join("config"))
    }
}
