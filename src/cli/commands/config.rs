//! Config file commands.

use std::path::{Path, PathBuf};

use crate::config::{self, Config, ConfigError};

use super::ConfigAction;

pub fn cmd_config(
    current: &Config,
    explicit: Option<&Path>,
    action: &ConfigAction,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init { force } => {
            let path = init(explicit, *force)?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(current)?);
        }
    }
    Ok(())
}

/// Write the default config to `explicit`, or to the standard location.
fn init(explicit: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let defaults = Config::default();
    match explicit {
        Some(path) => config::save_to(&defaults, path)?,
        None => config::save(&defaults)?,
    }
    Ok(path)
}
