//! `phasec config` subcommands.

use std::path::Path;

use anyhow::{Result, bail};

use phasec_core::Provider;

use crate::ConfigCommands;
use crate::config::{self, CliOverrides, ConfigFile, PhasecConfig};

/// Dispatch a `ConfigCommands` variant to the appropriate handler.
pub fn run_config_command(command: ConfigCommands, overrides: &CliOverrides) -> Result<()> {
    match command {
        ConfigCommands::Init { provider, force } => {
            let path = config::config_path();
            write_default_config(&path, provider, force)?;
            println!("Config written to {}", path.display());
            println!("Next: export {} and run `phasec init`.", provider.default_api_key_env());
            Ok(())
        }
        ConfigCommands::Show => {
            let path = config::config_path();
            let file = config::load_config_from(&path)?;
            let found = if file.is_some() { "" } else { " (not found)" };
            let resolved = PhasecConfig::resolve_with(overrides, file.as_ref())?;
            println!("config file: {}{found}", path.display());
            print!("{}", render(&resolved));
            Ok(())
        }
    }
}

fn write_default_config(path: &Path, provider: Provider, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }
    config::save_config_to(path, &ConfigFile::with_defaults(provider))
}

fn render(config: &PhasecConfig) -> String {
    let g = &config.generator;
    let key_state = if g.api_key().is_ok() { "set" } else { "not set" };
    let mut out = String::with_capacity(256);
    out.push_str(&format!("workspace.dir = {}\n", config.workspace_dir.display()));
    out.push_str(&format!("generator.provider = {}\n", g.provider));
    out.push_str(&format!("generator.model = {}\n", g.model));
    out.push_str(&format!("generator.api_key_env = {} ({key_state})\n", g.api_key_env));
    out.push_str(&format!("generator.base_url = {}\n", g.base_url));
    out.push_str(&format!("generator.max_tokens = {}\n", g.max_tokens));
    out.push_str(&format!("generator.timeout_secs = {}\n", g.timeout.as_secs()));
    out
}
