//! Configuration file management for phasec.
//!
//! Provides a TOML-based config file at `~/.config/phasec/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use phasec_core::{GeneratorConfig, Provider};

/// Workspace directory used when nothing else is configured.
pub const DEFAULT_WORKSPACE_DIR: &str = "phasecompiler";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub workspace: WorkspaceSection,
    #[serde(default)]
    pub generator: GeneratorSection,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Backend settings. Absent keys fall back to the provider's defaults.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// A file with every key spelled out at its default value.
    pub fn with_defaults(provider: Provider) -> Self {
        let g = GeneratorConfig::for_provider(provider);
        Self {
            workspace: WorkspaceSection {
                dir: Some(PathBuf::from(DEFAULT_WORKSPACE_DIR)),
            },
            generator: GeneratorSection {
                provider: Some(provider),
                model: Some(g.model),
                api_key_env: Some(g.api_key_env),
                base_url: Some(g.base_url),
                max_tokens: Some(g.max_tokens),
                timeout_secs: Some(g.timeout.as_secs()),
            },
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the phasec config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/phasec` or `~/.config/phasec`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("phasec");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("phasec")
}

/// Return the path to the phasec config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`. A missing file is `None`.
pub fn load_config_from(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file to `path`, creating parent dirs.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Overrides given on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub dir: Option<PathBuf>,
    pub provider: Option<Provider>,
    pub model: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasecConfig {
    pub workspace_dir: PathBuf,
    pub generator: GeneratorConfig,
}

impl PhasecConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = load_config_from(&config_path())?;
        Self::resolve_with(cli, file.as_ref())
    }

    /// Resolve against an already-loaded config file.
    ///
    /// - Workspace dir: `--dir` > `PHASEC_DIR` > `[workspace].dir` > `phasecompiler`
    /// - Provider: `--provider` > `PHASEC_PROVIDER` > `[generator].provider` > anthropic
    /// - Model: `--model` > `PHASEC_MODEL` > `[generator].model` > provider default
    ///
    /// The file's `model`, `api_key_env` and `base_url` only apply when the
    /// resolved provider is the one the file names.
    pub fn resolve_with(cli: &CliOverrides, file: Option<&ConfigFile>) -> Result<Self> {
        let workspace_dir = if let Some(dir) = &cli.dir {
            dir.clone()
        } else if let Ok(dir) = std::env::var("PHASEC_DIR") {
            PathBuf::from(dir)
        } else if let Some(dir) = file.and_then(|f| f.workspace.dir.clone()) {
            dir
        } else {
            PathBuf::from(DEFAULT_WORKSPACE_DIR)
        };

        let section = file.map(|f| &f.generator);
        let file_provider = section.and_then(|g| g.provider).unwrap_or(Provider::Anthropic);

        let provider = if let Some(p) = cli.provider {
            p
        } else if let Ok(p) = std::env::var("PHASEC_PROVIDER") {
            p.parse::<Provider>()
                .context("PHASEC_PROVIDER env var is not a known provider")?
        } else {
            file_provider
        };

        let mut generator = GeneratorConfig::for_provider(provider);

        if let Some(g) = section {
            if provider == file_provider {
                if let Some(model) = &g.model {
                    generator.model = model.clone();
                }
                if let Some(var) = &g.api_key_env {
                    generator.api_key_env = var.clone();
                }
                if let Some(url) = &g.base_url {
                    generator.base_url = url.clone();
                }
            }
            if let Some(max_tokens) = g.max_tokens {
                generator.max_tokens = max_tokens;
            }
            if let Some(secs) = g.timeout_secs {
                generator.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(model) = &cli.model {
            generator.model = model.clone();
        } else if let Ok(model) = std::env::var("PHASEC_MODEL") {
            generator.model = model;
        }

        Ok(Self {
            workspace_dir,
            generator,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
