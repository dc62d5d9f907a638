use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::expand_tilde;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_FORGE_URL: &str = "https://github.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forge_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Where new project folders live and forks get cloned.
    pub projects_dir: PathBuf,
    pub branch: String,
    pub remote: String,
    pub forge_url: String,
    pub browser_command: Option<String>,
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", "git-push-helper")
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn default_projects_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.desktop_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| expand_tilde("~/Desktop"))
}

/// A missing config file is not an error: every setting has a default.
pub fn load_config_or_default(path: &Path) -> Result<ResolvedConfig> {
    if !path.exists() {
        return resolve(Config::default());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<ResolvedConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("invalid config at {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<ResolvedConfig> {
    let raw: Config = toml::from_str(contents).context("failed to parse config TOML")?;
    resolve(raw)
}

fn resolve(raw: Config) -> Result<ResolvedConfig> {
    let projects_dir = match raw.general.projects_dir.as_deref() {
        Some(dir) if !dir.trim().is_empty() => expand_tilde(dir.trim()),
        Some(_) => bail!("projects_dir must not be empty"),
        None => default_projects_dir(),
    };

    let branch = raw
        .general
        .branch
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    validate_name("branch", &branch)?;

    let remote = raw
        .general
        .remote
        .unwrap_or_else(|| DEFAULT_REMOTE.to_string());
    validate_name("remote", &remote)?;

    let forge_url = raw
        .general
        .forge_url
        .unwrap_or_else(|| DEFAULT_FORGE_URL.to_string());
    if !(forge_url.starts_with("https://") || forge_url.starts_with("http://")) {
        bail!(
            "forge_url must start with http:// or https:// (got {:?})",
            forge_url
        );
    }
    let forge_url = forge_url.trim_end_matches('/').to_string();

    let browser_command = raw
        .browser
        .command
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(ResolvedConfig {
        projects_dir,
        branch,
        remote,
        forge_url,
        browser_command,
    })
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("{} must not be empty", field);
    }
    if value.chars().any(char::is_whitespace) {
        bail!("{} must not contain whitespace (got {:?})", field, value);
    }
    Ok(())
}

/// The file `--write-config` produces: every default spelled out.
pub fn default_config_file() -> Config {
    Config {
        general: GeneralConfig {
            projects_dir: Some(default_projects_dir().display().to_string()),
            branch: Some(DEFAULT_BRANCH.to_string()),
            remote: Some(DEFAULT_REMOTE.to_string()),
            forge_url: Some(DEFAULT_FORGE_URL.to_string()),
        },
        browser: BrowserConfig::default(),
    }
}

pub fn write_config_atomic(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "config already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(config).context("failed to serialize config")?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, &content)
        .with_context(|| format!("failed to write temp config to {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename config to {}", path.display()))?;

    Ok(())
}
