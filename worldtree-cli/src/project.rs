use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use worldtree_camera::CameraConfig;

/// Project-local config location, relative to a project directory.
const PROJECT_CONFIG: &str = ".worldtree/camera.toml";
/// User config location, relative to the platform config dir.
const USER_CONFIG: &str = "worldtree/camera.toml";

/// Where the effective config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config`
    Explicit(PathBuf),
    /// Found walking up from the working directory
    Project(PathBuf),
    /// The user's config directory
    User(PathBuf),
    /// No file; built-in defaults
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{}", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::User(p) => write!(f, "{} (user)", p.display()),
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// The resolved configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: CameraConfig,
    pub source: ConfigSource,
}

/// Resolve the config from `--config`, the current directory, or the user config dir.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<LoadedConfig> {
    let user_dir = dirs::config_dir();
    load_config_from(explicit, &std::env::current_dir()?, user_dir.as_deref())
}

/// Resolve the config starting from a specific directory, walking up.
pub fn load_config_from(
    explicit: Option<&Path>,
    start: &Path,
    user_dir: Option<&Path>,
) -> anyhow::Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(LoadedConfig {
            config: read_config(path)?,
            source: ConfigSource::Explicit(path.to_path_buf()),
        });
    }

    if let Some(path) = find_project_config(start) {
        return Ok(LoadedConfig {
            config: read_config(&path)?,
            source: ConfigSource::Project(path),
        });
    }

    if let Some(path) = user_dir.map(|d| d.join(USER_CONFIG)).filter(|p| p.exists()) {
        return Ok(LoadedConfig {
            config: read_config(&path)?,
            source: ConfigSource::User(path),
        });
    }

    Ok(LoadedConfig {
        config: CameraConfig::default(),
        source: ConfigSource::Defaults,
    })
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(PROJECT_CONFIG);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<CameraConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: CameraConfig =
        toml::from_str(&content).with_context(|| format!("Invalid camera config in {}", path.display()))?;
    Ok(config)
}
