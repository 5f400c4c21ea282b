//! Configuration file resolution with global fallback.
//!
//! Priority order:
//!
//! 1. `--config` flag (explicit path, trusted as-is)
//! 2. `refdir.toml` or `.refdir.toml` in the working directory or any parent,
//!    stopping at the directory holding `go.mod`
//! 3. `$REFDIR_CONFIG_DIR/config.toml`, else `~/.refdir/config.toml`
//! 4. Defaults

use std::fmt;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found walking up from the working directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (--config)", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Global(p) => write!(f, "{} (global)", p.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["refdir.toml", ".refdir.toml"];
const GLOBAL_CONFIG_NAME: &str = "config.toml";
const MODULE_MARKER: &str = "go.mod";

/// Resolves the configuration file for a run started in `start_dir`.
#[must_use]
pub fn resolve(start_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let source = resolve_inner(start_dir, explicit, global_config_dir());
    tracing::debug!("Configuration: {source}");
    source
}

/// Takes `global_dir` as a parameter so tests need not touch the environment.
fn resolve_inner(
    start_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(start_dir) {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

fn find_project_config(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }
        if dir.join(MODULE_MARKER).is_file() {
            break;
        }
    }
    None
}

/// Returns the global config directory: `$REFDIR_CONFIG_DIR`, else `~/.refdir/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("REFDIR_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".refdir"))
}
