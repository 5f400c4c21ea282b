//! Configuration types for refdir.

use crate::policy::{Direction, Policy, RefKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for refdir.
///
/// ```toml
/// verbose = false
/// color = true
///
/// [directions]
/// func = "down"
/// type = "up"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Emit informational findings and resolved definition positions.
    pub verbose: bool,

    /// Colorize terminal output.
    pub color: bool,

    /// Per-kind direction settings.
    pub directions: Policy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
            directions: Policy::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Raw TOML form. Direction values stay strings until [`Config::parse`]
/// checks them, so a bad value is reported as [`ConfigError::InvalidDirection`].
#[derive(Debug, Deserialize)]
struct ConfigDto {
    #[serde(default)]
    verbose: bool,
    #[serde(default = "default_true")]
    color: bool,
    #[serde(default)]
    directions: DirectionsDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectionsDto {
    func: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
    #[serde(rename = "recvtype")]
    recv_type: Option<String>,
    var: Option<String>,
    #[serde(rename = "const")]
    constant: Option<String>,
}

impl DirectionsDto {
    fn entries(&self) -> [(RefKind, Option<&str>); 5] {
        [
            (RefKind::Func, self.func.as_deref()),
            (RefKind::Type, self.ty.as_deref()),
            (RefKind::RecvType, self.recv_type.as_deref()),
            (RefKind::Var, self.var.as_deref()),
            (RefKind::Const, self.constant.as_deref()),
        ]
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or names an unknown direction.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let dto: ConfigDto = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let mut config = Self {
            verbose: dto.verbose,
            color: dto.color,
            directions: Policy::default(),
        };
        for (kind, value) in dto.directions.entries() {
            if let Some(value) = value {
                config.set_direction(kind, value)?;
            }
        }
        Ok(config)
    }

    /// Returns the direction policy.
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.directions
    }

    /// Sets the direction for one kind from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDirection`] unless `value` is `down`, `up`, or `ignore`.
    pub fn set_direction(&mut self, kind: RefKind, value: &str) -> Result<(), ConfigError> {
        let direction: Direction = value.parse()?;
        self.directions.set(kind, direction);
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A direction value outside `down`, `up`, `ignore`.
    #[error("invalid direction {value:?}: must be up, down, or ignore")]
    InvalidDirection {
        /// The rejected value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.verbose);
        assert!(config.color);
        assert_eq!(config.policy(), Policy::default());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
verbose = true

[directions]
func = "up"
recvtype = "ignore"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert!(config.verbose);
        assert!(config.color);
        assert_eq!(config.policy().get(RefKind::Func), Direction::Up);
        assert_eq!(config.policy().get(RefKind::RecvType), Direction::Ignore);
        assert_eq!(config.policy().get(RefKind::Type), Direction::Up);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").expect("Failed to parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_direction_is_config_error() {
        let err = Config::parse("[directions]\nvar = \"sideways\"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDirection { ref value } if value == "sideways"
        ));
        assert!(err.to_string().contains("sideways"));

        let err = Config::parse("[directions]\nfunc = \"Down\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDirection { .. }));
    }

    #[test]
    fn test_unknown_kind_is_config_error() {
        let err = Config::parse("[directions]\nlabel = \"up\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_set_direction() {
        let mut config = Config::new();
        config
            .set_direction(RefKind::Const, "down")
            .expect("valid direction");
        assert_eq!(config.policy().get(RefKind::Const), Direction::Down);

        let err = config.set_direction(RefKind::Const, "left").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDirection { .. }));
        assert_eq!(config.policy().get(RefKind::Const), Direction::Down);
    }
}
