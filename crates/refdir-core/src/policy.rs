//! Reference kinds, directions, and the policy mapping one to the other.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Category of a reference, selecting which direction setting governs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// Reference to a function or method.
    Func,
    /// Reference to a named type, other than the receiver type of the enclosing method.
    Type,
    /// Reference to the receiver type in a method's receiver clause.
    RecvType,
    /// Reference to a package-level variable.
    Var,
    /// Reference to a package-level constant.
    Const,
}

impl RefKind {
    /// All reference kinds, in configuration order.
    pub const ALL: [Self; 5] = [
        Self::Func,
        Self::Type,
        Self::RecvType,
        Self::Var,
        Self::Const,
    ];

    /// Returns the configuration name of this kind (e.g., `"recvtype"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Func => "func",
            Self::Type => "type",
            Self::RecvType => "recvtype",
            Self::Var => "var",
            Self::Const => "const",
        }
    }

    /// Returns a one-line description of which references this kind covers.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Func => "direction of references to functions and methods",
            Self::Type => {
                "direction of type references, excluding references to the receiver type"
            }
            Self::RecvType => "direction of references to the receiver type",
            Self::Var => "direction of references to var declarations",
            Self::Const => "direction of references to const declarations",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a reference may sit relative to its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The reference may precede the declaration (the declaration comes later).
    Down,
    /// The reference must follow the declaration.
    Up,
    /// No ordering check; references are reported informationally.
    Ignore,
}

impl Direction {
    /// All valid directions.
    pub const ALL: [Self; 3] = [Self::Down, Self::Up, Self::Ignore];

    /// Returns the configuration name of this direction.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::Ignore => "ignore",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "down" => Ok(Self::Down),
            "up" => Ok(Self::Up),
            "ignore" => Ok(Self::Ignore),
            other => Err(ConfigError::InvalidDirection {
                value: other.to_string(),
            }),
        }
    }
}

/// Direction setting for every [`RefKind`].
///
/// Built once from configuration before analysis starts; the analyzer only
/// ever reads it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Direction for [`RefKind::Func`].
    pub func: Direction,
    /// Direction for [`RefKind::Type`].
    #[serde(rename = "type")]
    pub ty: Direction,
    /// Direction for [`RefKind::RecvType`].
    #[serde(rename = "recvtype")]
    pub recv_type: Direction,
    /// Direction for [`RefKind::Var`].
    pub var: Direction,
    /// Direction for [`RefKind::Const`].
    #[serde(rename = "const")]
    pub constant: Direction,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            func: Direction::Down,
            ty: Direction::Up,
            recv_type: Direction::Up,
            var: Direction::Up,
            constant: Direction::Up,
        }
    }
}

impl Policy {
    /// Returns the direction configured for `kind`.
    #[must_use]
    pub fn get(&self, kind: RefKind) -> Direction {
        match kind {
            RefKind::Func => self.func,
            RefKind::Type => self.ty,
            RefKind::RecvType => self.recv_type,
            RefKind::Var => self.var,
            RefKind::Const => self.constant,
        }
    }

    /// Sets the direction for `kind`.
    pub fn set(&mut self, kind: RefKind, direction: Direction) {
        let slot = match kind {
            RefKind::Func => &mut self.func,
            RefKind::Type => &mut self.ty,
            RefKind::RecvType => &mut self.recv_type,
            RefKind::Var => &mut self.var,
            RefKind::Const => &mut self.constant,
        };
        *slot = direction;
    }

    /// Returns a copy with `kind` set to `direction`.
    #[must_use]
    pub fn with(mut self, kind: RefKind, direction: Direction) -> Self {
        self.set(kind, direction);
        self
    }
}
