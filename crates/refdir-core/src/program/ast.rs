//! Resolved syntax tree handed over by the front-end.
//!
//! The tree keeps only what ordering analysis needs: identifiers (split into
//! definitions and uses), member-access expressions with their selection
//! receiver type, and function/method declarations with the receiver clause
//! separated from the signature. Every other construct is a [`Node::Group`].

use super::symbols::DeclId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity of one identifier occurrence within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentId(pub u32);

/// An identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    /// Occurrence identity, the key the resolver is queried with.
    pub id: IdentId,
    /// Identifier text.
    pub name: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// Identifier naming the entity being declared at this point.
    Def(Ident),
    /// Identifier referring to an entity declared elsewhere.
    Use(Ident),
    /// Member access `operand.member`.
    Selector(Selector),
    /// Function or method declaration.
    Func(FuncDecl),
    /// Any other construct; only its children matter.
    Group {
        /// Child nodes in source order.
        children: Vec<Node>,
    },
}

impl Node {
    /// Wraps `children` in a [`Node::Group`].
    #[must_use]
    pub fn group(children: Vec<Node>) -> Self {
        Self::Group { children }
    }
}

/// Member access expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Expression left of the dot.
    pub operand: Box<Node>,
    /// Identifier right of the dot.
    pub member: Ident,
    /// Method or field selection, absent for package-qualified identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

/// How a member access was resolved by the type checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Static type of the operand.
    pub receiver: TypeExpr,
}

/// Static type of a selection receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeExpr {
    /// Pointer to another type.
    Pointer {
        /// Pointee type.
        elem: Box<TypeExpr>,
    },
    /// A declared (named) type.
    Named {
        /// Declaration of the type name.
        decl: DeclId,
    },
    /// An unnamed interface type literal.
    Interface,
    /// A type parameter.
    TypeParam {
        /// Type parameter name.
        name: String,
    },
    /// Any other type.
    Other,
}

impl TypeExpr {
    /// Strips every level of pointer indirection.
    #[must_use]
    pub fn strip_pointers(&self) -> &Self {
        let mut ty = self;
        while let Self::Pointer { elem } = ty {
            ty = elem;
        }
        ty
    }

    /// Pointer to `self`.
    #[must_use]
    pub fn pointer(self) -> Self {
        Self::Pointer {
            elem: Box::new(self),
        }
    }
}

/// Function or method declaration.
///
/// Children are visited in source order: `receiver`, `name`, `signature`, `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncDecl {
    /// The declared name.
    pub name: Ident,
    /// Declaration the name defines.
    pub decl: DeclId,
    /// Receiver clause; empty for plain functions.
    #[serde(default)]
    pub receiver: Vec<Node>,
    /// Type parameters, parameters and results.
    #[serde(default)]
    pub signature: Vec<Node>,
    /// Function body.
    #[serde(default)]
    pub body: Vec<Node>,
}

/// A 1-indexed line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number.
    pub line: usize,
    /// Column number.
    pub column: usize,
}

/// One source file of a resolved program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path as reported by the front-end; declaration positions use the same form.
    pub path: PathBuf,
    /// Set when the front-end detected a generated-code marker.
    #[serde(default)]
    pub generated: bool,
    /// Position of the `package` clause, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Position>,
    /// Full file contents, used for rich diagnostics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Top-level nodes in source order.
    #[serde(default)]
    pub nodes: Vec<Node>,
}
