//! JSON deserialization types (DTO layer).
//!
//! These types exist solely for serde. They are converted to the domain
//! [`Program`](super::Program) by [`load`](super::load), which validates
//! every cross-reference into the symbol table.

use super::ast::{IdentId, SourceFile};
use super::symbols::{DeclId, Declaration};
use serde::{Deserialize, Serialize};

/// Raw JSON representation of a resolved program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramDto {
    /// Source files in the order the front-end produced them.
    #[serde(default)]
    pub files: Vec<SourceFile>,

    /// Output of the resolution pass; missing when it did not run.
    #[serde(default)]
    pub symbols: Option<SymbolTableDto>,
}

/// Raw JSON representation of a symbol table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTableDto {
    /// Declarations; a declaration's index is its [`DeclId`].
    #[serde(default)]
    pub declarations: Vec<Declaration>,

    /// Identifier-use bindings.
    #[serde(default)]
    pub uses: Vec<BindingDto>,
}

/// One identifier-use binding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BindingDto {
    /// The identifier occurrence.
    pub ident: IdentId,
    /// The declaration it resolves to.
    pub decl: DeclId,
}
