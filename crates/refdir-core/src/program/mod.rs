//! Resolved-program adapter: the interface to the external front-end.
//!
//! # Architecture
//!
//! ```text
//! JSON text
//!   ↓ serde (DTO layer)
//! dto::ProgramDto
//!   ↓ load(): validate cross-references
//! Program { files, symbols: SymbolTable }
//!   ↓ Resolver trait
//! engine
//! ```

use std::path::{Path, PathBuf};

pub mod ast;
pub mod builder;
pub mod dto;
pub mod symbols;

pub use ast::{
    FuncDecl, Ident, IdentId, Node, Position, Selection, Selector, SourceFile, TypeExpr,
};
pub use builder::ProgramBuilder;
pub use symbols::{DeclId, Declaration, Entity, Resolver, Scope, SymbolTable};

/// Errors from loading the front-end's output.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// IO error reading a program document.
    #[error("Failed to read program {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Malformed program document.
    #[error("Failed to parse program: {0}")]
    Json(#[from] serde_json::Error),

    /// The document carries no symbol table.
    #[error("resolution pass unavailable: program has no symbol table")]
    MissingResolution,

    /// A reference to a declaration id the table does not hold.
    #[error("{context} refers to unknown declaration #{id}")]
    DanglingDeclaration {
        /// The missing id.
        id: u32,
        /// Where the reference was found.
        context: String,
    },

    /// The same identifier occurrence bound twice.
    #[error("identifier #{0} is bound more than once")]
    DuplicateBinding(u32),
}

/// A resolved program: syntax trees plus the resolution pass's symbol table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Source files.
    pub files: Vec<SourceFile>,
    /// Symbol table shared by all files.
    pub symbols: SymbolTable,
}

impl Program {
    /// Loads a program document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, AdapterError> {
        let content = std::fs::read_to_string(path).map_err(|e| AdapterError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates a program document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, the symbol table is missing,
    /// or any declaration id is dangling.
    pub fn from_json(content: &str) -> Result<Self, AdapterError> {
        let dto: dto::ProgramDto = serde_json::from_str(content)?;
        load(dto)
    }

    /// Serializes the program back into its document form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, AdapterError> {
        let mut uses: Vec<dto::BindingDto> = self
            .symbols
            .bindings()
            .map(|(ident, decl)| dto::BindingDto { ident, decl })
            .collect();
        uses.sort_by_key(|b| b.ident);
        let dto = dto::ProgramDto {
            files: self.files.clone(),
            symbols: Some(dto::SymbolTableDto {
                declarations: self.symbols.declarations().to_vec(),
                uses,
            }),
        };
        Ok(serde_json::to_string_pretty(&dto)?)
    }
}

/// Converts a DTO into a validated [`Program`].
///
/// # Errors
///
/// Returns an error if the symbol table is missing or any declaration id is dangling.
pub fn load(dto: dto::ProgramDto) -> Result<Program, AdapterError> {
    let raw = dto.symbols.ok_or(AdapterError::MissingResolution)?;

    let mut symbols = SymbolTable::new();
    for decl in raw.declarations {
        symbols.declare(decl);
    }

    for (index, decl) in symbols.declarations().iter().enumerate() {
        if let Some(origin) = decl.origin {
            ensure_declared(&symbols, origin, || {
                format!("origin of declaration #{index} ({})", decl.name)
            })?;
        }
    }

    for binding in raw.uses {
        ensure_declared(&symbols, binding.decl, || {
            format!("binding of identifier #{}", binding.ident.0)
        })?;
        if symbols.bind(binding.ident, binding.decl).is_some() {
            return Err(AdapterError::DuplicateBinding(binding.ident.0));
        }
    }

    for file in &dto.files {
        for node in &file.nodes {
            validate_node(&symbols, &file.path, node)?;
        }
    }

    Ok(Program {
        files: dto.files,
        symbols,
    })
}

fn ensure_declared(
    symbols: &SymbolTable,
    id: DeclId,
    context: impl FnOnce() -> String,
) -> Result<(), AdapterError> {
    if symbols.contains(id) {
        Ok(())
    } else {
        Err(AdapterError::DanglingDeclaration {
            id: id.0,
            context: context(),
        })
    }
}

fn validate_node(symbols: &SymbolTable, path: &Path, node: &Node) -> Result<(), AdapterError> {
    match node {
        Node::Def(_) | Node::Use(_) => Ok(()),
        Node::Group { children } => children
            .iter()
            .try_for_each(|child| validate_node(symbols, path, child)),
        Node::Selector(sel) => {
            validate_node(symbols, path, &sel.operand)?;
            if let Some(selection) = &sel.selection {
                if let TypeExpr::Named { decl } = selection.receiver.strip_pointers() {
                    ensure_declared(symbols, *decl, || {
                        format!(
                            "selection receiver at {}:{}:{}",
                            path.display(),
                            sel.member.line,
                            sel.member.column
                        )
                    })?;
                }
            }
            Ok(())
        }
        Node::Func(func) => {
            ensure_declared(symbols, func.decl, || {
                format!(
                    "declaration of {} at {}:{}",
                    func.name.name,
                    path.display(),
                    func.name.line
                )
            })?;
            func.receiver
                .iter()
                .chain(&func.signature)
                .chain(&func.body)
                .try_for_each(|child| validate_node(symbols, path, child))
        }
    }
}
