//! Declarations and the resolver seam.

use super::ast::{Ident, IdentId};
use crate::types::Location;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a declaration in a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

/// What kind of entity a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    /// Variable, parameter, or struct field.
    Var {
        /// Set for struct fields.
        #[serde(default)]
        field: bool,
    },
    /// Constant.
    Const,
    /// Function or method.
    Func,
    /// Named type.
    TypeName {
        /// Set when the underlying type is an interface.
        #[serde(default)]
        interface: bool,
    },
    /// Built-in function such as `len`.
    Builtin,
    /// Imported package name.
    PkgName,
    /// Statement label.
    Label,
    /// Predeclared `nil` or anything the front-end could not categorize.
    Other,
}

impl Entity {
    /// Short name used in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var { .. } => "var",
            Self::Const => "const",
            Self::Func => "func",
            Self::TypeName { .. } => "type",
            Self::Builtin => "builtin",
            Self::PkgName => "package name",
            Self::Label => "label",
            Self::Other => "other",
        }
    }
}

/// Scope a declaration lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// Package (file-level) scope; the only checkable scope.
    #[default]
    Package,
    /// A scope nested in a function, block, or signature.
    Local {
        /// Where the enclosing scope opens.
        opened_at: Location,
    },
    /// Not in any lexical scope: methods, fields, interface methods.
    Detached,
}

impl Scope {
    /// Returns true for package scope.
    #[must_use]
    pub fn is_package(&self) -> bool {
        matches!(self, Self::Package)
    }
}

/// A declared entity as resolved by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declared name.
    pub name: String,
    /// Entity kind.
    pub entity: Entity,
    /// Defining position; `None` when the front-end has no valid position.
    #[serde(default)]
    pub position: Option<Location>,
    /// Enclosing scope.
    #[serde(default)]
    pub scope: Scope,
    /// Owning package; `None` for predeclared entities.
    #[serde(default)]
    pub package: Option<String>,
    /// Generic declaration this one instantiates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<DeclId>,
}

impl Declaration {
    fn new(name: impl Into<String>, entity: Entity, position: Option<Location>) -> Self {
        Self {
            name: name.into(),
            entity,
            position,
            scope: Scope::Package,
            package: Some("main".to_string()),
            origin: None,
        }
    }

    /// Package-level function.
    #[must_use]
    pub fn func(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::Func, Some(position))
    }

    /// Method; methods carry no lexical scope.
    #[must_use]
    pub fn method(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::Func, Some(position)).in_scope(Scope::Detached)
    }

    /// Package-level variable.
    #[must_use]
    pub fn var(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::Var { field: false }, Some(position))
    }

    /// Struct field.
    #[must_use]
    pub fn field(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::Var { field: true }, Some(position)).in_scope(Scope::Detached)
    }

    /// Package-level constant.
    #[must_use]
    pub fn constant(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::Const, Some(position))
    }

    /// Package-level named type.
    #[must_use]
    pub fn type_name(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::TypeName { interface: false }, Some(position))
    }

    /// Package-level named interface type.
    #[must_use]
    pub fn interface(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::TypeName { interface: true }, Some(position))
    }

    /// Predeclared type such as `int` or `error`.
    #[must_use]
    pub fn predeclared_type(name: impl Into<String>) -> Self {
        let mut decl = Self::new(name, Entity::TypeName { interface: false }, None);
        decl.package = None;
        decl
    }

    /// Built-in function.
    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        let mut decl = Self::new(name, Entity::Builtin, None);
        decl.package = None;
        decl
    }

    /// Imported package name.
    #[must_use]
    pub fn package_name(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::PkgName, Some(position))
    }

    /// Statement label.
    #[must_use]
    pub fn label(name: impl Into<String>, position: Location) -> Self {
        Self::new(name, Entity::Label, Some(position))
    }

    /// Places the declaration in `scope`.
    #[must_use]
    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Places the declaration in a local scope opening at `opened_at`.
    #[must_use]
    pub fn local(self, opened_at: Location) -> Self {
        self.in_scope(Scope::Local { opened_at })
    }

    /// Marks the declaration as an instantiation of `origin`.
    #[must_use]
    pub fn instance_of(mut self, origin: DeclId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Drops the defining position.
    #[must_use]
    pub fn without_position(mut self) -> Self {
        self.position = None;
        self
    }
}

/// Maps identifier uses to their declarations.
///
/// This is the seam to the external name-resolution pass; tests supply
/// synthetic tables through [`SymbolTable`].
pub trait Resolver {
    /// Declaration an identifier use resolves to, if any.
    fn resolve(&self, ident: &Ident) -> Option<DeclId>;

    /// Looks up a declaration by id.
    fn declaration(&self, id: DeclId) -> Option<&Declaration>;

    /// Generic origin of `id`, or `id` itself when it is not an instantiation.
    fn origin(&self, id: DeclId) -> DeclId {
        self.declaration(id)
            .and_then(|decl| decl.origin)
            .unwrap_or(id)
    }
}

/// In-memory symbol table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    declarations: Vec<Declaration>,
    uses: HashMap<IdentId, DeclId>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration and returns its id.
    #[allow(clippy::cast_possible_truncation)] // ids are u32 on the wire
    pub fn declare(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.declarations.len() as u32);
        self.declarations.push(decl);
        id
    }

    /// Records that `ident` resolves to `decl`; returns the previous binding.
    pub fn bind(&mut self, ident: IdentId, decl: DeclId) -> Option<DeclId> {
        self.uses.insert(ident, decl)
    }

    /// All declarations in id order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// All use bindings.
    pub fn bindings(&self) -> impl Iterator<Item = (IdentId, DeclId)> + '_ {
        self.uses.iter().map(|(ident, decl)| (*ident, *decl))
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true when no declarations are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Returns true when `id` names a declaration in this table.
    #[must_use]
    pub fn contains(&self, id: DeclId) -> bool {
        (id.0 as usize) < self.declarations.len()
    }
}

impl Resolver for SymbolTable {
    fn resolve(&self, ident: &Ident) -> Option<DeclId> {
        self.uses.get(&ident.id).copied()
    }

    fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(id: u32) -> Ident {
        Ident {
            id: IdentId(id),
            name: "x".to_string(),
            line: 1,
            column: 1,
        }
    }

    #[test]
    fn resolve_follows_bindings() {
        let mut table = SymbolTable::new();
        let decl = table.declare(Declaration::var("x", Location::new("a.go", 2, 5)));
        table.bind(IdentId(7), decl);

        assert_eq!(table.resolve(&ident(7)), Some(decl));
        assert_eq!(table.resolve(&ident(8)), None);
        assert_eq!(
            table.declaration(decl).map(|d| d.name.as_str()),
            Some("x")
        );
    }

    #[test]
    fn origin_maps_instances_to_generic_declaration() {
        let mut table = SymbolTable::new();
        let generic = table.declare(Declaration::func("Map", Location::new("a.go", 3, 6)));
        let instance = table.declare(
            Declaration::func("Map", Location::new("a.go", 3, 6)).instance_of(generic),
        );
        assert_eq!(table.origin(instance), generic);
        assert_eq!(table.origin(generic), generic);
    }

    #[test]
    fn constructors_set_scope() {
        let loc = Location::new("a.go", 1, 1);
        assert!(Declaration::func("f", loc.clone()).scope.is_package());
        assert_eq!(Declaration::method("m", loc.clone()).scope, Scope::Detached);
        assert!(!Declaration::var("v", loc.clone()).local(loc).scope.is_package());
        assert_eq!(Declaration::predeclared_type("int").package, None);
    }
}
