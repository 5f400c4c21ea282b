//! Reference classification over one file's tree.
//!
//! A single walk decides, for every identifier use, which [`RefKind`] governs
//! it or why it cannot be checked. Scope exclusion and the direct-recursion
//! exemption happen here too, before any position is compared.

use super::order::OrderChecker;
use crate::context::FileContext;
use crate::policy::RefKind;
use crate::program::{
    DeclId, Declaration, Entity, FuncDecl, Ident, Node, Resolver, Scope, Selection, TypeExpr,
};
use crate::reporter::Reporter;
use crate::types::Finding;
use tracing::warn;

/// What to do with one identifier use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classification {
    /// Compare against the position of `decl` under `kind`'s direction.
    Check {
        /// Governing kind.
        kind: RefKind,
        /// Declaration whose position is compared.
        decl: DeclId,
    },
    /// Not checkable; reported as info with this reason.
    Skip(String),
    /// Not reported at all.
    Silent,
}

/// Traversal state for the method declaration being visited.
///
/// Method declarations only occur at file level, so one record suffices.
#[derive(Debug, Default)]
struct FuncState {
    current: Option<DeclId>,
    before_signature: bool,
    receiver_type: Option<DeclId>,
}

pub(crate) struct ReferenceVisitor<'a, R: ?Sized, P: ?Sized> {
    ctx: FileContext<'a>,
    resolver: &'a R,
    checker: OrderChecker<'a>,
    reporter: &'a mut P,
    state: FuncState,
}

impl<'a, R, P> ReferenceVisitor<'a, R, P>
where
    R: Resolver + ?Sized,
    P: Reporter + ?Sized,
{
    pub(crate) fn new(
        ctx: FileContext<'a>,
        resolver: &'a R,
        checker: OrderChecker<'a>,
        reporter: &'a mut P,
    ) -> Self {
        Self {
            ctx,
            resolver,
            checker,
            reporter,
            state: FuncState::default(),
        }
    }

    pub(crate) fn visit_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.visit_node(node);
        }
    }

    fn visit_node(&mut self, node: &Node) {
        match node {
            Node::Def(_) => {}
            Node::Use(ident) => self.visit_use(ident, None),
            Node::Selector(sel) => {
                self.visit_node(&sel.operand);
                self.visit_use(&sel.member, sel.selection.as_ref());
            }
            Node::Func(func) => self.visit_func(func),
            Node::Group { children } => self.visit_nodes(children),
        }
    }

    fn visit_func(&mut self, func: &FuncDecl) {
        if self.state.current.is_some() {
            warn!(
                "nested declaration of {} at {}:{} visited as plain code",
                func.name.name,
                self.ctx.path.display(),
                func.name.line
            );
            self.visit_nodes(&func.receiver);
            self.visit_nodes(&func.signature);
            self.visit_nodes(&func.body);
            return;
        }

        self.enter_func(func.decl);
        self.visit_nodes(&func.receiver);
        self.state.before_signature = false;
        self.visit_nodes(&func.signature);
        self.visit_nodes(&func.body);
        self.leave_func();
    }

    fn enter_func(&mut self, decl: DeclId) {
        self.state = FuncState {
            current: Some(decl),
            before_signature: true,
            receiver_type: None,
        };
    }

    fn leave_func(&mut self) {
        self.state = FuncState::default();
    }

    fn visit_use(&mut self, ident: &Ident, selection: Option<&Selection>) {
        let classification = match self.resolver.resolve(ident) {
            Some(decl) => self.classify(ident, decl, selection),
            None => Classification::Skip(invalid_position(&ident.name)),
        };
        self.emit(ident, classification);
    }

    fn declaration(&self, id: DeclId) -> Option<&'a Declaration> {
        let resolver: &'a R = self.resolver;
        resolver.declaration(id)
    }

    pub(crate) fn classify(
        &mut self,
        ident: &Ident,
        id: DeclId,
        selection: Option<&Selection>,
    ) -> Classification {
        let name = ident.name.as_str();
        let Some(decl) = self.declaration(id) else {
            return Classification::Skip(invalid_position(name));
        };

        match decl.entity {
            Entity::Var { .. } => {
                let id = self.resolver.origin(id);
                let decl = self.declaration(id).unwrap_or(decl);
                if matches!(decl.entity, Entity::Var { field: true }) {
                    let at = decl
                        .position
                        .as_ref()
                        .map_or_else(|| "-".to_string(), ToString::to_string);
                    return Classification::Skip(format!(
                        "skipping var ident {name} for field {at}"
                    ));
                }
                match scope_skip("var", name, &decl.scope) {
                    Some(reason) => Classification::Skip(reason),
                    None => Classification::Check {
                        kind: RefKind::Var,
                        decl: id,
                    },
                }
            }

            Entity::Const => match scope_skip("const", name, &decl.scope) {
                Some(reason) => Classification::Skip(reason),
                None => Classification::Check {
                    kind: RefKind::Const,
                    decl: id,
                },
            },

            Entity::Func => self.classify_func(name, id, selection),

            Entity::TypeName { .. } => self.classify_type(name, id, decl),

            Entity::Builtin => Classification::Skip(format!("skipping builtin {name}")),
            Entity::PkgName => Classification::Skip(format!("skipping package name {name}")),
            Entity::Label => Classification::Skip(format!("skipping label {name}")),
            Entity::Other => Classification::Skip(format!(
                "unexpected ident def type {} for {name:?}",
                decl.entity.as_str()
            )),
        }
    }

    fn classify_func(
        &self,
        name: &str,
        id: DeclId,
        selection: Option<&Selection>,
    ) -> Classification {
        let target = self.resolver.origin(id);

        // Direct recursion, including through an instantiation of the enclosing generic.
        if let Some(current) = self.state.current {
            if self.resolver.origin(current) == target {
                return Classification::Silent;
            }
        }

        if let Some(selection) = selection {
            match selection.receiver.strip_pointers() {
                TypeExpr::Named { decl } if self.is_interface(*decl) => {
                    return Classification::Check {
                        kind: RefKind::Type,
                        decl: *decl,
                    };
                }
                TypeExpr::Interface => {
                    return Classification::Skip(format!(
                        "skipping interface method reference {name} on unnamed interface type"
                    ));
                }
                TypeExpr::TypeParam { name: param } => {
                    return Classification::Skip(format!(
                        "skipping method reference {name} on type parameter {param}"
                    ));
                }
                TypeExpr::Named { .. } | TypeExpr::Pointer { .. } | TypeExpr::Other => {}
            }
        }

        match self.declaration(target).map(|d| &d.scope) {
            Some(Scope::Local { opened_at }) => Classification::Skip(format!(
                "skipping func ident {name} with inner parent scope {opened_at}"
            )),
            _ => Classification::Check {
                kind: RefKind::Func,
                decl: target,
            },
        }
    }

    fn classify_type(&mut self, name: &str, id: DeclId, decl: &Declaration) -> Classification {
        if decl.package.is_none() {
            return Classification::Skip(format!("skipping predeclared type {name}"));
        }
        if let Some(reason) = scope_skip("type", name, &decl.scope) {
            return Classification::Skip(reason);
        }

        if self.state.current.is_some() {
            if self.state.before_signature && self.state.receiver_type.is_none() {
                self.state.receiver_type = Some(id);
                return Classification::Check {
                    kind: RefKind::RecvType,
                    decl: id,
                };
            }
            if self.state.receiver_type == Some(id) {
                return Classification::Silent;
            }
        }

        Classification::Check {
            kind: RefKind::Type,
            decl: id,
        }
    }

    fn is_interface(&self, id: DeclId) -> bool {
        self.declaration(id)
            .is_some_and(|d| matches!(d.entity, Entity::TypeName { interface: true }))
    }

    fn emit(&mut self, ident: &Ident, classification: Classification) {
        let at = self.ctx.location(ident.line, ident.column, &ident.name);
        let finding = match classification {
            Classification::Silent => return,
            Classification::Skip(reason) => Finding::info(at, reason),
            Classification::Check { kind, decl } => {
                match self.declaration(decl).and_then(|d| d.position.as_ref()) {
                    Some(def) => self.checker.check(at, &ident.name, def, kind),
                    None => Finding::info(at, invalid_position(&ident.name)),
                }
            }
        };
        self.reporter.report(finding);
    }
}

fn invalid_position(name: &str) -> String {
    format!("got invalid definition position for {name:?}")
}

/// Reason to skip a declaration outside package scope, if it is.
fn scope_skip(what: &str, name: &str, scope: &Scope) -> Option<String> {
    match scope {
        Scope::Package => None,
        Scope::Local { opened_at } => Some(format!(
            "skipping {what} ident {name} with inner parent scope {opened_at}"
        )),
        Scope::Detached => Some(format!(
            "skipping {what} ident {name} outside package scope"
        )),
    }
}
