//! Programmatic construction of resolved programs.
//!
//! Lets tests and embedders assemble a [`Program`] without a real front-end.
//!
//! ```
//! use refdir_core::program::{Declaration, ProgramBuilder};
//! use refdir_core::Location;
//!
//! let mut b = ProgramBuilder::new();
//! let helper = b.declare(Declaration::func("Helper", Location::new("main.go", 10, 6)));
//! let top = b.declare(Declaration::func("Top", Location::new("main.go", 3, 6)));
//! let call = b.use_of(helper, 4, 2);
//! let top_fn = b.func(top, vec![], vec![], vec![call]);
//! let helper_fn = b.func(helper, vec![], vec![], vec![]);
//! b.file("main.go", vec![top_fn, helper_fn]);
//! let program = b.build();
//! assert_eq!(program.files.len(), 1);
//! ```

use super::ast::{
    FuncDecl, Ident, IdentId, Node, Position, Selection, Selector, SourceFile, TypeExpr,
};
use super::symbols::{DeclId, Declaration, Resolver};
use super::Program;
use std::path::PathBuf;

/// Builder for [`Program`].
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    next_ident: u32,
}

impl ProgramBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration to the symbol table.
    pub fn declare(&mut self, decl: Declaration) -> DeclId {
        self.program.symbols.declare(decl)
    }

    fn ident(&mut self, name: &str, line: usize, column: usize) -> Ident {
        let id = IdentId(self.next_ident);
        self.next_ident += 1;
        Ident {
            id,
            name: name.to_string(),
            line,
            column,
        }
    }

    fn name_of(&self, decl: DeclId) -> String {
        self.program
            .symbols
            .declaration(decl)
            .map(|d| d.name.clone())
            .unwrap_or_default()
    }

    /// A defining identifier; never resolved.
    pub fn def(&mut self, name: &str, line: usize, column: usize) -> Node {
        Node::Def(self.ident(name, line, column))
    }

    /// An identifier use at `line:column` resolving to `decl`.
    pub fn use_of(&mut self, decl: DeclId, line: usize, column: usize) -> Node {
        let name = self.name_of(decl);
        let ident = self.ident(&name, line, column);
        self.program.symbols.bind(ident.id, decl);
        Node::Use(ident)
    }

    /// An identifier use the resolver knows nothing about.
    pub fn unresolved(&mut self, name: &str, line: usize, column: usize) -> Node {
        Node::Use(self.ident(name, line, column))
    }

    /// Member access `operand.member`, with the operand's static type when it
    /// is a method or field selection.
    pub fn member(
        &mut self,
        operand: Node,
        member: DeclId,
        line: usize,
        column: usize,
        receiver: Option<TypeExpr>,
    ) -> Node {
        let name = self.name_of(member);
        let ident = self.ident(&name, line, column);
        self.program.symbols.bind(ident.id, member);
        Node::Selector(Selector {
            operand: Box::new(operand),
            member: ident,
            selection: receiver.map(|receiver| Selection { receiver }),
        })
    }

    /// Declaration node for function or method `decl`, named at its defining position.
    pub fn func(
        &mut self,
        decl: DeclId,
        receiver: Vec<Node>,
        signature: Vec<Node>,
        body: Vec<Node>,
    ) -> Node {
        let (name, line, column) = self
            .program
            .symbols
            .declaration(decl)
            .map_or((String::new(), 0, 0), |d| {
                let (line, column) = d.position.as_ref().map_or((0, 0), |p| (p.line, p.column));
                (d.name.clone(), line, column)
            });
        let name = self.ident(&name, line, column);
        Node::Func(FuncDecl {
            name,
            decl,
            receiver,
            signature,
            body,
        })
    }

    /// Adds a source file.
    pub fn file(&mut self, path: impl Into<PathBuf>, nodes: Vec<Node>) -> &mut Self {
        self.program.files.push(SourceFile {
            path: path.into(),
            generated: false,
            package: None,
            source: None,
            nodes,
        });
        self
    }

    /// Adds a source file marked as generated.
    pub fn generated_file(&mut self, path: impl Into<PathBuf>, nodes: Vec<Node>) -> &mut Self {
        self.file(path, nodes);
        if let Some(file) = self.program.files.last_mut() {
            file.generated = true;
        }
        self
    }

    /// Records the `package` clause position of the most recently added file.
    pub fn package_at(&mut self, line: usize, column: usize) -> &mut Self {
        if let Some(file) = self.program.files.last_mut() {
            file.package = Some(Position { line, column });
        }
        self
    }

    /// Attaches source text to the most recently added file.
    pub fn with_source(&mut self, source: impl Into<String>) -> &mut Self {
        if let Some(file) = self.program.files.last_mut() {
            file.source = Some(source.into());
        }
        self
    }

    /// Finishes the program.
    #[must_use]
    pub fn build(self) -> Program {
        self.program
    }
}
