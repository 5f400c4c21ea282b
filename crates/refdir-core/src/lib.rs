//! # refdir-core
//!
//! Reference-direction analysis over resolved programs.
//!
//! Every identifier use in a source file is classified by the kind of entity
//! it refers to, and its position is compared with the declaration's position
//! under a configurable [`Direction`] per [`RefKind`]. By default functions
//! must be referenced before they are defined (top-down reading order) and
//! everything else after.
//!
//! This crate provides:
//!
//! - [`program`]: the resolved-program model handed over by a front-end
//! - [`RefDir`]: the per-file engine
//! - [`Analyzer`] for running the engine over a whole program
//! - [`reporter`]: the finding sink and its presentation decorators
//!
//! ## Example
//!
//! ```
//! use refdir_core::program::{Declaration, ProgramBuilder};
//! use refdir_core::{Analyzer, Location, RefKind, Direction};
//!
//! let mut b = ProgramBuilder::new();
//! let limit = b.declare(Declaration::constant("Limit", Location::new("main.go", 9, 7)));
//! let main = b.declare(Declaration::func("main", Location::new("main.go", 3, 6)));
//! let read = b.use_of(limit, 4, 14);
//! let main_fn = b.func(main, vec![], vec![], vec![read]);
//! b.file("main.go", vec![main_fn]);
//! let program = b.build();
//!
//! let result = Analyzer::default().analyze(&program);
//! assert!(result.has_errors());
//!
//! let relaxed = Analyzer::builder()
//!     .direction(RefKind::Const, Direction::Ignore)
//!     .build();
//! assert!(!relaxed.analyze(&program).has_errors());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod engine;
mod policy;
mod types;

/// Resolved-program model and the JSON adapter.
pub mod program;
/// Finding sinks.
pub mod reporter;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{Config, ConfigError};
pub use context::FileContext;
pub use engine::{OrderChecker, RefDir};
pub use policy::{Direction, Policy, RefKind};
pub use program::{AdapterError, Program};
pub use reporter::Reporter;
pub use types::{Finding, FindingDiagnostic, LintResult, Location, Verdict};
