//! The reference-direction engine.
//!
//! [`RefDir`] checks one file at a time. All mutable traversal state lives in
//! a visitor built per call, so a single engine may be shared between threads
//! analyzing different files; only the immutable [`Policy`] is shared.

mod classify;
mod order;

pub use order::OrderChecker;

use crate::config::Config;
use crate::context::FileContext;
use crate::policy::Policy;
use crate::program::{Resolver, SourceFile};
use crate::reporter::Reporter;
use crate::types::Finding;
use classify::ReferenceVisitor;
use tracing::debug;

/// Checks reference order against a fixed policy.
#[derive(Debug, Clone, Default)]
pub struct RefDir {
    policy: Policy,
    verbose: bool,
}

impl RefDir {
    /// Creates an engine with `policy`.
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            verbose: false,
        }
    }

    /// Creates an engine from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.policy()).verbose(config.verbose)
    }

    /// Appends resolved definition positions to ordering messages.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The policy in force.
    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Checks one file, emitting every finding to `reporter`.
    ///
    /// Generated files produce a single info finding at the `package` clause
    /// and are not traversed.
    pub fn check_file<R, P>(&self, file: &SourceFile, resolver: &R, reporter: &mut P)
    where
        R: Resolver + ?Sized,
        P: Reporter + ?Sized,
    {
        let ctx = FileContext::new(&file.path)
            .with_package(file.package)
            .generated(file.generated);

        if ctx.is_generated {
            debug!("Skipping generated file: {}", file.path.display());
            reporter.report(Finding::info(ctx.package_location(), "skipping generated file"));
            return;
        }

        debug!("Analyzing: {}", file.path.display());
        let checker = OrderChecker::new(&self.policy, self.verbose);
        let mut visitor = ReferenceVisitor::new(ctx, resolver, checker, reporter);
        visitor.visit_nodes(&file.nodes);
    }
}
