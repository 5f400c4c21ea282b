//! Position comparison under the configured direction.

use crate::policy::{Direction, Policy, RefKind};
use crate::types::{Finding, Location};

/// Compares a reference's position with its declaration's.
#[derive(Debug, Clone, Copy)]
pub struct OrderChecker<'a> {
    policy: &'a Policy,
    verbose: bool,
}

impl<'a> OrderChecker<'a> {
    /// Creates a checker reading directions from `policy`.
    #[must_use]
    pub fn new(policy: &'a Policy, verbose: bool) -> Self {
        Self { policy, verbose }
    }

    /// Produces the finding for a reference named `name` at `at` whose
    /// declaration sits at `def`.
    #[must_use]
    pub fn check(&self, at: Location, name: &str, def: &Location, kind: RefKind) -> Finding {
        let direction = self.policy.get(kind);
        if direction == Direction::Ignore {
            return Finding::info(at, format!("{kind} reference {name} ignored by options"))
                .with_kind(kind);
        }

        if at.file != def.file {
            return Finding::info(
                at,
                format!("{kind} reference {name} is to definition in separate file ({def})"),
            )
            .with_kind(kind);
        }

        if at.line == def.line {
            return Finding::ok(
                at,
                format!("{kind} reference {name} is on same line as definition ({def})"),
            )
            .with_kind(kind);
        }

        let before = at.line < def.line;
        let order = if before { "before" } else { "after" };
        let message = if self.verbose {
            format!("{kind} reference {name} is {order} definition ({def})")
        } else {
            format!("{kind} reference {name} is {order} definition")
        };

        if before == (direction == Direction::Down) {
            Finding::ok(at, message).with_kind(kind)
        } else {
            Finding::error(at, message).with_kind(kind)
        }
    }
}
