//! Kinds command implementation.

use anyhow::Result;
use refdir_core::{Policy, RefKind};

use crate::config_resolver::ConfigSource;

/// Runs the kinds command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;
    print!("{}", table(&config.policy()));

    println!("\nDirections from {source}");
    println!("\nOverride per run, e.g.:");
    println!("  refdir check --func-dir up --const-dir ignore program.json");
    Ok(())
}

fn table(policy: &Policy) -> String {
    let mut out = format!("{:<10} {:<8} Description\n", "Kind", "Dir");
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for kind in RefKind::ALL {
        out.push_str(&format!(
            "{:<10} {:<8} {}\n",
            kind.as_str(),
            policy.get(kind).as_str(),
            kind.description()
        ));
    }
    out
}
