//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# refdir configuration
#
# Each reference kind is checked in one direction:
#   down   - references must come before the definition
#   up     - references must come after the definition
#   ignore - references are reported as info only

# Print every finding, with resolved definition positions
verbose = false

# Colorize verdicts in terminal output
color = true

[directions]
func = "down"
type = "up"
recvtype = "up"
var = "up"
const = "up"
"#;

/// Name of the file written by `refdir init`.
const CONFIG_NAME: &str = "refdir.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_default(Path::new(CONFIG_NAME), force)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to choose directions");
    println!("  2. Run: refdir check <program.json>");

    Ok(())
}

fn write_default(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
