//! Per-file context for a single traversal.

use crate::program::Position;
use crate::types::Location;
use std::path::Path;

/// Context provided to the engine for one source file.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Path of the file as reported by the front-end.
    pub path: &'a Path,
    /// Position of the `package` clause, when the front-end supplied it.
    pub package: Option<Position>,
    /// Whether the front-end marked this file as generated.
    pub is_generated: bool,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            package: None,
            is_generated: false,
        }
    }

    /// Records the `package` clause position.
    #[must_use]
    pub fn with_package(mut self, package: Option<Position>) -> Self {
        self.package = package;
        self
    }

    /// Marks the file as generated.
    #[must_use]
    pub fn generated(mut self, is_generated: bool) -> Self {
        self.is_generated = is_generated;
        self
    }

    /// Location of an identifier in this file.
    #[must_use]
    pub fn location(&self, line: usize, column: usize, name: &str) -> Location {
        Location::new(self.path, line, column).with_length(name.len())
    }

    /// Location of the `package` clause, or 1:1 when unknown.
    #[must_use]
    pub fn package_location(&self) -> Location {
        let (line, column) = self.package.map_or((1, 1), |p| (p.line, p.column));
        Location::new(self.path, line, column)
    }
}

/// Byte offset of a 1-indexed line and column in `content`, or 0 if out of bounds.
pub(crate) fn offset_in(content: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line_content) in content.lines().enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1);
        }
        offset += line_content.len() + 1; // +1 for newline
    }

    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_calculation() {
        let content = "line1\nline2\nline3";
        assert_eq!(offset_in(content, 1, 1), 0); // Start of line 1
        assert_eq!(offset_in(content, 2, 1), 6); // Start of line 2
        assert_eq!(offset_in(content, 2, 3), 8); // "ne" in line2
        assert_eq!(offset_in(content, 0, 3), 0);
    }

    #[test]
    fn test_location_carries_name_length() {
        let ctx = FileContext::new(Path::new("a.go"));
        let loc = ctx.location(4, 9, "Helper");
        assert_eq!(loc, Location::new("a.go", 4, 9).with_length(6));
    }

    #[test]
    fn test_package_location_falls_back_to_file_start() {
        let ctx = FileContext::new(Path::new("a.go"));
        assert_eq!(ctx.package_location(), Location::new("a.go", 1, 1));

        let ctx = ctx.with_package(Some(Position { line: 3, column: 1 }));
        assert_eq!(ctx.package_location(), Location::new("a.go", 3, 1));
    }
}
