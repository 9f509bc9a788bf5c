//! Structural diagnostics raised while walking hierarchies.
//!
//! Depth overflows and cycles never abort a rebuild. They truncate the
//! offending branch and are recorded here (and logged) so callers can
//! see what was dropped.

use log::warn;
use std::fmt;

/// A single non-fatal structural problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A record's hierarchy was longer than the tree depth cap
    DepthExceeded {
        geography: String,
        segment_type: String,
        depth: usize,
        limit: usize,
    },

    /// A dimension item nested deeper than the structure depth cap
    StructureDepthExceeded {
        segment_type: String,
        item: String,
        limit: usize,
    },

    /// An item reappeared on its own ancestor path
    CircularReference {
        segment_type: String,
        path: Vec<String>,
        item: String,
    },

    /// A segment dimension had no items to expand
    MissingHierarchy { segment_type: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DepthExceeded {
                geography,
                segment_type,
                depth,
                limit,
            } => write!(
                f,
                "hierarchy depth {} exceeds limit {} for {} / {}, truncated",
                depth, limit, geography, segment_type
            ),
            Diagnostic::StructureDepthExceeded {
                segment_type,
                item,
                limit,
            } => write!(
                f,
                "structure depth limit {} reached at '{}' in {}, children skipped",
                limit, item, segment_type
            ),
            Diagnostic::CircularReference {
                segment_type,
                path,
                item,
            } => write!(
                f,
                "circular reference in {}: '{}' already on path {}",
                segment_type,
                item,
                path.join(" > ")
            ),
            Diagnostic::MissingHierarchy { segment_type } => {
                write!(f, "segment dimension '{}' has no items", segment_type)
            }
        }
    }
}

/// Diagnostics collected during one rebuild
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a warning
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn circular_references(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| matches!(d, Diagnostic::CircularReference { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_count() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.push(Diagnostic::MissingHierarchy {
            segment_type: "By Product".to_string(),
        });
        diagnostics.push(Diagnostic::CircularReference {
            segment_type: "By Product".to_string(),
            path: vec!["A".to_string(), "B".to_string()],
            item: "A".to_string(),
        });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.circular_references(), 1);
    }

    #[test]
    fn test_display_circular_reference() {
        let diagnostic = Diagnostic::CircularReference {
            segment_type: "By Product".to_string(),
            path: vec!["A".to_string(), "B".to_string()],
            item: "A".to_string(),
        };

        assert_eq!(
            diagnostic.to_string(),
            "circular reference in By Product: 'A' already on path A > B"
        );
    }
}
