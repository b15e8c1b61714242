//! Check command report data structures.

use bindery_manifest::BuildMetadata;

use super::output::{Output, Report};

/// Report data from build metadata validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Number of rounds inspected.
    pub rounds: usize,
    /// Round in which the metadata first became visible, and the record.
    pub metadata: Option<(usize, BuildMetadata)>,
    /// Elements carrying each supported marker, across all rounds.
    pub marked: Vec<(String, usize)>,
    /// Bindery-namespaced annotations that nothing processes.
    pub unknown: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (metadata found).
    pub fn is_valid(&self) -> bool {
        self.metadata.is_some()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for annotation in &self.unknown {
            out.warning(&format!("warning: unknown marker {}", annotation));
        }
        if !self.unknown.is_empty() {
            out.newline();
        }

        let Some((round, metadata)) = &self.metadata else {
            out.warning(&format!(
                "error: build metadata not found in {} round{}",
                self.rounds,
                if self.rounds == 1 { "" } else { "s" }
            ));
            return;
        };

        out.preformatted(&format!("✓ build metadata found in round {}", round));
        out.newline();
        out.key_value_indented("build", &metadata.build_id);
        out.key_value_indented("package", &metadata.module_package);
        out.key_value_indented("min sdk", &metadata.min_sdk.to_string());
        out.key_value_indented("library", &metadata.library.to_string());
        for (feature, enabled) in &metadata.features {
            out.key_value_indented(&format!("feature {}", feature), &enabled.to_string());
        }
        out.newline();

        out.section("Marked elements");
        for (marker, count) in &self.marked {
            out.list_item(&format!("{} ({})", marker, count));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::testing::BufferOutput;

    #[test]
    fn test_render_missing_metadata() {
        let report = CheckReport {
            rounds: 2,
            metadata: None,
            marked: Vec::new(),
            unknown: Vec::new(),
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert_eq!(out.lines, vec!["! error: build metadata not found in 2 rounds"]);
    }

    #[test]
    fn test_render_found_metadata() {
        let report = CheckReport {
            rounds: 1,
            metadata: Some((1, BuildMetadata::new("b-7", "com.example"))),
            marked: vec![("bindery.Bindable".to_string(), 3)],
            unknown: Vec::new(),
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert_eq!(out.lines[0], "✓ build metadata found in round 1");
        assert!(out.lines.contains(&"  package: com.example".to_string()));
        assert_eq!(out.lines.last().unwrap(), "  - bindery.Bindable (3)");
    }
}
