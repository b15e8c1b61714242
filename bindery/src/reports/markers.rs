//! Markers command report.

use bindery_codegen::{Coordinator, Step, processor::StepInfo, steps};

use super::output::{Output, Report};

/// The declared marker set, source level and built-in steps.
#[derive(Debug)]
pub struct MarkersReport {
    pub markers: &'static [&'static str],
    pub min_source_version: u32,
    pub steps: Vec<StepInfo>,
}

impl MarkersReport {
    /// What the coordinator currently declares.
    pub fn current() -> Self {
        Self {
            markers: Coordinator::supported_markers(),
            min_source_version: Coordinator::min_source_version(),
            steps: steps::builtin().iter().map(|s| Step::info(s.as_ref())).collect(),
        }
    }
}

impl Report for MarkersReport {
    fn render(&self, out: &mut dyn Output) {
        out.title("Bindery markers");
        out.section(&format!("Supported ({})", self.markers.len()));
        for marker in self.markers {
            out.list_item(marker);
        }
        out.newline();
        out.section("Steps, in order");
        for step in &self.steps {
            out.list_item(&format!("{}: {}", step.name, step.description));
        }
        out.newline();
        out.key_value("Minimum source version", &self.min_source_version.to_string());
    }
}
