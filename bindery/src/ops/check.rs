//! Check operation - build metadata validation.

use bindery_manifest::{BuildInfoLoader, MarkerLoader};
use bindery_model::{Round, RoundEnv, markers};
use indexmap::IndexSet;

use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Looks for the build metadata round by round, the way the coordinator
/// would, and tallies marker usage.
///
/// # Errors
///
/// Returns the first malformed build metadata error.
pub fn check(rounds: &[Round]) -> bindery_manifest::Result<CheckReport> {
    let loader = MarkerLoader::new();
    let mut metadata = None;
    for round in rounds {
        if let Some(found) = loader.load(round)? {
            metadata = Some((round.number(), found));
            break;
        }
    }

    let marked = markers::SUPPORTED_MARKERS
        .iter()
        .map(|marker| {
            let count: usize = rounds
                .iter()
                .map(|round| round.annotated_with(marker).len())
                .sum();
            (marker.to_string(), count)
        })
        .collect();

    let unknown: IndexSet<String> = rounds
        .iter()
        .flat_map(|round| round.root_elements())
        .flat_map(|element| {
            element
                .annotations
                .iter()
                .filter(|a| is_unknown_marker(&a.name))
                .map(move |a| format!("{} on {}", a.name, element.display_name()))
        })
        .collect();

    Ok(CheckReport {
        rounds: rounds.len(),
        metadata,
        marked,
        unknown: unknown.into_iter().collect(),
    })
}

/// Annotations in the bindery namespace that nothing processes.
fn is_unknown_marker(name: &str) -> bool {
    name.starts_with("bindery.") && !markers::is_supported(name) && name != markers::LAYOUT_DATA
}
