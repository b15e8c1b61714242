//! Bindable property collection and `BR` generation.
//!
//! Properties can be declared in any round, so this step never reports
//! itself done. The `BR` id class is written once, at finalization.

use std::collections::BTreeSet;

use bindery_core::decapitalize;
use bindery_manifest::BuildMetadata;
use bindery_model::{Element, ElementKind, RoundEnv, markers::BINDABLE};
use eyre::Result;
use tracing::{debug, info};

use crate::{
    builder::CodeBuilder,
    processor::{Step, StepContext},
};

const BR_CLASS: &str = "BR";

/// Property name for a bindable field or getter.
///
/// `mFoo` and `foo` fields name `foo`; `getFoo()` and `isFoo()` getters
/// name `foo`.
pub fn property_name(element: &Element) -> std::result::Result<String, String> {
    match element.kind {
        ElementKind::Field => Ok(strip_field_prefix(&element.name)),
        ElementKind::Method => {
            if !element.params.is_empty() {
                return Err("@Bindable getters must not take parameters".to_string());
            }
            ["get", "is"]
                .iter()
                .find_map(|&prefix| {
                    element
                        .name
                        .strip_prefix(prefix)
                        .filter(|rest| rest.chars().next().is_some_and(char::is_uppercase))
                })
                .map(decapitalize)
                .ok_or_else(|| {
                    format!(
                        "@Bindable methods must be getters named get<Name> or is<Name>, found '{}'",
                        element.name
                    )
                })
        }
        kind => Err(format!(
            "@Bindable can only annotate fields and getters, not a {}",
            kind.as_str()
        )),
    }
}

fn strip_field_prefix(name: &str) -> String {
    match name.strip_prefix('m') {
        Some(rest) if rest.chars().next().is_some_and(char::is_uppercase) => decapitalize(rest),
        _ => name.to_string(),
    }
}

/// Render the `BR` class for `properties`.
///
/// Ids are assigned in sorted order starting at 1; `_all` is always 0.
/// Library modules get non-final ids so the application can renumber them.
pub fn render_br(package: &str, properties: &BTreeSet<String>, library: bool) -> String {
    let modifiers = if library {
        "public static int"
    } else {
        "public static final int"
    };

    CodeBuilder::java()
        .package(Some(package))
        .javadoc("Bindable property ids. Generated, do not edit.")
        .block_with_close(&format!("public class {} {{", BR_CLASS), "}", |b| {
            b.line(&format!("{} _all = 0;", modifiers)).each(
                properties.iter().enumerate(),
                |b, (index, property)| {
                    b.line(&format!("{} {} = {};", modifiers, property, index + 1))
                },
            )
        })
        .build()
}

/// Collects `@Bindable` properties across rounds and generates `BR`.
#[derive(Debug, Default)]
pub struct BindableStep {
    properties: BTreeSet<String>,
}

impl BindableStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties collected so far, sorted.
    pub fn properties(&self) -> &BTreeSet<String> {
        &self.properties
    }
}

impl Step for BindableStep {
    fn name(&self) -> &'static str {
        "bindable"
    }

    fn description(&self) -> &'static str {
        "Collect bindable properties and generate BR"
    }

    fn advance(
        &mut self,
        round: &dyn RoundEnv,
        _metadata: &BuildMetadata,
        cx: &mut StepContext<'_>,
    ) -> Result<bool> {
        for element in round.annotated_with(BINDABLE) {
            match property_name(element) {
                Ok(property) => {
                    if self.properties.insert(property.clone()) {
                        debug!(property = %property, element = %element.display_name(), "found bindable property");
                    }
                }
                Err(message) => cx.error_at(element.display_name(), message),
            }
        }
        Ok(false)
    }

    fn finalize(
        &mut self,
        _round: &dyn RoundEnv,
        metadata: Option<&BuildMetadata>,
        cx: &mut StepContext<'_>,
    ) -> Result<()> {
        let Some(metadata) = metadata else {
            cx.error("build metadata never became available; BR was not generated");
            return Ok(());
        };

        let name = metadata
            .qualified(BR_CLASS)
            .map_err(|reason| eyre::eyre!(reason))?;
        cx.emit(
            &name,
            &render_br(&metadata.module_package, &self.properties, metadata.library),
        )?;
        info!(properties = self.properties.len(), class = %name, "generated BR");
        Ok(())
    }
}
