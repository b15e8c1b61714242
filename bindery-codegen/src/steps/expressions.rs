//! Layout binding class generation.
//!
//! Every layout resource carrying `@LayoutData` gets a
//! `<package>.databinding.<Layout>Binding` class with one field per view id
//! and an accessor pair per declared variable.

use bindery_core::{QualifiedName, android_id, capitalize, to_camel_case, to_camel_case_as_var};
use bindery_manifest::BuildMetadata;
use bindery_model::{Element, ElementKind, RoundEnv, markers::LAYOUT_DATA};
use eyre::Result;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    builder::CodeBuilder,
    processor::{Step, StepContext},
};

const BINDING_SUBPACKAGE: &str = "databinding";

/// A variable declared in a layout's `<data>` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A view with an id in a layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutView {
    /// Id reference, e.g. `@+id/title`.
    pub id: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutData {
    #[serde(default)]
    variables: Vec<LayoutVariable>,
    #[serde(default)]
    views: Vec<LayoutView>,
}

/// A layout ready to be rendered as a binding class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutBinding {
    /// Layout resource name, e.g. `activity_main`.
    pub layout: String,
    pub variables: Vec<LayoutVariable>,
    /// Field name and view type per view.
    pub views: Vec<(String, String)>,
}

impl LayoutBinding {
    /// Simple name of the generated class.
    pub fn class_name(&self) -> String {
        format!("{}Binding", to_camel_case(&self.layout))
    }

    /// Render the binding class in `package`.
    pub fn render(&self, package: &str) -> String {
        let class = self.class_name();
        CodeBuilder::java()
            .package(Some(package))
            .javadoc(&format!(
                "Binding for layout {}. Generated, do not edit.",
                self.layout
            ))
            .block_with_close(&format!("public class {} {{", class), "}", |b| {
                let b = b
                    .each(&self.views, |b, (field, ty)| {
                        b.line(&format!("public final {} {};", ty, field))
                    })
                    .each(&self.variables, |b, var| {
                        b.line(&format!("private {} m{};", var.ty, capitalize(&var.name)))
                    })
                    .when(!self.views.is_empty() || !self.variables.is_empty(), |b| {
                        b.blank()
                    });

                let params: Vec<String> = self
                    .views
                    .iter()
                    .map(|(field, ty)| format!("{} {}", ty, field))
                    .collect();
                let b = b.block_with_close(
                    &format!("public {}({}) {{", class, params.join(", ")),
                    "}",
                    |b| {
                        b.each(&self.views, |b, (field, _)| {
                            b.line(&format!("this.{} = {};", field, field))
                        })
                    },
                );

                b.each(&self.variables, |b, var| {
                    let prop = capitalize(&var.name);
                    b.blank()
                        .block_with_close(
                            &format!("public void set{}({} {}) {{", prop, var.ty, var.name),
                            "}",
                            |b| b.line(&format!("this.m{} = {};", prop, var.name)),
                        )
                        .blank()
                        .block_with_close(
                            &format!("public {} get{}() {{", var.ty, prop),
                            "}",
                            |b| b.line(&format!("return m{};", prop)),
                        )
                })
            })
            .build()
    }
}

/// Generates binding classes for layouts.
///
/// Layout data is complete in the first round it appears, so the step is
/// done after one round with metadata.
#[derive(Debug, Default)]
pub struct ExpressionStep {
    generated: usize,
    ran: bool,
}

impl ExpressionStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of binding classes generated so far.
    pub fn generated(&self) -> usize {
        self.generated
    }
}

/// Parse a layout element, reporting invalid data as diagnostics.
fn layout_binding(element: &Element, cx: &mut StepContext<'_>) -> Option<LayoutBinding> {
    let args = element
        .annotation(LAYOUT_DATA)
        .map(|a| a.args.clone())
        .unwrap_or_default();
    let data: LayoutData = match toml::Value::Table(args).try_into() {
        Ok(data) => data,
        Err(e) => {
            cx.error_at(&element.name, format!("malformed layout data: {}", e.message()));
            return None;
        }
    };

    let mut views = Vec::with_capacity(data.views.len());
    for view in data.views {
        let Some(id) = android_id(&view.id) else {
            cx.error_at(
                &element.name,
                format!("invalid view id '{}', expected '@+id/<name>'", view.id),
            );
            return None;
        };
        views.push((to_camel_case_as_var(id), view.ty));
    }

    Some(LayoutBinding {
        layout: element.name.clone(),
        variables: data.variables,
        views,
    })
}

impl Step for ExpressionStep {
    fn name(&self) -> &'static str {
        "expressions"
    }

    fn description(&self) -> &'static str {
        "Generate binding classes for layouts"
    }

    fn advance(
        &mut self,
        round: &dyn RoundEnv,
        metadata: &BuildMetadata,
        cx: &mut StepContext<'_>,
    ) -> Result<bool> {
        self.ran = true;

        let package = format!("{}.{}", metadata.module_package, BINDING_SUBPACKAGE);
        let layouts = round
            .root_elements()
            .iter()
            .filter(|e| e.kind == ElementKind::Layout);

        for element in layouts {
            let Some(binding) = layout_binding(element, cx) else {
                continue;
            };
            let name = QualifiedName::in_package(&package, &binding.class_name())
                .map_err(|reason| eyre::eyre!(reason))?;
            cx.emit(&name, &binding.render(&package))?;
            self.generated += 1;
            debug!(layout = %binding.layout, class = %name, "generated layout binding");
        }

        Ok(true)
    }

    fn finalize(
        &mut self,
        _round: &dyn RoundEnv,
        metadata: Option<&BuildMetadata>,
        cx: &mut StepContext<'_>,
    ) -> Result<()> {
        if metadata.is_none() && !self.ran {
            warn!("layout bindings were never generated");
            cx.warning("build metadata never became available; layout bindings were not generated");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bindery_core::MemoryEmitter;
    use bindery_model::{Annotation, Round};

    use super::*;
    use crate::processor::Diagnostic;

    fn layout(name: &str, data: &str) -> Element {
        let args: toml::Table = toml::from_str(data).unwrap();
        let annotation = args
            .into_iter()
            .fold(Annotation::new(LAYOUT_DATA), |a, (k, v)| a.arg(k, v));
        Element::new(name, ElementKind::Layout).annotated(annotation)
    }

    fn run(elements: Vec<Element>) -> (MemoryEmitter, Vec<Diagnostic>) {
        let emitter = MemoryEmitter::new();
        let mut diagnostics = Vec::new();
        {
            let mut cx = StepContext::new("expressions", &emitter, &mut diagnostics);
            let done = ExpressionStep::new()
                .advance(
                    &Round::new(1, elements),
                    &BuildMetadata::new("b", "com.example"),
                    &mut cx,
                )
                .unwrap();
            assert!(done);
        }
        (emitter, diagnostics)
    }

    #[test]
    fn test_render_binding() {
        let (emitter, diagnostics) = run(vec![layout(
            "activity_main",
            r#"
            variables = [{ name = "user", type = "com.example.User" }]
            views = [{ id = "@+id/user_name", type = "android.widget.TextView" }]
            "#,
        )]);

        assert!(diagnostics.is_empty());
        let class = emitter
            .get("com.example.databinding.ActivityMainBinding")
            .expect("binding should be generated");
        insta::assert_snapshot!(class, @r#"
        package com.example.databinding;

        /** Binding for layout activity_main. Generated, do not edit. */
        public class ActivityMainBinding {
            public final android.widget.TextView userName;
            private com.example.User mUser;

            public ActivityMainBinding(android.widget.TextView userName) {
                this.userName = userName;
            }

            public void setUser(com.example.User user) {
                this.mUser = user;
            }

            public com.example.User getUser() {
                return mUser;
            }
        }
        "#);
    }

    #[test]
    fn test_layout_without_data() {
        let (emitter, diagnostics) =
            run(vec![Element::new("empty_item", ElementKind::Layout)]);

        assert!(diagnostics.is_empty());
        let class = emitter
            .get("com.example.databinding.EmptyItemBinding")
            .unwrap();
        assert!(class.contains("public EmptyItemBinding() {"));
    }

    #[test]
    fn test_invalid_view_id_skips_layout() {
        let (emitter, diagnostics) = run(vec![
            layout("broken", r#"views = [{ id = "title", type = "android.view.View" }]"#),
            layout("fine", ""),
        ]);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].element.as_deref(), Some("broken"));
        assert_eq!(emitter.len(), 1);
        assert!(emitter.get("com.example.databinding.FineBinding").is_some());
    }

    #[test]
    fn test_malformed_layout_data() {
        let (emitter, diagnostics) = run(vec![layout("bad", r#"variables = "user""#)]);
        assert!(emitter.is_empty());
        assert!(diagnostics[0].message.starts_with("malformed layout data"));
    }

    #[test]
    fn test_ignores_non_layout_elements() {
        let (emitter, _) = run(vec![Element::new("com.example.User", ElementKind::Class)]);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_counts_generated_bindings() {
        let emitter = MemoryEmitter::new();
        let mut diagnostics = Vec::new();
        let mut cx = StepContext::new("expressions", &emitter, &mut diagnostics);
        let mut step = ExpressionStep::new();
        let round = Round::new(
            1,
            vec![
                layout("item_row", ""),
                layout("broken", r#"views = [{ id = "row", type = "android.view.View" }]"#),
                layout("item_header", ""),
            ],
        );

        step.advance(&round, &BuildMetadata::new("b", "com.example"), &mut cx)
            .unwrap();

        assert_eq!(step.generated(), 2);
    }

    #[test]
    fn test_finalize_warns_when_never_run() {
        let emitter = MemoryEmitter::new();
        let mut diagnostics = Vec::new();
        let mut cx = StepContext::new("expressions", &emitter, &mut diagnostics);

        ExpressionStep::new()
            .finalize(&Round::new(1, Vec::new()), None, &mut cx)
            .unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity.is_warning());
    }
}
