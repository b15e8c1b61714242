//! Binding adapter discovery.
//!
//! Collects `@BindingAdapter`, `@BindingMethods`, `@BindingConversion` and
//! `@Untaggable` declarations and records them in a generated
//! `BindingAdapterStore` class. Adapters are source declarations, so a
//! single round is enough.

use bindery_core::WriteResult;
use bindery_manifest::BuildMetadata;
use bindery_model::{
    Element, ElementKind, RoundEnv,
    markers::{BINDING_ADAPTER, BINDING_CONVERSION, BINDING_METHODS, UNTAGGABLE},
};
use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    builder::{CodeBuilder, java_string},
    processor::{Step, StepContext},
};

const STORE_CLASS: &str = "BindingAdapterStore";

/// A static method that applies one or more attributes to a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterEntry {
    pub attributes: Vec<String>,
    pub view_type: String,
    pub value_types: Vec<String>,
    pub method: String,
}

/// An attribute mapped to a differently named setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameEntry {
    #[serde(rename = "type")]
    pub view_type: String,
    pub attribute: String,
    pub method: String,
}

/// A static method converting one value type into another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionEntry {
    pub from: String,
    pub to: String,
    pub method: String,
}

/// Everything the adapter step discovered in a round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdapterStore {
    pub adapters: Vec<AdapterEntry>,
    pub renames: Vec<RenameEntry>,
    pub conversions: Vec<ConversionEntry>,
    pub untaggable: Vec<String>,
}

impl AdapterStore {
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
            && self.renames.is_empty()
            && self.conversions.is_empty()
            && self.untaggable.is_empty()
    }

    /// Render the store as a Java class in `package`.
    pub fn render(&self, package: &str) -> String {
        CodeBuilder::java()
            .package(Some(package).filter(|p| !p.is_empty()))
            .javadoc("Binding adapters declared in this module. Generated, do not edit.")
            .block_with_close(&format!("public final class {} {{", STORE_CLASS), "}", |b| {
                let b = string_table(
                    b,
                    "ADAPTERS",
                    "attributes, view type, value types, method",
                    self.adapters.iter().map(|a| {
                        vec![
                            a.attributes.join(","),
                            a.view_type.clone(),
                            a.value_types.join(","),
                            a.method.clone(),
                        ]
                    }),
                )
                .blank();
                let b = string_table(
                    b,
                    "RENAMES",
                    "view type, attribute, setter",
                    self.renames
                        .iter()
                        .map(|r| vec![r.view_type.clone(), r.attribute.clone(), r.method.clone()]),
                )
                .blank();
                let b = string_table(
                    b,
                    "CONVERSIONS",
                    "from, to, method",
                    self.conversions
                        .iter()
                        .map(|c| vec![c.from.clone(), c.to.clone(), c.method.clone()]),
                )
                .blank();
                b.block_with_close("public static final String[] UNTAGGABLE = {", "};", |b| {
                    b.each(&self.untaggable, |b, tag| {
                        b.line(&format!("{},", java_string(tag)))
                    })
                })
                .blank()
                .block_with_close(&format!("private {}() {{", STORE_CLASS), "}", |b| b)
            })
            .build()
    }
}

fn string_table(
    b: CodeBuilder,
    name: &str,
    columns: &str,
    rows: impl Iterator<Item = Vec<String>>,
) -> CodeBuilder {
    b.javadoc(columns).block_with_close(
        &format!("public static final String[][] {} = {{", name),
        "};",
        |b| {
            b.each(rows, |b, row| {
                let cells: Vec<String> = row.iter().map(|c| java_string(c)).collect();
                b.line(&format!("{{{}}},", cells.join(", ")))
            })
        },
    )
}

/// Records binding adapters, setter renames, conversions and untaggable tags.
#[derive(Debug, Default)]
pub struct MethodAdapterStep;

impl MethodAdapterStep {
    pub fn new() -> Self {
        Self
    }

    /// Collect declarations from the round's root elements.
    ///
    /// Invalid declarations are reported as diagnostics and left out.
    pub fn collect(round: &dyn RoundEnv, cx: &mut StepContext<'_>) -> AdapterStore {
        let mut store = AdapterStore::default();

        for element in round.annotated_with(BINDING_ADAPTER) {
            if let Some(entry) = adapter_entry(element, cx) {
                store.adapters.push(entry);
            }
        }
        for element in round.annotated_with(BINDING_METHODS) {
            store.renames.extend(rename_entries(element, cx));
        }
        for element in round.annotated_with(BINDING_CONVERSION) {
            if let Some(entry) = conversion_entry(element, cx) {
                store.conversions.push(entry);
            }
        }
        for element in round.annotated_with(UNTAGGABLE) {
            store.untaggable.extend(untaggable_tags(element, cx));
        }

        store
    }
}

/// Qualified method name, or a diagnostic if `element` isn't a member method.
fn static_method(element: &Element, marker: &str, cx: &mut StepContext<'_>) -> Option<String> {
    if element.kind != ElementKind::Method || element.owner.is_none() {
        cx.error_at(
            element.display_name(),
            format!("@{} must annotate a method declared in a type", marker),
        );
        return None;
    }
    Some(element.display_name())
}

fn adapter_entry(element: &Element, cx: &mut StepContext<'_>) -> Option<AdapterEntry> {
    let method = static_method(element, BINDING_ADAPTER, cx)?;
    let attributes = element
        .annotation(BINDING_ADAPTER)
        .and_then(|a| a.str_list("attributes"))
        .filter(|attrs| !attrs.is_empty());
    let Some(attributes) = attributes else {
        cx.error_at(
            &method,
            "@BindingAdapter requires a non-empty `attributes` list of strings",
        );
        return None;
    };

    let expected = attributes.len() + 1;
    if element.params.len() != expected {
        cx.error_at(
            &method,
            format!(
                "expected {} parameters (the view plus one value per attribute), found {}",
                expected,
                element.params.len()
            ),
        );
        return None;
    }

    Some(AdapterEntry {
        attributes: attributes.into_iter().map(String::from).collect(),
        view_type: element.params[0].clone(),
        value_types: element.params[1..].to_vec(),
        method,
    })
}

fn rename_entries(element: &Element, cx: &mut StepContext<'_>) -> Vec<RenameEntry> {
    let name = element.display_name();
    if element.kind != ElementKind::Class {
        cx.error_at(name, "@BindingMethods must annotate a type");
        return Vec::new();
    }

    let methods = element
        .annotation(BINDING_METHODS)
        .and_then(|a| a.args.get("methods"))
        .cloned();
    match methods.map(|v| v.try_into::<Vec<RenameEntry>>()) {
        Some(Ok(entries)) => entries,
        Some(Err(e)) => {
            cx.error_at(name, format!("malformed `methods` list: {}", e.message()));
            Vec::new()
        }
        None => {
            cx.error_at(name, "@BindingMethods requires a `methods` list");
            Vec::new()
        }
    }
}

fn conversion_entry(element: &Element, cx: &mut StepContext<'_>) -> Option<ConversionEntry> {
    let method = static_method(element, BINDING_CONVERSION, cx)?;
    match (element.params.as_slice(), element.ty.as_ref()) {
        ([from], Some(to)) => Some(ConversionEntry {
            from: from.clone(),
            to: to.clone(),
            method,
        }),
        _ => {
            cx.error_at(
                &method,
                "@BindingConversion methods take exactly one parameter and return a value",
            );
            None
        }
    }
}

fn untaggable_tags(element: &Element, cx: &mut StepContext<'_>) -> Vec<String> {
    let name = element.display_name();
    if element.kind != ElementKind::Class {
        cx.error_at(name, "@Untaggable must annotate a type");
        return Vec::new();
    }

    match element
        .annotation(UNTAGGABLE)
        .and_then(|a| a.str_list("tags"))
        .filter(|tags| !tags.is_empty())
    {
        Some(tags) => tags.into_iter().map(String::from).collect(),
        None => {
            cx.error_at(name, "@Untaggable requires a non-empty `tags` list of strings");
            Vec::new()
        }
    }
}

impl Step for MethodAdapterStep {
    fn name(&self) -> &'static str {
        "method-adapters"
    }

    fn description(&self) -> &'static str {
        "Record binding adapters, renames and conversions"
    }

    fn advance(
        &mut self,
        round: &dyn RoundEnv,
        metadata: &BuildMetadata,
        cx: &mut StepContext<'_>,
    ) -> Result<bool> {
        let store = Self::collect(round, cx);
        if store.is_empty() {
            debug!(round = round.number(), "no binding adapters declared");
            return Ok(true);
        }

        let name = metadata
            .qualified(STORE_CLASS)
            .map_err(|reason| eyre::eyre!(reason))?;
        if cx.emit(&name, &store.render(&metadata.module_package))? == WriteResult::Written {
            debug!(
                adapters = store.adapters.len(),
                renames = store.renames.len(),
                conversions = store.conversions.len(),
                "wrote adapter store"
            );
        }
        Ok(true)
    }

    fn finalize(
        &mut self,
        _round: &dyn RoundEnv,
        _metadata: Option<&BuildMetadata>,
        _cx: &mut StepContext<'_>,
    ) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bindery_core::{MemoryEmitter, QualifiedName};
    use bindery_model::{Annotation, Round};

    use super::*;
    use crate::processor::Diagnostic;

    fn adapter(name: &str, attrs: &[&str], params: &[&str]) -> Element {
        let attrs: Vec<toml::Value> = attrs.iter().map(|a| (*a).into()).collect();
        params.iter().fold(
            Element::new(name, ElementKind::Method)
                .owner("com.example.Adapters")
                .annotated(Annotation::new(BINDING_ADAPTER).arg("attributes", attrs)),
            |e, p| e.param(*p),
        )
    }

    fn run(elements: Vec<Element>) -> (bool, MemoryEmitter, Vec<Diagnostic>) {
        let emitter = MemoryEmitter::new();
        let mut diagnostics = Vec::new();
        let round = Round::new(1, elements);
        let meta = BuildMetadata::new("b", "com.example");
        let done = {
            let mut cx = StepContext::new("method-adapters", &emitter, &mut diagnostics);
            MethodAdapterStep::new()
                .advance(&round, &meta, &mut cx)
                .unwrap()
        };
        (done, emitter, diagnostics)
    }

    #[test]
    fn test_collects_adapters() {
        let (done, emitter, diagnostics) = run(vec![adapter(
            "setText",
            &["android:text"],
            &["android.widget.TextView", "java.lang.String"],
        )]);

        assert!(done);
        assert!(diagnostics.is_empty());
        let store = emitter
            .get("com.example.BindingAdapterStore")
            .expect("store should be written");
        assert!(store.contains(
            "{\"android:text\", \"android.widget.TextView\", \"java.lang.String\", \"com.example.Adapters.setText\"},"
        ));
    }

    #[test]
    fn test_parameter_count_mismatch_is_reported() {
        let (done, emitter, diagnostics) = run(vec![adapter(
            "setPadding",
            &["android:paddingLeft", "android:paddingRight"],
            &["android.view.View", "int"],
        )]);

        assert!(done);
        assert!(emitter.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].element.as_deref(),
            Some("com.example.Adapters.setPadding")
        );
    }

    #[test]
    fn test_renames_and_untaggable() {
        let methods = toml::Value::Array(vec![toml::Value::Table(
            toml::from_str(
                r#"
                type = "android.widget.ImageView"
                attribute = "android:tint"
                method = "setImageTintList"
                "#,
            )
            .unwrap(),
        )]);
        let (_, emitter, diagnostics) = run(vec![
            Element::new("com.example.Bindings", ElementKind::Class)
                .annotated(Annotation::new(BINDING_METHODS).arg("methods", methods)),
            Element::new("com.example.Tags", ElementKind::Class).annotated(
                Annotation::new(UNTAGGABLE).arg("tags", vec![toml::Value::from("android:tag")]),
            ),
        ]);

        assert!(diagnostics.is_empty());
        let store = emitter.get("com.example.BindingAdapterStore").unwrap();
        assert!(store.contains(
            "{\"android.widget.ImageView\", \"android:tint\", \"setImageTintList\"},"
        ));
        assert!(store.contains("\"android:tag\","));
    }

    #[test]
    fn test_malformed_declarations() {
        let (_, emitter, diagnostics) = run(vec![
            Element::new("com.example.Bindings", ElementKind::Class)
                .annotated(Annotation::new(BINDING_METHODS).arg("methods", "nope")),
            Element::new("convert", ElementKind::Method)
                .owner("com.example.Conversions")
                .param("int")
                .param("int")
                .annotated(Annotation::new(BINDING_CONVERSION)),
            Element::new("com.example.Tags", ElementKind::Class)
                .annotated(Annotation::new(UNTAGGABLE)),
            Element::new("mField", ElementKind::Field)
                .owner("com.example.Adapters")
                .annotated(Annotation::new(BINDING_ADAPTER)),
        ]);

        assert!(emitter.is_empty());
        assert_eq!(diagnostics.len(), 4);
        assert!(diagnostics.iter().all(|d| d.severity.is_error()));
    }

    #[test]
    fn test_empty_round_writes_nothing() {
        let (done, emitter, _) = run(Vec::new());
        assert!(done);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_render_conversion_store() {
        let store = AdapterStore {
            conversions: vec![ConversionEntry {
                from: "int".into(),
                to: "android.graphics.drawable.Drawable".into(),
                method: "com.example.Conversions.toDrawable".into(),
            }],
            ..Default::default()
        };

        insta::assert_snapshot!(store.render("com.example"), @r#"
        package com.example;

        /** Binding adapters declared in this module. Generated, do not edit. */
        public final class BindingAdapterStore {
            /** attributes, view type, value types, method */
            public static final String[][] ADAPTERS = {
            };

            /** view type, attribute, setter */
            public static final String[][] RENAMES = {
            };

            /** from, to, method */
            public static final String[][] CONVERSIONS = {
                {"int", "android.graphics.drawable.Drawable", "com.example.Conversions.toDrawable"},
            };

            public static final String[] UNTAGGABLE = {
            };

            private BindingAdapterStore() {
            }
        }
        "#);
    }

    #[test]
    fn test_store_name() {
        let meta = BuildMetadata::new("b", "com.example");
        assert_eq!(
            meta.qualified(STORE_CLASS).unwrap(),
            "com.example.BindingAdapterStore"
                .parse::<QualifiedName>()
                .unwrap()
        );
    }
}
