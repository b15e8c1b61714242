//! Program elements as seen by the coordinator.

use serde::{Deserialize, Serialize};

/// The kind of a program element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A type declaration.
    Class,
    /// A field of a type.
    Field,
    /// A method of a type.
    Method,
    /// A layout resource carrying binding expressions.
    Layout,
}

impl ElementKind {
    /// Get the lowercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Field => "field",
            ElementKind::Method => "method",
            ElementKind::Layout => "layout",
        }
    }
}

/// A marker annotation attached to an element.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Annotation {
    /// Fully-qualified marker name (e.g. `bindery.Bindable`).
    pub name: String,
    /// Annotation arguments.
    #[serde(default)]
    pub args: toml::Table,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: toml::Table::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Get a string argument.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(toml::Value::as_str)
    }

    /// Get an argument that is an array of strings.
    ///
    /// Returns `None` if the argument is missing or any entry is not a string.
    pub fn str_list(&self, key: &str) -> Option<Vec<&str>> {
        self.args
            .get(key)?
            .as_array()?
            .iter()
            .map(toml::Value::as_str)
            .collect()
    }
}

/// A program element visible to a round.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Element {
    /// Qualified name for types, member name for fields and methods,
    /// resource name for layouts.
    pub name: String,
    pub kind: ElementKind,
    /// Qualified name of the enclosing type (members only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Field type or method return type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Method parameter types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(default, rename = "annotation", skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Element {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            owner: None,
            ty: None,
            params: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Set the enclosing type.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the field type or return type.
    pub fn ty(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// Add a method parameter type.
    pub fn param(mut self, ty: impl Into<String>) -> Self {
        self.params.push(ty.into());
        self
    }

    /// Attach an annotation.
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Find the annotation with the given marker name.
    pub fn annotation(&self, marker: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == marker)
    }

    pub fn has_annotation(&self, marker: &str) -> bool {
        self.annotation(marker).is_some()
    }

    /// Name including the owner for members (e.g. `com.example.User.getName`).
    pub fn display_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}.{}", owner, self.name),
            None => self.name.clone(),
        }
    }
}
