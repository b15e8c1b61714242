//! Naming helpers for generated code.

/// Upper-case the first character (e.g., "text" -> "Text")
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Lower-case the first character (e.g., "FirstName" -> "firstName")
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a resource name to a type name (e.g., "activity_main" -> "ActivityMain")
pub fn to_camel_case(s: &str) -> String {
    s.split('_').map(capitalize).collect()
}

/// Convert a resource name to a variable name (e.g., "user_name" -> "userName")
pub fn to_camel_case_as_var(s: &str) -> String {
    let mut parts = s.split('_');
    let first = parts.next().unwrap_or_default().to_string();
    parts.fold(first, |mut acc, part| {
        acc.push_str(&capitalize(part));
        acc
    })
}

/// Extract the name from a resource id reference (e.g., "@+id/title" -> "title")
pub fn android_id(reference: &str) -> Option<&str> {
    reference.split('/').nth(1).filter(|id| !id.is_empty())
}
