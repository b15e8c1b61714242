//! The declared marker set.
//!
//! The coordinator announces these ahead of time; hosts use them to decide
//! which elements to surface in each round.

/// Marks a static method as a binding adapter for one or more attributes.
pub const BINDING_ADAPTER: &str = "bindery.BindingAdapter";
/// Marks a type whose layouts must keep their original view tags.
pub const UNTAGGABLE: &str = "bindery.Untaggable";
/// Declares attribute-to-setter renames on a type.
pub const BINDING_METHODS: &str = "bindery.BindingMethods";
/// Marks a static method as an automatic value conversion.
pub const BINDING_CONVERSION: &str = "bindery.BindingConversion";
/// Marks the element that carries the build configuration record.
pub const BINDING_BUILD_INFO: &str = "bindery.BindingBuildInfo";
/// Marks an observable field or getter.
pub const BINDABLE: &str = "bindery.Bindable";

/// Binding metadata attached to layout resources.
///
/// Layouts are resources rather than source elements, so this is not part of
/// the declared marker set.
pub const LAYOUT_DATA: &str = "bindery.LayoutData";

/// Well-known name of the element carrying [`BINDING_BUILD_INFO`].
pub const BUILD_INFO_ELEMENT: &str = "bindery.BuildInfo";

/// Every marker the coordinator cares about.
pub const SUPPORTED_MARKERS: &[&str] = &[
    BINDING_ADAPTER,
    UNTAGGABLE,
    BINDING_METHODS,
    BINDING_CONVERSION,
    BINDING_BUILD_INFO,
    BINDABLE,
];

/// Minimum source-language version the generated code targets.
pub const MIN_SOURCE_VERSION: u32 = 7;

/// Returns true if `marker` belongs to the declared set.
pub fn is_supported(marker: &str) -> bool {
    SUPPORTED_MARKERS.contains(&marker)
}
