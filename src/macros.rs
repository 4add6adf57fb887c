// ABOUTME: This module provides macros to reduce boilerplate in label tables and config builders
// ABOUTME: Includes macros for sub-cause vocabularies and fluent builder setters

/// Macro for declaring sub-cause label tables
///
/// Each entry generates a `pub static` [`SubCauseVocabulary`] naming the
/// rendered field and its value/label pairs.
///
/// # Arguments
/// * `$ident` - The static's name (e.g. ROADWORKS)
/// * `$field` - The rendered field name (e.g. "roadworksSubCauseCode")
/// * `$value => $label` - Value/label pairs in ascending value order
///
/// [`SubCauseVocabulary`]: crate::datatypes::SubCauseVocabulary
macro_rules! sub_cause_vocabulary {
    ($($(#[$meta:meta])* $ident:ident = $field:literal { $($value:literal => $label:literal),* $(,)? })*) => {
        $(
            $(#[$meta])*
            pub static $ident: $crate::datatypes::SubCauseVocabulary =
                $crate::datatypes::SubCauseVocabulary {
                    field: $field,
                    labels: &[$(($value, $label)),*],
                };
        )*
    };
}

/// Macro for generating builder setter methods
///
/// This macro generates fluent setter methods for builder patterns,
/// where each method takes a value, sets the corresponding field,
/// and returns self for method chaining.
///
/// # Arguments
/// * `$($field:ident: $type:ty),*` - Field name and type pairs
///
/// # Generated code
/// For each field, generates:
/// ```rust,ignore
/// pub fn $field(mut self, $field: $type) -> Self {
///     self.$field = $field;
///     self
/// }
/// ```
macro_rules! builder_setters {
    ($($field:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, $field: $type) -> Self {
                self.$field = $field;
                self
            }
        )*
    };
}

// Make macros available to the rest of the crate
pub(crate) use {builder_setters, sub_cause_vocabulary};
