//! Public macros for constructing option structs without relying on struct literal syntax.
//!
//! These macros keep call sites ergonomic while allowing the option structs to gain fields
//! without forcing breaking changes.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// ```rust
/// let options = serde_ptargs::options! {
///     with_snippet: false,
///     crop_radius: 16,
/// };
/// assert!(!options.with_snippet);
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::Budget`] from `Default` and a list of field assignments.
///
/// ```rust
/// let budget = serde_ptargs::budget! {
///     max_pairs: 16,
///     max_value_bytes: 4096,
/// };
/// assert_eq!(budget.max_keys, serde_ptargs::Budget::default().max_keys);
/// ```
#[macro_export]
macro_rules! budget {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut budget = $crate::Budget::default();
        $(
            budget.$field = $value;
        )*
        budget
    }};
}
