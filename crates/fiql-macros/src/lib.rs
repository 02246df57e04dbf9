//! Proc macros for fiql.
//!
//! # Available Macros
//!
//! - [`Filterable`] - Derive `fiql::Filterable` so queries can be evaluated
//!   directly against a struct
//!
//! For working examples, see `fiql/tests/filterable_derive.rs`.

mod filterable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Filterable` trait for query-enabled structs.
///
/// Every named field becomes a record field whose value comes from
/// `fiql::ToValue`, so field types must implement that trait (strings,
/// booleans, numbers, chrono dates, `Option<T>` and `Vec<T>` already do).
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Contact::FIRST_NAME`, `Contact::CITY`)
/// 2. Implementation of `Filterable::to_field_map()`
///
/// # Example
///
/// ```ignore
/// use fiql::Evaluator;
/// use fiql_macros::Filterable;
///
/// #[derive(Filterable)]
/// struct Contact {
///     #[fiql(rename = "FirstName")]
///     first_name: String,
///
///     #[fiql(rename = "City")]
///     city: String,
///
///     #[fiql(skip)]
///     internal_id: u64,
/// }
///
/// let contacts = vec![
///     Contact { first_name: "Ada".into(), city: "London".into(), internal_id: 1 },
///     Contact { first_name: "Grace".into(), city: "New York".into(), internal_id: 2 },
/// ];
///
/// let query = format!("{}==London", Contact::CITY);
/// let results = Evaluator::default().filter(&query, &contacts)?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].first_name, "Ada");
/// ```
#[proc_macro_derive(Filterable, attributes(fiql))]
pub fn filterable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    filterable::filterable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
