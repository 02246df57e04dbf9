//! Implementation of the `#[derive(Filterable)]` macro.
//!
//! Generates a `fiql::Filterable` impl that converts every field through
//! `fiql::ToValue`, plus field name constants for building queries.

mod attrs;
mod derive;

pub use derive::filterable_derive_impl;
