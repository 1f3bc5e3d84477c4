#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Penmark crates.
//! They remove the boilerplate behind two recurring patterns: domain error enums with
//! attachable context, and `Arc`-backed feature handles that are cheap to clone into
//! other services.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! penmark-derive.workspace = true
//! ```
//!
//! See each macro’s docstring for examples; they are `ignore`d to avoid compiling in this crate,
//! but the `tests/ui` cases exercise them end to end.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Turns an enum into a domain error with attachable context.
///
/// Adds `#[derive(Debug, thiserror::Error)]` and generates:
///
/// * `<ErrorName>Ext`, a trait with `.context(...)` for `Result<T, ErrorName>` (replaces the
///   context of any variant) and for `Result<T, Source>` of every wrapped source type.
/// * `From<Source>` for every variant with a field named `source`, so `?` converts upstream
///   errors.
/// * A module-level `format_context` helper for `#[error(...)]` strings. One annotated enum
///   per module.
///
/// # Requirements
///
/// Every variant has named fields, including `context: Option<Cow<'static, str>>`. Variants
/// wrapping another error name that field `source`, and no two variants may wrap the same
/// source type.
///
/// # Example
///
/// ```rust,ignore
/// use penmark_derive::penmark_error;
/// use std::borrow::Cow;
///
/// #[penmark_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Record is empty{}", format_context(.context))]
///     Empty { context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &std::path::Path) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading license record")
/// }
/// ```
#[proc_macro_attribute]
pub fn penmark_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature handle.
///
/// This macro transforms a struct into a shared handle:
/// 1. Renames the annotated struct to `<Name>Inner` and keeps its fields and attributes.
/// 2. Generates `<Name>` holding an `Arc<<Name>Inner>` with a `new` constructor.
/// 3. Implements `Deref` for transparent access to the inner state.
///
/// # Example
/// ```rust,ignore
/// #[penmark_derive::penmark_slice]
/// pub struct Licensing {
///     pub name: String,
/// }
///
/// fn init() -> Licensing {
///     Licensing::new(LicensingInner { name: "licensing".to_owned() })
/// }
/// ```
#[proc_macro_attribute]
pub fn penmark_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
