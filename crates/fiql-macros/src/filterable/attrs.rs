//! Attribute parsing for the Filterable derive macro.
//!
//! Parses the `#[fiql(...)]` field attributes: `skip` and `rename = "..."`.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[fiql(...)]`.
#[derive(Debug, Clone, Default)]
pub struct FiqlAttr {
    /// Leave this field out of the field map.
    pub skip: bool,
    /// Field name used in queries (default: the Rust field name).
    pub rename: Option<String>,
}

impl Parse for FiqlAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FiqlAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        let name = s.value();
                        if name.is_empty() {
                            return Err(Error::new(s.span(), "rename must not be empty"));
                        }
                        attr.rename = Some(name);
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown fiql attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[fiql(...)]` attributes from a field's attributes.
pub fn parse_fiql_attrs(attrs: &[Attribute]) -> Result<FiqlAttr> {
    let mut merged = FiqlAttr::default();
    for attr in attrs {
        if attr.path().is_ident("fiql") {
            let parsed = attr.parse_args::<FiqlAttr>()?;
            merged.skip |= parsed.skip;
            if parsed.rename.is_some() {
                merged.rename = parsed.rename;
            }
        }
    }
    Ok(merged)
}
