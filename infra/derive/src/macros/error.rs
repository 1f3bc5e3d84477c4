use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, Type, Variant};

/// What the generated impls need to know about one variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    /// Type of the field named `source`, if the variant wraps another error.
    source: Option<&'a Type>,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    expand(&input).unwrap_or_else(syn::Error::into_compile_error)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "penmark_error can only be applied to enums",
        ));
    };

    let variants = data.variants.iter().map(error_variant).collect::<syn::Result<Vec<_>>>()?;
    reject_shared_sources(&variants)?;

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let arms = variants.iter().map(|v| {
        let ident = v.ident;
        quote! { #name::#ident { context, .. } => *context = Some(message.into()), }
    });

    let conversions = variants.iter().filter_map(|v| {
        let (ident, ty) = (v.ident, v.source?);
        Some(quote! {
            #[automatically_derived]
            impl ::core::convert::From<#ty> for #name {
                #[inline]
                fn from(source: #ty) -> Self {
                    Self::#ident { source, context: None }
                }
            }

            #[automatically_derived]
            impl<T> #ext<T> for ::core::result::Result<T, #ty> {
                #[inline]
                fn context(
                    self,
                    message: impl Into<::std::borrow::Cow<'static, str>>,
                ) -> ::core::result::Result<T, #name> {
                    self.map_err(|source| #name::#ident { source, context: Some(message.into()) })
                }
            }
        })
    });

    Ok(quote! {
        #[derive(Debug, ::thiserror::Error)]
        #input

        /// Attaches a short description of the failed step to an error.
        pub trait #ext<T> {
            fn context(
                self,
                message: impl Into<::std::borrow::Cow<'static, str>>,
            ) -> ::core::result::Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for ::core::result::Result<T, #name> {
            #[inline]
            fn context(self, message: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #( #arms )*
                    }
                    err
                })
            }
        }

        #( #conversions )*

        #[allow(dead_code)]
        fn format_context(
            context: &Option<::std::borrow::Cow<'static, str>>,
        ) -> ::std::borrow::Cow<'static, str> {
            context.as_ref().map_or(::std::borrow::Cow::Borrowed(""), |c| {
                ::std::borrow::Cow::Owned(format!(" ({c})"))
            })
        }
    })
}

fn error_variant(variant: &Variant) -> syn::Result<ErrorVariant<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(variant, "penmark_error variants need named fields"));
    };
    let field =
        |name: &str| fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == name));

    let Some(context) = field("context") else {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "penmark_error variants need a `context: Option<Cow<'static, str>>` field",
        ));
    };
    if !is_context_type(&context.ty) {
        return Err(syn::Error::new_spanned(
            &context.ty,
            "context field must be Option<Cow<'static, str>>",
        ));
    }

    Ok(ErrorVariant { ident: &variant.ident, source: field("source").map(|f| &f.ty) })
}

/// One `From` impl per source type, so two variants may not wrap the same type.
fn reject_shared_sources(variants: &[ErrorVariant<'_>]) -> syn::Result<()> {
    let mut seen = FxHashSet::default();
    for ty in variants.iter().filter_map(|v| v.source) {
        if !seen.insert(normalized(ty)) {
            return Err(syn::Error::new_spanned(
                ty,
                "penmark_error variants must wrap distinct source types",
            ));
        }
    }
    Ok(())
}

/// Accepts `Option<Cow<'static, str>>` with optional `std::option::` / `std::borrow::` paths.
fn is_context_type(ty: &Type) -> bool {
    let text = normalized(ty);
    let Some(head) = text.strip_suffix("Cow<'static,str>>") else {
        return false;
    };
    let Some((option, cow_path)) = head.split_once('<') else {
        return false;
    };
    option.rsplit("::").next() == Some("Option")
        && (cow_path.is_empty() || cow_path.ends_with("borrow::"))
}

fn normalized(ty: &Type) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}
