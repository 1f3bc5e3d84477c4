use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

pub fn expand_slice(input: ItemStruct) -> TokenStream {
    let handle_ident = &input.ident;
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;
    let generics = &input.generics;

    if !generics.params.is_empty() {
        return syn::Error::new_spanned(generics, "penmark_slice does not support generic structs")
            .to_compile_error();
    }

    let inner_ident = format_ident!("{handle_ident}Inner");
    let semi = if matches!(fields, syn::Fields::Named(_)) { quote!() } else { quote!(;) };

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #inner_ident #fields #semi

        #[derive(Debug, Clone)]
        #vis struct #handle_ident {
            inner: std::sync::Arc<#inner_ident>,
        }

        impl #handle_ident {
            #[must_use]
            pub fn new(inner: #inner_ident) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }

            /// Number of live handles sharing this state.
            #[must_use]
            pub fn handle_count(&self) -> usize {
                std::sync::Arc::strong_count(&self.inner)
            }
        }

        impl std::ops::Deref for #handle_ident {
            type Target = #inner_ident;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    }
}
