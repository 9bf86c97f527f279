use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::crate_path::repokit_data_path;

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match generate(&input) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Extract `#[orm(table = "...")]` from the struct, if present.
fn extract_table(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut table = None;
    for attr in &input.attrs {
        if attr.path().is_ident("orm") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new_spanned(lit, "table name cannot be empty"));
                    }
                    table = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `table` in #[orm(table = \"...\")]"))
                }
            })?;
        }
    }
    Ok(table)
}

fn generate(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let krate = repokit_data_path();
    let private = quote!(#krate::__private);

    let body = match extract_table(input)? {
        Some(table) => quote!(#table),
        None => {
            let type_name = name.to_string();
            quote! {
                static TABLE: ::std::sync::LazyLock<::std::string::String> =
                    ::std::sync::LazyLock::new(|| #private::default_table_name(#type_name));
                TABLE.as_str()
            }
        }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #private::Entity for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #body
            }
        }
    })
}
