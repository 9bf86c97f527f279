use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Visibility};

use crate::crate_path::repokit_data_path;

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match generate(&input) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed field-level `#[orm(...)]` attributes.
#[derive(Default)]
struct FieldOrm {
    column: Option<String>,
    primary_key: bool,
    embedded: bool,
    skip: bool,
}

/// Extract `#[orm(column = "...", primary_key, embedded, skip)]` from a field's attributes.
fn extract_field_orm(attrs: &[syn::Attribute]) -> syn::Result<FieldOrm> {
    let mut result = FieldOrm::default();
    for attr in attrs {
        if attr.path().is_ident("orm") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new_spanned(lit, "column name cannot be empty"));
                    }
                    result.column = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("primary_key") {
                    result.primary_key = true;
                    Ok(())
                } else if meta.path.is_ident("embedded") {
                    result.embedded = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                    Ok(())
                } else {
                    Err(meta.error(
                        "expected `column`, `primary_key`, `embedded`, or `skip` in #[orm(...)]",
                    ))
                }
            })?;
        }
    }
    Ok(result)
}

fn generate(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let krate = repokit_data_path();
    let private = quote!(#krate::__private);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "#[derive(Record)] only works on structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Record)] only works on structs",
            ))
        }
    };

    let mut describe = Vec::new();
    let mut flatten = Vec::new();
    for field in fields {
        let orm = extract_field_orm(&field.attrs)?;
        if orm.skip || matches!(field.vis, Visibility::Inherited) {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;

        if orm.embedded {
            if orm.column.is_some() || orm.primary_key {
                return Err(syn::Error::new_spanned(
                    ident,
                    "#[orm(embedded)] cannot be combined with `column` or `primary_key`",
                ));
            }
            describe.push(quote! {
                <#ty as #private::Record>::describe(out);
            });
            flatten.push(quote! {
                #private::Record::flatten_into(&self.#ident, out);
            });
            continue;
        }

        let field_name = ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
        let column = orm.column.as_ref().map(|c| quote!(.column(#c)));
        let primary_key = orm.primary_key.then(|| quote!(.primary_key()));
        let descriptor = quote! {
            #private::FieldDescriptor::new(
                #field_name,
                <#ty as #private::FieldValue>::KIND,
            )#column #primary_key
        };
        describe.push(quote! {
            out.push(#descriptor);
        });
        flatten.push(quote! {
            out.push(#private::FlatField::new(#descriptor, &self.#ident));
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #private::Record for #name #ty_generics #where_clause {
            fn describe(out: &mut ::std::vec::Vec<#private::FieldDescriptor>) {
                #(#describe)*
            }

            fn flatten_into(&self, out: &mut ::std::vec::Vec<#private::FlatField>) {
                #(#flatten)*
            }
        }
    })
}
