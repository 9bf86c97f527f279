//! Crate path resolution for generated code.
//!
//! Detects whether the user depends on `repokit` (facade) or `repokit-data`
//! directly, and returns the appropriate path prefix for generated code.

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;

/// Returns the token stream for accessing `repokit_data` items.
///
/// If the user depends on `repokit`, returns `::repokit`.
/// Otherwise returns `::repokit_data`.
pub fn repokit_data_path() -> TokenStream {
    // First check if the facade crate is available
    if let Ok(found) = crate_name("repokit") {
        resolve(found, "repokit")
    } else if let Ok(found) = crate_name("repokit-data") {
        resolve(found, "repokit_data")
    } else {
        // Fallback - assume repokit_data is available (for error messages)
        quote!(::repokit_data)
    }
}

fn resolve(found: FoundCrate, lib_name: &str) -> TokenStream {
    match found {
        // Integration tests and examples of the package itself see
        // `Itself` too, but they link the library as an external crate.
        FoundCrate::Itself if is_compiling_lib(lib_name) => quote!(crate),
        FoundCrate::Itself => {
            let ident = syn::Ident::new(lib_name, proc_macro2::Span::call_site());
            quote!(::#ident)
        }
        FoundCrate::Name(name) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote!(::#ident)
        }
    }
}

fn is_compiling_lib(lib_name: &str) -> bool {
    std::env::var("CARGO_CRATE_NAME").map_or(true, |name| name == lib_name)
}
