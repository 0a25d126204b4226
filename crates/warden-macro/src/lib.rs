#![forbid(unsafe_code)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derives `StateIdentifier` and `Display` for a fieldless enum.
///
/// Each variant maps to its snake_case name, e.g. `Patrolling` -> `"patrolling"`.
/// The trait must be in scope at the derive site.
#[proc_macro_derive(StateIdentifier)]
pub fn derive_state_identifier(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let Data::Enum(data) = input.data else {
        return syn::Error::new_spanned(name, "StateIdentifier can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut arms = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(
                &variant.ident,
                "StateIdentifier variants must not carry data",
            )
            .to_compile_error()
            .into();
        }

        let ident = &variant.ident;
        let label = to_snake_case(&ident.to_string());
        arms.push(quote! { #name::#ident => #label });
    }

    let expanded = quote! {
        impl StateIdentifier for #name {
            fn as_str(&self) -> &'static str {
                match self {
                    #(#arms,)*
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(StateIdentifier::as_str(self))
            }
        }
    };

    TokenStream::from(expanded)
}

fn to_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
