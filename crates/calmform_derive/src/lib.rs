use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Implements `calmform::form::Model` from flag fields.
///
/// `#[model(dirty)]`, `#[model(invalid)]` and `#[model(dirty_attributes)]` mark fields
/// whose type implements `ModelFlag`. Several fields may carry the same flag; the model
/// reports the flag when any of them is set.
///
/// Record-store adapters read invalidity from `validations()` rather than `is_invalid()`.
/// Mark those fields `#[model(validations)]`; the model then reports a `ValidationState`
/// whose `is_invalid` is set when any of them is. `validate`, `save` and `rollback` keep
/// their trait defaults, so implement `Model` by hand when a model needs them.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "Model derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "Model derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(Span::call_site(), "Model derive is only supported on structs")
                .to_compile_error()
                .into();
        }
    };

    let mut dirty = Vec::new();
    let mut invalid = Vec::new();
    let mut dirty_attributes = Vec::new();
    let mut validations = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("model")) {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("dirty") {
                    dirty.push(field_ident.clone());
                    Ok(())
                } else if meta.path.is_ident("invalid") {
                    invalid.push(field_ident.clone());
                    Ok(())
                } else if meta.path.is_ident("dirty_attributes") {
                    dirty_attributes.push(field_ident.clone());
                    Ok(())
                } else if meta.path.is_ident("validations") {
                    validations.push(field_ident.clone());
                    Ok(())
                } else {
                    Err(meta.error(
                        "expected `dirty`, `invalid`, `dirty_attributes` or `validations`",
                    ))
                }
            });
            if let Err(error) = parsed {
                return error.to_compile_error().into();
            }
        }
    }

    let calmform = calmform_path();
    let is_dirty = flag_method(&calmform, "is_dirty", &dirty);
    let is_invalid = flag_method(&calmform, "is_invalid", &invalid);
    let has_dirty_attributes = flag_method(&calmform, "has_dirty_attributes", &dirty_attributes);
    let validations = validations_method(&calmform, &validations);

    quote! {
        impl #calmform::form::Model for #model_ident {
            #is_dirty
            #is_invalid
            #has_dirty_attributes
            #validations
        }
    }
    .into()
}

fn flag_method(calmform: &TokenStream2, name: &str, fields: &[Ident]) -> TokenStream2 {
    if fields.is_empty() {
        return TokenStream2::new();
    }
    let method = Ident::new(name, Span::call_site());
    let checks = fields
        .iter()
        .map(|field| quote!(#calmform::form::ModelFlag::is_set(&self.#field)));
    quote! {
        fn #method(&self) -> bool {
            false #(|| #checks)*
        }
    }
}

fn validations_method(calmform: &TokenStream2, fields: &[Ident]) -> TokenStream2 {
    if fields.is_empty() {
        return TokenStream2::new();
    }
    let checks = fields
        .iter()
        .map(|field| quote!(#calmform::form::ModelFlag::is_set(&self.#field)));
    quote! {
        fn validations(&self) -> ::core::option::Option<#calmform::form::ValidationState> {
            ::core::option::Option::Some(#calmform::form::ValidationState {
                is_invalid: false #(|| #checks)*,
            })
        }
    }
}

fn calmform_path() -> TokenStream2 {
    match crate_name("calmform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::calmform),
    }
}
