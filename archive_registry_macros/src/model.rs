use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let options = extract_options(input)?;
    let collection = options
        .collection
        .unwrap_or_else(|| format!("{}s", to_snake_case(&name.to_string())));
    let order_by = options.order_by.unwrap_or_else(|| "id".to_string());

    let id_field = extract_id_field(input)?.ok_or_else(|| {
        syn::Error::new_spanned(
            name,
            "Model derive: no field marked with #[model(id)] and no field named `id`",
        )
    })?;

    Ok(quote! {
        impl archive_registry::Model for #name {
            const COLLECTION: &'static str = #collection;
            const ORDER_BY: &'static str = #order_by;

            fn id(&self) -> &str {
                &self.#id_field
            }

            fn set_id(&mut self, id: &str) {
                self.#id_field = id.to_string();
            }
        }
    })
}

#[derive(Default)]
struct ModelOptions {
    collection: Option<String>,
    order_by: Option<String>,
}

fn extract_options(input: &DeriveInput) -> syn::Result<ModelOptions> {
    let mut options = ModelOptions::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                options.collection = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("order_by") {
                let value: LitStr = meta.value()?.parse()?;
                options.order_by = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unknown model option, expected `collection` or `order_by`"))
            }
        })?;
    }

    Ok(options)
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<Option<syn::Ident>> {
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Model derive: only structs with named fields are supported",
        ));
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Model derive: only structs with named fields are supported",
        ));
    };

    let mut marked = None;
    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    if marked.is_some() {
                        return Err(meta.error("only one field may be marked #[model(id)]"));
                    }
                    marked = field.ident.clone();
                    Ok(())
                } else {
                    Err(meta.error("unknown field option, expected `id`"))
                }
            })?;
        }
    }
    if marked.is_some() {
        return Ok(marked);
    }

    // Fall back to a field named `id`
    Ok(fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == "id")
        .cloned())
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
