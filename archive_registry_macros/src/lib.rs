mod model;

use proc_macro::TokenStream;

/// Derive macro for the `Model` trait.
///
/// Generates `COLLECTION`, `ORDER_BY`, `id()` and `set_id()` from struct
/// attributes. The id field must be a `String`.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Model)]
/// #[model(collection = "files", order_by = "itemNumber")]
/// struct FileRecord {
///     #[model(id)]
///     pub id: String,
///     pub item_number: i64,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
