//! Fan-out of catalog records to per-channel indices.
//!
//! A variant lands in one index per channel it is listed in. Grouping by index
//! name lets the client send a single batch call per index.

use std::collections::BTreeMap;

use algosync_core::{
    channel_index_name, object_id, product_and_variant_to_document, Product, SearchDocument,
    Variant,
};

/// Documents for one variant, keyed by the index of each channel it is
/// listed in. Empty when the variant has no channel listings.
#[must_use]
pub fn group_variant_by_index_name(
    product: &Product,
    variant: &Variant,
    index_name_prefix: Option<&str>,
) -> BTreeMap<String, Vec<SearchDocument>> {
    let mut grouped: BTreeMap<String, Vec<SearchDocument>> = BTreeMap::new();
    push_variant_documents(&mut grouped, product, variant, index_name_prefix);
    grouped
}

/// Documents for every variant of every product, keyed by index name.
#[must_use]
pub fn group_products_by_index_name(
    products: &[Product],
    index_name_prefix: Option<&str>,
) -> BTreeMap<String, Vec<SearchDocument>> {
    let mut grouped: BTreeMap<String, Vec<SearchDocument>> = BTreeMap::new();
    for product in products {
        for variant in product.variants() {
            push_variant_documents(&mut grouped, product, variant, index_name_prefix);
        }
    }
    grouped
}

/// Object ids of one variant, keyed by every index it was listed in. Used for
/// deletes, where only the id is needed.
#[must_use]
pub fn group_object_ids_by_index_name(
    product: &Product,
    variant: &Variant,
    index_name_prefix: Option<&str>,
) -> BTreeMap<String, Vec<String>> {
    let id = object_id(product, variant);
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for listing in variant.channel_listings() {
        grouped
            .entry(channel_index_name(&listing.channel, index_name_prefix))
            .or_default()
            .push(id.clone());
    }
    grouped
}

fn push_variant_documents(
    grouped: &mut BTreeMap<String, Vec<SearchDocument>>,
    product: &Product,
    variant: &Variant,
    index_name_prefix: Option<&str>,
) {
    for listing in variant.channel_listings() {
        let index_name = channel_index_name(&listing.channel, index_name_prefix);
        let document = product_and_variant_to_document(product, variant, &listing.channel.slug);
        grouped.entry(index_name).or_default().push(document);
    }
}
