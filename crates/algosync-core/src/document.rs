//! Projection of a (product, variant, channel) triple into the flat record
//! stored in the channel's search index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{MetadataItem, Product, SelectedAttribute, Variant};
use crate::category::category_hierarchical_facets;

/// One record in a channel index. Serialized field names are the ones the
/// storefront search UI queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub product_id: String,
    pub variant_id: String,
    pub name: String,
    pub product_name: String,
    pub variant_name: String,
    pub attributes: BTreeMap<String, String>,
    pub media: Vec<MediaDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<serde_json::Value>,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_price: Option<f64>,
    pub in_stock: bool,
    pub categories: BTreeMap<String, String>,
    pub collections: Vec<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub variant_metadata: BTreeMap<String, serde_json::Value>,
    pub other_variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDocument {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Deterministic document id: `{productId}_{variantId}`. Re-importing the
/// same variant always overwrites the same record.
#[must_use]
pub fn object_id(product: &Product, variant: &Variant) -> String {
    format!("{}_{}", product.id, variant.id)
}

/// Builds the search document for `variant` of `product` as seen in
/// `channel_slug`.
///
/// Never fails: missing optional data leaves the corresponding field empty or
/// absent. A variant with no listing in the channel gets no `grossPrice`.
#[must_use]
pub fn product_and_variant_to_document(
    product: &Product,
    variant: &Variant,
    channel_slug: &str,
) -> SearchDocument {
    let mut attributes = BTreeMap::new();
    for attr in product.attributes.iter().chain(&variant.attributes) {
        if let Some((name, values)) = selected_attribute_entry(attr) {
            attributes.insert(name, values);
        }
    }

    let gross_price = variant
        .listing_for(channel_slug)
        .and_then(|listing| listing.price.as_ref())
        .map(|price| price.amount);

    let media = product
        .media
        .iter()
        .flatten()
        .map(|m| MediaDocument {
            url: m.url.clone(),
            kind: m.kind.clone(),
        })
        .collect();

    let other_variants = product
        .variants()
        .iter()
        .map(|v| v.id.clone())
        .filter(|id| *id != variant.id)
        .collect();

    SearchDocument {
        object_id: object_id(product, variant),
        product_id: product.id.clone(),
        variant_id: variant.id.clone(),
        name: format!("{} - {}", product.name, variant.name),
        product_name: product.name.clone(),
        variant_name: variant.name.clone(),
        attributes,
        media,
        description: product.description.as_deref().and_then(parse_rich_text),
        slug: product.slug.clone(),
        thumbnail: product.thumbnail.as_ref().map(|t| t.url.clone()),
        gross_price,
        in_stock: variant.is_in_stock(),
        categories: category_hierarchical_facets(product.category.as_ref()),
        collections: product
            .collections
            .iter()
            .flatten()
            .map(|c| c.name.clone())
            .collect(),
        metadata: metadata_to_attribute(&product.metadata),
        variant_metadata: metadata_to_attribute(&variant.metadata),
        other_variants,
    }
}

/// Maps a selected attribute to `(name, "value1, value2")`. Values without a
/// name are skipped; an attribute with no named values maps to `""`.
/// Attributes without a name produce nothing.
fn selected_attribute_entry(attr: &SelectedAttribute) -> Option<(String, String)> {
    let name = attr.attribute.name.as_deref().filter(|n| !n.is_empty())?;

    let values = attr
        .values
        .iter()
        .filter_map(|v| v.name.as_deref())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    Some((name.to_string(), values))
}

fn parse_rich_text(raw: &str) -> Option<serde_json::Value> {
    serde_json::from_str(raw).ok()
}

/// Turns `[{key, value}]` metadata into an object. Values holding valid JSON
/// are stored parsed so they stay filterable; anything else is kept as the
/// raw string.
fn metadata_to_attribute(metadata: &[MetadataItem]) -> BTreeMap<String, serde_json::Value> {
    metadata
        .iter()
        .map(|item| {
            let value = serde_json::from_str(&item.value)
                .unwrap_or_else(|_| serde_json::Value::String(item.value.clone()));
            (item.key.clone(), value)
        })
        .collect()
}
