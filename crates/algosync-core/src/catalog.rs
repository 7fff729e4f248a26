//! Catalog records as Saleor delivers them in webhook payloads and product
//! queries.
//!
//! Field names follow the GraphQL schema (`camelCase`). Lists that Saleor
//! declares nullable (`collections`, `media`, `variants`, `channelListings`)
//! are `Option<Vec<_>>` because an explicit `null` does not deserialize into a
//! defaulted `Vec`.

use serde::{Deserialize, Serialize};

/// A product together with everything the search document needs from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// Rich-text description serialized as a JSON string (`EditorJS` blocks).
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Image>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub collections: Option<Vec<NamedRef>>,
    #[serde(default)]
    pub attributes: Vec<SelectedAttribute>,
    #[serde(default)]
    pub metadata: Vec<MetadataItem>,
    #[serde(default)]
    pub media: Option<Vec<Media>>,
    /// Either bare `{id}` references (webhook payloads) or full variants
    /// (product queries and product-level webhooks).
    #[serde(default)]
    pub variants: Option<Vec<Variant>>,
}

impl Product {
    /// Returns the variants of this product, or an empty slice when Saleor
    /// sent `null`.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        self.variants.as_deref().unwrap_or_default()
    }

    /// Returns the total number of variants for this product.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants().len()
    }
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity_available: Option<i64>,
    #[serde(default)]
    pub attributes: Vec<SelectedAttribute>,
    #[serde(default)]
    pub metadata: Vec<MetadataItem>,
    #[serde(default)]
    pub channel_listings: Option<Vec<ChannelListing>>,
}

impl Variant {
    #[must_use]
    pub fn channel_listings(&self) -> &[ChannelListing] {
        self.channel_listings.as_deref().unwrap_or_default()
    }

    /// Returns the listing for the channel with the given slug, if any.
    #[must_use]
    pub fn listing_for(&self, channel_slug: &str) -> Option<&ChannelListing> {
        self.channel_listings()
            .iter()
            .find(|l| l.channel.slug == channel_slug)
    }

    /// `true` when Saleor reports a positive available quantity. A missing
    /// quantity counts as out of stock.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.quantity_available.is_some_and(|q| q > 0)
    }
}

/// Variant webhook payload shape: the variant's own fields plus its product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariantPayload {
    #[serde(flatten)]
    pub variant: Variant,
    pub product: Product,
}

/// A sales context. Each channel gets its own search index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub slug: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelListing {
    pub channel: Channel,
    #[serde(default)]
    pub price: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// A category and up to four of its ancestors, nested through `parent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<Box<Category>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedAttribute {
    pub attribute: AttributeRef,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeValue {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    /// `IMAGE` or `VIDEO`.
    #[serde(rename = "type")]
    pub kind: String,
}
