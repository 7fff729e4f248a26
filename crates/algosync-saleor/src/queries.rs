//! GraphQL documents sent to Saleor.
//!
//! The product selection is shared between the backfill query and the webhook
//! subscription queries so that both paths deserialize into the same
//! `algosync_core::Product` shape.

/// Fields of a single variant needed to build a search document.
pub const PRODUCT_VARIANT_FIELDS: &str = r"
fragment ProductVariantData on ProductVariant {
  id
  name
  sku
  quantityAvailable
  attributes {
    attribute { name }
    values { name }
  }
  metadata { key value }
  channelListings {
    channel { slug currencyCode }
    price { amount currency }
  }
}
";

/// Fields of a product, including its full variant list and up to five
/// category levels.
pub const PRODUCT_FIELDS: &str = r"
fragment ProductData on Product {
  id
  name
  slug
  description
  thumbnail { url }
  category {
    name
    parent {
      name
      parent {
        name
        parent {
          name
          parent { name }
        }
      }
    }
  }
  collections { name }
  attributes {
    attribute { name }
    values { name }
  }
  metadata { key value }
  media { url type }
  variants { ...ProductVariantData }
}
";

pub const PRODUCTS_QUERY: &str = r"
query FetchProducts($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    pageInfo { hasNextPage endCursor }
    edges { node { ...ProductData } }
  }
}
";

/// The app owning the request token: id, private metadata, and webhooks.
pub const OWN_APP_QUERY: &str = r"
query OwnApp {
  app {
    id
    privateMetadata { key value }
    webhooks { id isActive }
  }
}
";

pub const UPDATE_PRIVATE_METADATA_MUTATION: &str = r"
mutation UpdateAppPrivateMetadata($id: ID!, $input: [MetadataInput!]!) {
  updatePrivateMetadata(id: $id, input: $input) {
    errors { field message }
  }
}
";

pub const WEBHOOK_UPDATE_MUTATION: &str = r"
mutation SetWebhookActive($id: ID!, $isActive: Boolean!) {
  webhookUpdate(id: $id, input: { isActive: $isActive }) {
    errors { field message }
  }
}
";

/// Full products query document with its fragments.
#[must_use]
pub fn products_document() -> String {
    format!("{PRODUCTS_QUERY}{PRODUCT_FIELDS}{PRODUCT_VARIANT_FIELDS}")
}

/// Subscription query for a product-level event (`ProductCreated`, ...).
///
/// The delivered payload has the shape
/// `{ "product": {...}, "recipient": { "webhooks": [{ "id": ... }] } }`.
#[must_use]
pub fn product_subscription(event_type: &str) -> String {
    format!(
        "subscription {{ event {{ ... on {event_type} {{ product {{ ...ProductData }} \
         recipient {{ webhooks {{ id }} }} }} }} }}{PRODUCT_FIELDS}{PRODUCT_VARIANT_FIELDS}"
    )
}

/// Subscription query for a variant-level event (`ProductVariantUpdated`, ...).
///
/// The delivered payload has the shape
/// `{ "productVariant": {..., "product": {...}}, "recipient": {...} }`.
#[must_use]
pub fn product_variant_subscription(event_type: &str) -> String {
    format!(
        "subscription {{ event {{ ... on {event_type} {{ productVariant {{ \
         ...ProductVariantData product {{ ...ProductData }} }} \
         recipient {{ webhooks {{ id }} }} }} }} }}{PRODUCT_FIELDS}{PRODUCT_VARIANT_FIELDS}"
    )
}
