//! Saleor events this app subscribes to.

/// A catalog event delivered by Saleor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEvent {
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    ProductVariantCreated,
    ProductVariantUpdated,
    ProductVariantDeleted,
    ProductVariantOutOfStock,
    ProductVariantBackInStock,
}

impl WebhookEvent {
    pub const ALL: [Self; 8] = [
        Self::ProductCreated,
        Self::ProductUpdated,
        Self::ProductDeleted,
        Self::ProductVariantCreated,
        Self::ProductVariantUpdated,
        Self::ProductVariantDeleted,
        Self::ProductVariantOutOfStock,
        Self::ProductVariantBackInStock,
    ];

    /// Saleor's enum name, e.g. `PRODUCT_VARIANT_OUT_OF_STOCK`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProductCreated => "PRODUCT_CREATED",
            Self::ProductUpdated => "PRODUCT_UPDATED",
            Self::ProductDeleted => "PRODUCT_DELETED",
            Self::ProductVariantCreated => "PRODUCT_VARIANT_CREATED",
            Self::ProductVariantUpdated => "PRODUCT_VARIANT_UPDATED",
            Self::ProductVariantDeleted => "PRODUCT_VARIANT_DELETED",
            Self::ProductVariantOutOfStock => "PRODUCT_VARIANT_OUT_OF_STOCK",
            Self::ProductVariantBackInStock => "PRODUCT_VARIANT_BACK_IN_STOCK",
        }
    }

    /// GraphQL type of the subscription payload, e.g. `ProductVariantOutOfStock`.
    #[must_use]
    pub fn subscription_type(self) -> &'static str {
        match self {
            Self::ProductCreated => "ProductCreated",
            Self::ProductUpdated => "ProductUpdated",
            Self::ProductDeleted => "ProductDeleted",
            Self::ProductVariantCreated => "ProductVariantCreated",
            Self::ProductVariantUpdated => "ProductVariantUpdated",
            Self::ProductVariantDeleted => "ProductVariantDeleted",
            Self::ProductVariantOutOfStock => "ProductVariantOutOfStock",
            Self::ProductVariantBackInStock => "ProductVariantBackInStock",
        }
    }

    /// Route segment under `/api/webhooks/saleor/`: the lowercased enum name.
    #[must_use]
    pub fn path_segment(self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Parses either the route segment or the `saleor-event` header value.
    /// Matching is case-insensitive.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(value.trim()))
    }

    #[must_use]
    pub fn is_variant_event(self) -> bool {
        !matches!(
            self,
            Self::ProductCreated | Self::ProductUpdated | Self::ProductDeleted
        )
    }

    #[must_use]
    pub fn is_delete(self) -> bool {
        matches!(self, Self::ProductDeleted | Self::ProductVariantDeleted)
    }

    /// Full subscription document for the app manifest.
    #[must_use]
    pub fn subscription_query(self) -> String {
        if self.is_variant_event() {
            algosync_saleor::queries::product_variant_subscription(self.subscription_type())
        } else {
            algosync_saleor::queries::product_subscription(self.subscription_type())
        }
    }
}

impl std::fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_header_and_route_forms() {
        assert_eq!(
            WebhookEvent::parse("product_variant_out_of_stock"),
            Some(WebhookEvent::ProductVariantOutOfStock)
        );
        assert_eq!(
            WebhookEvent::parse("PRODUCT_UPDATED"),
            Some(WebhookEvent::ProductUpdated)
        );
        assert_eq!(WebhookEvent::parse("order_created"), None);
    }

    #[test]
    fn path_segment_round_trips_for_every_event() {
        for event in WebhookEvent::ALL {
            assert_eq!(WebhookEvent::parse(&event.path_segment()), Some(event));
        }
    }

    #[test]
    fn variant_events_select_product_variant() {
        let query = WebhookEvent::ProductVariantBackInStock.subscription_query();
        assert!(query.contains("... on ProductVariantBackInStock { productVariant"));
        let query = WebhookEvent::ProductDeleted.subscription_query();
        assert!(query.contains("... on ProductDeleted { product {"));
    }

    #[test]
    fn only_deleted_events_delete() {
        let deletes: Vec<_> = WebhookEvent::ALL
            .into_iter()
            .filter(|e| e.is_delete())
            .collect();
        assert_eq!(
            deletes,
            [
                WebhookEvent::ProductDeleted,
                WebhookEvent::ProductVariantDeleted
            ]
        );
    }
}
