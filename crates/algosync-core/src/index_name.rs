use crate::catalog::Channel;

/// Derives the Algolia index name for a channel:
/// `[prefix.]{slug}.{currencyCode}.products`.
///
/// An empty prefix is treated as absent; Algolia rejects index names that
/// start with a dot.
#[must_use]
pub fn channel_index_name(channel: &Channel, prefix: Option<&str>) -> String {
    let prefix = prefix.filter(|p| !p.is_empty());

    prefix
        .into_iter()
        .chain([
            channel.slug.as_str(),
            channel.currency_code.as_str(),
            "products",
        ])
        .collect::<Vec<_>>()
        .join(".")
}
