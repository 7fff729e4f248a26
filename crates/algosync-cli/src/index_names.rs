//! `index-names` command.

use std::collections::BTreeSet;

use algosync_core::{channel_index_name, Channel, Product};

use crate::context::CliContext;

/// Prints the index names for `channels`, or for every channel found in the
/// catalog when none are given. The prefix defaults to the stored setting.
pub(crate) async fn run_index_names(
    ctx: &CliContext,
    channels: &[String],
    prefix: Option<&str>,
) -> anyhow::Result<()> {
    let stored_prefix = if prefix.is_none() {
        ctx.saleor
            .fetch_settings()
            .await?
            .and_then(|s| s.index_name_prefix)
    } else {
        None
    };
    let prefix = prefix.or(stored_prefix.as_deref());

    let names = if channels.is_empty() {
        let products = ctx
            .saleor
            .fetch_all_products(ctx.config.products_page_size)
            .await?;
        catalog_index_names(&products, prefix)
    } else {
        channels
            .iter()
            .map(|raw| parse_channel(raw).map(|c| channel_index_name(&c, prefix)))
            .collect::<anyhow::Result<BTreeSet<_>>>()?
    };

    if names.is_empty() {
        println!("no channel listings found");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Distinct index names across every variant listing in `products`.
pub(crate) fn catalog_index_names(products: &[Product], prefix: Option<&str>) -> BTreeSet<String> {
    products
        .iter()
        .flat_map(Product::variants)
        .flat_map(algosync_core::Variant::channel_listings)
        .map(|listing| channel_index_name(&listing.channel, prefix))
        .collect()
}

/// Parses `slug:CURRENCY`.
pub(crate) fn parse_channel(raw: &str) -> anyhow::Result<Channel> {
    let (slug, currency) = raw
        .split_once(':')
        .map(|(s, c)| (s.trim(), c.trim()))
        .filter(|(s, c)| !s.is_empty() && !c.is_empty())
        .ok_or_else(|| anyhow::anyhow!("invalid channel \"{raw}\"; expected slug:CURRENCY"))?;
    Ok(Channel {
        slug: slug.to_owned(),
        currency_code: currency.to_owned(),
    })
}
