use std::collections::BTreeMap;

use crate::catalog::Category;

/// Number of category levels read: the category itself plus four ancestors.
const MAX_CATEGORY_DEPTH: usize = 5;

/// Builds hierarchical facets in the shape Algolia's hierarchical widgets
/// expect:
///
/// ```text
/// { "lvl0": "Root", "lvl1": "Root > Sub", "lvl2": "Root > Sub > Leaf" }
/// ```
///
/// Names are read from the outermost ancestor down to the category itself.
/// Missing or empty names are dropped before numbering, so an unnamed
/// intermediate ancestor shifts deeper levels up rather than leaving a gap.
#[must_use]
pub fn category_hierarchical_facets(category: Option<&Category>) -> BTreeMap<String, String> {
    let mut chain: Vec<&str> = Vec::with_capacity(MAX_CATEGORY_DEPTH);
    let mut current = category;
    while let Some(node) = current {
        if chain.len() == MAX_CATEGORY_DEPTH {
            break;
        }
        chain.push(node.name.as_deref().unwrap_or_default());
        current = node.parent.as_deref();
    }
    chain.reverse();

    let names: Vec<&str> = chain.into_iter().filter(|name| !name.is_empty()).collect();

    (0..names.len())
        .map(|level| (format!("lvl{level}"), names[..=level].join(" > ")))
        .collect()
}
