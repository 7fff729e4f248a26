use serde::{Deserialize, Serialize};

/// Algolia credentials and index naming, as kept in the app's configuration
/// store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgoliaSettings {
    pub app_id: String,
    /// Admin API key with `addObject`, `deleteObject`, and `listIndexes` ACLs.
    pub secret_key: String,
    #[serde(default)]
    pub index_name_prefix: Option<String>,
}

impl AlgoliaSettings {
    /// `true` when both the app id and the key are non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.app_id.trim().is_empty() && !self.secret_key.trim().is_empty()
    }

    /// The secret key with all but its last four characters masked, for
    /// display in the admin API.
    #[must_use]
    pub fn masked_secret_key(&self) -> String {
        let visible: String = self
            .secret_key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let hidden = self.secret_key.chars().count().saturating_sub(4);
        format!("{}{visible}", "*".repeat(hidden))
    }
}

impl std::fmt::Debug for AlgoliaSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgoliaSettings")
            .field("app_id", &self.app_id)
            .field("secret_key", &"[redacted]")
            .field("index_name_prefix", &self.index_name_prefix)
            .finish()
    }
}
