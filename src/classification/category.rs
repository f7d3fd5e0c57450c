//! Topic index to product category lookup.

/// Label returned for any topic index the table does not cover.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Category labels indexed by topic, as assigned after inspecting the fitted topics.
const DEFAULT_CATEGORIES: [&str; 10] = [
    "Electronics",
    "Books",
    "Toys",
    "Clothing",
    "Home and Kitchen",
    "Sports and Outdoors",
    "Beauty and Health",
    "Automotive",
    "Pet Supplies",
    "Baby Products",
];

/// Read-only mapping from topic index to category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    labels: Vec<&'static str>,
}

impl CategoryMap {
    /// The fixed ten-entry table this deployment ships with.
    #[must_use]
    pub fn default_catalog() -> Self {
        Self {
            labels: DEFAULT_CATEGORIES.to_vec(),
        }
    }

    /// Total over all integers: indices outside the table resolve to [`UNKNOWN_CATEGORY`].
    #[must_use]
    pub fn lookup(&self, topic_index: i64) -> &'static str {
        usize::try_from(topic_index)
            .ok()
            .and_then(|idx| self.labels.get(idx).copied())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Same as [`Self::lookup`] for indices that come straight out of an arg-max.
    #[must_use]
    pub fn lookup_index(&self, topic_index: usize) -> &'static str {
        self.labels
            .get(topic_index)
            .copied()
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::default_catalog()
    }
}
