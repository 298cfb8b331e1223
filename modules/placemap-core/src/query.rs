//! Search-box matching.

use placemap_common::Place;

/// A lower-cased search query, normalized once and reused across places.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMatcher {
    needle: String,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// A place matches when the query is empty, when one of its category
    /// names contains the query, or when its name starts with the query.
    pub fn matches(&self, place: &Place) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        if place
            .category_names()
            .any(|name| name.to_lowercase().contains(&self.needle))
        {
            return true;
        }

        place.name.to_lowercase().starts_with(&self.needle)
    }
}

pub fn matches(place: &Place, query: &str) -> bool {
    QueryMatcher::new(query).matches(place)
}
