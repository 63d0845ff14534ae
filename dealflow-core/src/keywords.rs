//! Keyword sets derived from a free-text founder query.

use serde::{Deserialize, Serialize};

/// Category, stage and location terms extracted from a query.
///
/// All terms are trimmed and lowercased on construction and blank terms are
/// dropped. Order is preserved and duplicates are kept.
///
/// # Examples
/// ```
/// use dealflow_core::QueryExpansion;
///
/// let keywords = QueryExpansion::new(["FinTech ", ""], ["Seed"], ["London"]);
/// assert_eq!(keywords.categories(), ["fintech"]);
/// assert_eq!(keywords.stages(), ["seed"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ExpansionPayload")]
pub struct QueryExpansion {
    categories: Vec<String>,
    stages: Vec<String>,
    locations: Vec<String>,
}

impl QueryExpansion {
    /// Build an expansion from three term lists.
    pub fn new<C, S, L>(categories: C, stages: S, locations: L) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        Self {
            categories: normalise_terms(categories),
            stages: normalise_terms(stages),
            locations: normalise_terms(locations),
        }
    }

    /// Expansion used when keyword extraction is unavailable.
    ///
    /// The raw query becomes the single category keyword; a blank query
    /// yields an empty expansion.
    ///
    /// # Examples
    /// ```
    /// use dealflow_core::QueryExpansion;
    ///
    /// let keywords = QueryExpansion::fallback("  Climate Tech ");
    /// assert_eq!(keywords.categories(), ["climate tech"]);
    /// assert!(keywords.stages().is_empty());
    /// assert!(QueryExpansion::fallback("   ").is_empty());
    /// ```
    pub fn fallback(query: &str) -> Self {
        Self::new([query], [""; 0], [""; 0])
    }

    /// Category terms.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Funding-stage terms.
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Location terms.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Report whether every term list is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.stages.is_empty() && self.locations.is_empty()
    }
}

/// Wire shape accepted from configuration files and generated completions.
#[derive(Debug, Default, Deserialize)]
struct ExpansionPayload {
    #[serde(default, alias = "category", alias = "sectors")]
    categories: Vec<String>,
    #[serde(default, alias = "stage", alias = "funding_stages")]
    stages: Vec<String>,
    #[serde(default, alias = "location")]
    locations: Vec<String>,
}

impl From<ExpansionPayload> for QueryExpansion {
    fn from(payload: ExpansionPayload) -> Self {
        Self::new(payload.categories, payload.stages, payload.locations)
    }
}

fn normalise_terms<I>(terms: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicates_are_tolerated() {
        let keywords = QueryExpansion::new(["AI", "ai"], [""; 0], [""; 0]);
        assert_eq!(keywords.categories(), ["ai", "ai"]);
    }

    #[rstest]
    fn deserialises_with_aliases_and_normalises() {
        let json = r#"{"category": [" SaaS "], "stage": ["Series A", " "], "locations": []}"#;
        let keywords: QueryExpansion = serde_json::from_str(json).expect("valid payload");
        assert_eq!(keywords.categories(), ["saas"]);
        assert_eq!(keywords.stages(), ["series a"]);
        assert!(keywords.locations().is_empty());
    }

    #[rstest]
    fn missing_lists_default_to_empty() {
        let keywords: QueryExpansion = serde_json::from_str("{}").expect("empty object");
        assert!(keywords.is_empty());
    }
}
