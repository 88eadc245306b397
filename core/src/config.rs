use serde::Deserialize;

/// Tunables for ranking and request history.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results kept after ranking.
    pub max_results: usize,
    /// Relevance values closer than this are ranked by rating instead.
    pub relevance_epsilon: f64,
    /// Requests retained by [`crate::RequestQueue`] (one day at one per minute).
    pub history_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 5, relevance_epsilon: 1e-6, history_capacity: 1440 }
    }
}

impl SearchConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SearchConfig::from_json(r#"{ "max_results": 10 }"#).unwrap();
        assert_eq!(cfg.max_results, 10);
        assert_eq!(cfg.history_capacity, 1440);
        assert!((cfg.relevance_epsilon - 1e-6).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SearchConfig::from_json("{}").unwrap(), SearchConfig::default());
    }
}
