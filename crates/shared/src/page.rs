//! Pagination parameters for list endpoints.

use serde::{Deserialize, Serialize};

/// Take/skip pagination over a combined result set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    /// Maximum number of items to return.
    #[serde(default = "default_take")]
    pub take: u64,
    /// Number of items to skip from the start of the ordered set.
    #[serde(default)]
    pub skip: u64,
}

fn default_take() -> u64 {
    10
}

impl Default for Page {
    fn default() -> Self {
        Self {
            take: default_take(),
            skip: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Page::default();
        assert_eq!(page.take, 10);
        assert_eq!(page.skip, 0);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.take, 10);
        assert_eq!(page.skip, 0);

        let page: Page = serde_json::from_str(r#"{"take": 25, "skip": 50}"#).unwrap();
        assert_eq!(page.take, 25);
        assert_eq!(page.skip, 50);
    }
}
