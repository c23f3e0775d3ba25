use serde::{Deserialize, Serialize};

/// Paged list envelope used by every listing endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: vec![],
            number: 0,
            size: 0,
            total_elements: 0,
            total_pages: 0,
        }
    }
}

impl<T> Page<T> {
    /// Pages are zero based on the wire.
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_has_next() {
        let page: Page<i64> = serde_json::from_str(
            r#"{"content":[1,2],"number":0,"size":2,"totalElements":3,"totalPages":2}"#,
        )
        .unwrap();
        assert!(page.has_next());

        let last = Page::<i64> {
            number: 1,
            ..page
        };
        assert!(!last.has_next());
        assert!(!Page::<i64>::default().has_next());
    }
}
