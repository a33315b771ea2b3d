use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default, alias = "limit")]
    pub page_size: u64,
    #[serde(default, alias = "totalPages")]
    pub pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, page_size: u64) -> Self {
        Self {
            total,
            page,
            page_size,
            pages: page_count(total, page_size),
        }
    }

    /// Fills `pages` when the server omitted it.
    pub fn normalized(self) -> Self {
        if self.pages == 0 && self.total > 0 {
            Self::new(self.total, self.page, self.page_size)
        } else {
            self
        }
    }

    pub fn with_total(self, total: u64) -> Self {
        Self::new(total, self.page, self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::{Pagination, page_count};

    #[test]
    fn last_page_may_be_partial() {
        assert_eq!(page_count(25, 12), 3);
        assert_eq!(page_count(24, 12), 2);
        assert_eq!(page_count(0, 12), 0);
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn limit_alias_and_missing_pages_are_accepted() {
        let parsed: Pagination =
            serde_json::from_str(r#"{"total": 25, "page": 3, "limit": 12}"#).unwrap();
        let normalized = parsed.normalized();

        assert_eq!(normalized.page_size, 12);
        assert_eq!(normalized.pages, 3);
        assert!(!normalized.has_next());
    }
}
