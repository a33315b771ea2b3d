use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Query signature of a list fetch: filters plus pagination.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListQuery {
    pub page: u64,
    pub page_size: u64,
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn page(page: u64) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let key = key.into();
        if value.trim().is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
        self
    }

    pub fn search(self, text: impl Into<String>) -> Self {
        self.with_filter("search", text)
    }

    /// Query-string pairs in a stable order: page, limit, then filters by key.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.page_size.to_string()));
        pairs.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }
}
