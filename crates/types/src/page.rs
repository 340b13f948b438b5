//! Wire and in-memory shapes of one page of list results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One remote record, keyed by field name.
pub type Item = Map<String, Value>;

/// Body returned by a paginated list endpoint.
///
/// Every field is optional on the wire; missing values decode to their
/// empty form so a sparse or partially broken payload still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub num_pages: Option<u64>,
    #[serde(default)]
    pub results: Vec<Value>,
}

/// A fetched batch of items plus its pagination metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// Total number of matching records across all pages
    pub count: u64,
    pub num_pages: u64,
    /// 1-based page number; 0 when nothing has been loaded
    pub current_page: u64,
    /// Server-supplied link to the following page
    pub next: Option<String>,
    /// Server-supplied link to the preceding page
    pub previous: Option<String>,
    pub items: Vec<Item>,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
