//! Page arithmetic and next/previous URL resolution.
//!
//! Server-supplied `next` / `previous` links always win. When an endpoint
//! omits them the URL is synthesized from the default URL and the current
//! page number, so pagination still works against sparse list APIs.

use chooser_types::{Item, ListResponse, PageResult, PickerConfiguration};
use serde_json::Value;
use tracing::debug;

use crate::query::{append_query_param, encode_query_component, query_param};

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";
/// Query parameter carrying the search text.
pub const SEARCH_PARAM: &str = "search";

/// Direction of a pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// `endpoint/?page_size_param=page_size`, the first page of the collection.
///
/// A trailing `/` on the endpoint is not doubled.
///
/// # Example
/// ```rust
/// use chooser_types::{DisplayField, PickerConfiguration};
/// use chooser_util::default_url;
///
/// let config = PickerConfiguration::new("/api/widgets", "Widget", vec![DisplayField::new("title", "Title")]);
/// assert_eq!(default_url(&config), "/api/widgets/?page_size=10");
/// ```
pub fn default_url(config: &PickerConfiguration) -> String {
    let endpoint = config.endpoint.trim_end_matches('/');
    format!(
        "{endpoint}/?{}={}",
        encode_query_component(&config.page_size_param),
        config.page_size
    )
}

/// `<default url>&search=<query><filter prefix>`, the search widget's request.
///
/// `filter_prefix` is the output of [`crate::filter_prefix`].
pub fn search_url(default_url: &str, filter_prefix: &str, query: &str) -> String {
    let url = append_query_param(default_url, SEARCH_PARAM, query);
    format!("{url}{filter_prefix}")
}

/// Server page count when present, otherwise `ceil(count / page_size)`.
pub fn derive_num_pages(num_pages: Option<u64>, count: u64, page_size: u32) -> u64 {
    match num_pages {
        Some(pages) => pages,
        None => count.div_ceil(u64::from(page_size.max(1))),
    }
}

/// Converts a decoded list body into a [`PageResult`].
///
/// Result entries that are not JSON objects are dropped. When the body does
/// not state its page number, the `page` parameter of `request_url` is used,
/// falling back to the first page.
pub fn page_from_response(response: ListResponse, page_size: u32, request_url: &str) -> PageResult {
    let num_pages = derive_num_pages(response.num_pages, response.count, page_size);
    let current_page = response.page.or_else(|| page_number_in_url(request_url)).unwrap_or(1);

    let total = response.results.len();
    let items: Vec<Item> = response
        .results
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(item) => Some(item),
            _ => None,
        })
        .collect();
    if items.len() != total {
        debug!(dropped = total - items.len(), url = %request_url, "ignored non-object list entries");
    }

    PageResult {
        count: response.count,
        num_pages,
        current_page,
        next: response.next.filter(|link| !link.is_empty()),
        previous: response.previous.filter(|link| !link.is_empty()),
        items,
    }
}

/// Resolves the URL for moving one page in `direction`.
///
/// Returns `None` when no server link exists and the synthesized page would
/// fall before the first page.
pub fn resolve_page_url(config: &PickerConfiguration, page: &PageResult, direction: PageDirection) -> Option<String> {
    let link = match direction {
        PageDirection::Previous => page.previous.as_ref(),
        PageDirection::Next => page.next.as_ref(),
    };
    if let Some(link) = link {
        return Some(link.clone());
    }

    let target = match direction {
        PageDirection::Previous if page.current_page <= 1 => return None,
        PageDirection::Previous => page.current_page - 1,
        PageDirection::Next => page.current_page + 1,
    };
    Some(append_query_param(&default_url(config), PAGE_PARAM, &target.to_string()))
}

fn page_number_in_url(url: &str) -> Option<u64> {
    query_param(url, PAGE_PARAM)?.parse().ok()
}
