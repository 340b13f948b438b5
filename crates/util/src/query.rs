//! Query-string construction for list requests.
//!
//! Filters are appended to every request URL as separately encoded
//! `field=value` pairs. Both halves are percent-encoded so values containing
//! `&`, `=`, spaces or non-ASCII text cannot corrupt the query string.

use chooser_types::Filter;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::form_urlencoded;

/// Everything except RFC 3986 unreserved bytes is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes a single query key or value.
pub fn encode_query_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// Appends `name=value` to the query of `url`, choosing `?` or `&` as
/// separator. A `#fragment` stays at the end.
///
/// An empty `url` yields a fragment starting with `&`, suitable for
/// concatenation onto a URL that already carries a query.
pub fn append_query_param(url: &str, name: &str, value: &str) -> String {
    let (base, fragment) = split_fragment(url);
    let mut out = String::with_capacity(url.len() + name.len() + value.len() + 2);
    out.push_str(base);
    out.push(separator_for(base));
    out.push_str(&encode_query_component(name));
    out.push('=');
    out.push_str(&encode_query_component(value));
    out.push_str(fragment);
    out
}

/// Applies every filter to `url`.
///
/// A filter whose exact pair is already present in the query (server links
/// usually echo the request parameters) is not repeated; the URL still
/// carries every filter.
///
/// # Example
/// ```rust
/// use chooser_types::Filter;
/// use chooser_util::append_filters;
///
/// let url = append_filters("/api/pages/?page_size=10", &[Filter::new("site", "a&b")]);
/// assert_eq!(url, "/api/pages/?page_size=10&site=a%26b");
/// ```
pub fn append_filters(url: &str, filters: &[Filter]) -> String {
    let mut out = url.to_string();
    for filter in filters {
        if has_query_pair(&out, &filter.field, &filter.value) {
            continue;
        }
        out = append_query_param(&out, &filter.field, &filter.value);
    }
    out
}

/// The filter encoder applied to an empty base: a `&`-prefixed fragment
/// handed to the search widget.
pub fn filter_prefix(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(|filter| {
            format!(
                "&{}={}",
                encode_query_component(&filter.field),
                encode_query_component(&filter.value)
            )
        })
        .collect()
}

/// Reads the first value of query parameter `name` from `url`.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = query_of(url)?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn has_query_pair(url: &str, name: &str, value: &str) -> bool {
    let Some(query) = query_of(url) else {
        return false;
    };
    form_urlencoded::parse(query.as_bytes()).any(|(key, found)| key == name && found == value)
}

/// The query string of `url`, without the `?` and any fragment.
fn query_of(url: &str) -> Option<&str> {
    let (base, _) = split_fragment(url);
    base.split_once('?').map(|(_, query)| query)
}

/// Splits `url` into everything before `#` and the fragment including `#`.
fn split_fragment(url: &str) -> (&str, &str) {
    match url.find('#') {
        Some(index) => url.split_at(index),
        None => (url, ""),
    }
}

fn separator_for(url: &str) -> char {
    if url.is_empty() || url.contains('?') { '&' } else { '?' }
}
