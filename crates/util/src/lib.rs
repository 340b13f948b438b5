//! Helpers shared by the chooser engine, API client and terminal host.
//!
//! - [`query`]: filter encoding and query-string construction
//! - [`pagination`]: default URL, page arithmetic and link resolution
//! - [`display`]: value coercion for table cells and selection summaries
//! - [`translation`]: built-in phrases with host overrides
//! - [`http`]: list body decoding and status hints
//! - [`config_file`]: discovery and loading of picker configuration files,
//!   and the diagnostics log location

pub mod config_file;
pub mod display;
pub mod http;
pub mod pagination;
pub mod query;
pub mod redact;
pub mod translation;

pub use config_file::{ConfigLoadError, default_log_path, discover_config_value, load_config_value, open_log_file};
pub use display::{REFERENCE_FIELD, coerce_value, primary_key, summarize, truncate_to_width};
pub use pagination::{PageDirection, default_url, derive_num_pages, page_from_response, resolve_page_url, search_url};
pub use query::{append_filters, append_query_param, encode_query_component, filter_prefix, query_param};
pub use redact::redact_sensitive;
pub use translation::{pluralize, tr};
