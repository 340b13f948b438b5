//! Host-supplied picker configuration.
//!
//! A [`PickerConfiguration`] is fixed for the lifetime of one dialog. It can
//! be built in code or deserialized from JSON/YAML; omitted fields fall back
//! to the same defaults the list endpoints were designed around
//! (`uuid` primary keys, pages of 10 selected with `page_size`).

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default name of the field that identifies an item.
pub const DEFAULT_PK_NAME: &str = "uuid";
/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Default query parameter carrying the page size.
pub const DEFAULT_PAGE_SIZE_PARAM: &str = "page_size";
/// Default delay between mount and the first navigation.
pub const DEFAULT_OPEN_DELAY: Duration = Duration::from_millis(650);
/// Default delay between the exit marker and the host callback.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(400);

/// One column of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    /// Key of the item field rendered in this column
    pub name: String,
    /// Column heading
    pub label: String,
}

impl DisplayField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// A field/value constraint appended to every list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Open/close transition delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default = "default_open_delay_ms")]
    pub open_delay_ms: u64,
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

impl Timings {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            open_delay_ms: default_open_delay_ms(),
            close_delay_ms: default_close_delay_ms(),
        }
    }
}

/// Everything the host tells the picker about the collection being browsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfiguration {
    /// List endpoint, absolute or relative to `base_url`
    pub endpoint: String,
    /// Page opened in a separate browser surface to create a new record
    #[serde(default)]
    pub create_endpoint: Option<String>,
    /// Human-readable name of the record type ("Choose {label}")
    pub label: String,
    /// Primary key of the currently chosen record, if any
    #[serde(default)]
    pub value: Option<Value>,
    /// Whether the host requires a record to be chosen
    #[serde(default)]
    pub required: bool,
    /// Fields joined to summarize a chosen record
    #[serde(default = "default_display", deserialize_with = "one_or_many")]
    pub display: Vec<String>,
    /// Table columns, in order
    pub list_display: Vec<DisplayField>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default = "default_pk_name")]
    pub pk_name: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_size_param")]
    pub page_size_param: String,
    /// Overrides for built-in UI strings, keyed by phrase name
    #[serde(default)]
    pub translations: IndexMap<String, String>,
    /// Origin used to resolve relative endpoints and server links
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timings: Timings,
}

impl PickerConfiguration {
    /// Minimal configuration with defaults for everything but the endpoint,
    /// label and columns.
    pub fn new(endpoint: impl Into<String>, label: impl Into<String>, list_display: Vec<DisplayField>) -> Self {
        Self {
            endpoint: endpoint.into(),
            create_endpoint: None,
            label: label.into(),
            value: None,
            required: false,
            display: default_display(),
            list_display,
            filters: Vec::new(),
            pk_name: default_pk_name(),
            page_size: default_page_size(),
            page_size_param: default_page_size_param(),
            translations: IndexMap::new(),
            base_url: None,
            timings: Timings::default(),
        }
    }

    /// Reject configurations the picker cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.page_size_param.trim().is_empty() {
            return Err(ConfigError::EmptyField("page_size_param"));
        }
        if self.pk_name.trim().is_empty() {
            return Err(ConfigError::EmptyField("pk_name"));
        }
        if self.list_display.is_empty() {
            return Err(ConfigError::NoColumns);
        }
        Ok(())
    }
}

/// Reasons a [`PickerConfiguration`] is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("picker endpoint must not be empty")]
    MissingEndpoint,
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("at least one display field is required")]
    NoColumns,
}

fn default_display() -> Vec<String> {
    vec!["title".to_string()]
}

fn default_pk_name() -> String {
    DEFAULT_PK_NAME.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_param() -> String {
    DEFAULT_PAGE_SIZE_PARAM.to_string()
}

fn default_open_delay_ms() -> u64 {
    DEFAULT_OPEN_DELAY.as_millis() as u64
}

fn default_close_delay_ms() -> u64 {
    DEFAULT_CLOSE_DELAY.as_millis() as u64
}

/// Accepts `"title"` as well as `["title", "slug"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(many) => many,
    })
}

/// Filter values are query parameters, so numbers and booleans are kept in
/// their textual form.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("filter value must be a scalar, got {other}"))),
    }
}
