use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chooser_types::PickerConfiguration;
use clap::Parser;
use serde_json::{Map, Value, json};

/// Browse a remote list endpoint and print the chosen record as JSON.
#[derive(Parser, Debug)]
#[command(name = "chooser", version, about)]
pub struct Args {
    /// Picker configuration file (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List endpoint, absolute or relative to the base URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Name of the record type shown in the heading
    #[arg(long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Table column as `name` or `name:Label`; repeatable
    #[arg(long = "field", value_name = "NAME[:LABEL]")]
    pub fields: Vec<String>,

    /// Constraint appended to every request as `field=value`; repeatable
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Field identifying a record
    #[arg(long = "pk", value_name = "NAME")]
    pub pk_name: Option<String>,

    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    #[arg(long, value_name = "NAME")]
    pub page_size_param: Option<String>,

    /// Page opened in the browser by Ctrl+N
    #[arg(long = "create-url", value_name = "URL")]
    pub create_endpoint: Option<String>,

    /// Origin for relative endpoints (falls back to CHOOSER_API_BASE)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Primary key of the currently chosen record
    #[arg(long, value_name = "PK")]
    pub value: Option<String>,

    /// Fail when the dialog closes without a selection
    #[arg(long)]
    pub required: bool,
}

impl Args {
    /// Layers the flags over a raw configuration document and builds the
    /// validated configuration.
    pub fn into_configuration(self, base: Value) -> Result<PickerConfiguration> {
        let mut document = match base {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => bail!("picker configuration must be a mapping"),
        };
        self.apply_overrides(&mut document)?;

        let config: PickerConfiguration =
            serde_json::from_value(Value::Object(document)).context("invalid picker configuration")?;
        config.validate().context("invalid picker configuration")?;
        Ok(config)
    }

    fn apply_overrides(self, document: &mut Map<String, Value>) -> Result<()> {
        let mut set = |key: &str, value: Value| {
            document.insert(key.to_string(), value);
        };

        if let Some(endpoint) = self.endpoint {
            set("endpoint", Value::String(endpoint));
        }
        if let Some(label) = self.label {
            set("label", Value::String(label));
        }
        if !self.fields.is_empty() {
            let columns = self.fields.iter().map(|raw| parse_field(raw)).collect::<Result<Vec<_>>>()?;
            set("list_display", Value::Array(columns));
        }
        if !self.filters.is_empty() {
            let filters = self.filters.iter().map(|raw| parse_filter(raw)).collect::<Result<Vec<_>>>()?;
            set("filters", Value::Array(filters));
        }
        if let Some(pk_name) = self.pk_name {
            set("pk_name", Value::String(pk_name));
        }
        if let Some(page_size) = self.page_size {
            set("page_size", json!(page_size));
        }
        if let Some(param) = self.page_size_param {
            set("page_size_param", Value::String(param));
        }
        if let Some(create) = self.create_endpoint {
            set("create_endpoint", Value::String(create));
        }
        if let Some(base_url) = self.base_url {
            set("base_url", Value::String(base_url));
        }
        if let Some(value) = self.value {
            set("value", parse_pk(&value));
        }
        if self.required {
            set("required", Value::Bool(true));
        }
        Ok(())
    }
}

/// `name` or `name:Label`; a bare name is its own label.
fn parse_field(raw: &str) -> Result<Value> {
    let (name, label) = match raw.split_once(':') {
        Some((name, label)) => (name.trim(), label.trim()),
        None => (raw.trim(), raw.trim()),
    };
    if name.is_empty() {
        bail!("--field `{raw}` has no field name");
    }
    let label = if label.is_empty() { name } else { label };
    Ok(json!({ "name": name, "label": label }))
}

fn parse_filter(raw: &str) -> Result<Value> {
    let Some((field, value)) = raw.split_once('=') else {
        bail!("--filter `{raw}` must look like field=value");
    };
    let field = field.trim();
    if field.is_empty() {
        bail!("--filter `{raw}` has no field name");
    }
    Ok(json!({ "field": field, "value": value }))
}

/// Numeric keys stay numbers so they compare equal to the server's values.
fn parse_pk(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(number @ Value::Number(_)) => number,
        _ => Value::String(raw.to_string()),
    }
}
