//! Turning raw item fields into table cells.

use chooser_types::Item;
use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Field name under which a reference object `{model, ...}` is displayed by
/// its `model` member.
pub const REFERENCE_FIELD: &str = "content_type";

/// Display string for one field value.
///
/// - strings and numbers render as themselves
/// - booleans render as `True` / `False`
/// - a reference object under [`REFERENCE_FIELD`] renders its `model`
/// - anything else (other objects, arrays, null, missing) renders empty
pub fn coerce_value(value: Option<&Value>, field_name: &str) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(Value::Object(reference)) if field_name == REFERENCE_FIELD => match reference.get("model") {
            Some(Value::Object(_)) | Some(Value::Array(_)) | None => String::new(),
            model => coerce_value(model, ""),
        },
        _ => String::new(),
    }
}

/// Identity of `item` under the configured primary-key field.
pub fn primary_key<'a>(item: &'a Item, pk_name: &str) -> Option<&'a Value> {
    item.get(pk_name)
}

/// One-line summary of a chosen item built from its `display` fields.
pub fn summarize(item: &Item, display: &[String]) -> String {
    display
        .iter()
        .map(|field| coerce_value(item.get(field), field))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shortens `text` to at most `width` terminal columns, marking the cut
/// with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_render_as_themselves() {
        assert_eq!(coerce_value(Some(&json!("Blue widget")), "title"), "Blue widget");
        assert_eq!(coerce_value(Some(&json!(42)), "id"), "42");
        assert_eq!(coerce_value(Some(&json!(2.5)), "price"), "2.5");
    }

    #[test]
    fn booleans_render_capitalized() {
        assert_eq!(coerce_value(Some(&json!(true)), "live"), "True");
        assert_eq!(coerce_value(Some(&json!(false)), "live"), "False");
    }

    #[test]
    fn reference_objects_render_their_model() {
        let reference = json!({"model": "X", "id": 1});
        assert_eq!(coerce_value(Some(&reference), REFERENCE_FIELD), "X");
        assert_eq!(coerce_value(Some(&json!({"id": 1})), REFERENCE_FIELD), "");
        assert_eq!(coerce_value(Some(&json!(null)), REFERENCE_FIELD), "");
    }

    #[test]
    fn unrecognized_shapes_render_empty() {
        assert_eq!(coerce_value(Some(&json!({"model": "X"})), "owner"), "");
        assert_eq!(coerce_value(Some(&json!([1, 2])), "tags"), "");
        assert_eq!(coerce_value(Some(&json!(null)), "title"), "");
        assert_eq!(coerce_value(None, "title"), "");
    }

    #[test]
    fn summary_skips_empty_fields() {
        let item = json!({"title": "Blue", "slug": null, "code": 7});
        let item = item.as_object().expect("object");
        let display = vec!["title".to_string(), "slug".to_string(), "code".to_string()];
        assert_eq!(summarize(item, &display), "Blue 7");
    }

    #[test]
    fn truncation_respects_wide_characters() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
