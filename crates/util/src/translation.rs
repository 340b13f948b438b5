//! Built-in UI phrases with host overrides.

use indexmap::IndexMap;

/// Default text for a phrase key, if the key is built in.
pub fn default_phrase(key: &str) -> Option<&'static str> {
    let phrase = match key {
        "choose" => "Choose",
        "result" => "Result",
        "results" => "Results",
        "previous" => "Previous",
        "page" => "Page",
        "pages" => "Pages",
        "next" => "Next",
        "loading" => "Loading",
        "no_results" => "Sorry, no results",
        "create_new" => "Create New",
        "search" => "Search",
        _ => return None,
    };
    Some(phrase)
}

/// Text for `key`: the host override when present, else the built-in
/// phrase, else the key itself.
pub fn tr(overrides: &IndexMap<String, String>, key: &str) -> String {
    if let Some(text) = overrides.get(key) {
        return text.clone();
    }
    default_phrase(key).unwrap_or(key).to_string()
}

/// Chooses `singular` when `count == 1`, else `plural`, then translates it.
pub fn pluralize(overrides: &IndexMap<String, String>, singular: &str, plural: &str, count: u64) -> String {
    let key = if count == 1 { singular } else { plural };
    tr(overrides, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let mut overrides = IndexMap::new();
        overrides.insert("next".to_string(), "Suivant".to_string());
        assert_eq!(tr(&overrides, "next"), "Suivant");
        assert_eq!(tr(&overrides, "previous"), "Previous");
        assert_eq!(tr(&overrides, "unknown_key"), "unknown_key");
    }

    #[test]
    fn plural_form_is_chosen_before_override_lookup() {
        let mut overrides = IndexMap::new();
        overrides.insert("results".to_string(), "Résultats".to_string());
        assert_eq!(pluralize(&overrides, "result", "results", 1), "Result");
        assert_eq!(pluralize(&overrides, "result", "results", 0), "Résultats");
        assert_eq!(pluralize(&overrides, "result", "results", 12), "Résultats");
    }
}
