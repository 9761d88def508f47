//! Model-name to table-name inference.
//!
//! A model's physical table name is its logical name pluralized, unless the
//! model carries an explicit table name or freezes its own name. Resolution
//! is a pure function of its inputs; no store access happens here.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Irregular plural forms, keyed by lowercase singular. Each plural also
/// maps to itself so pluralizing an already-plural irregular word is a
/// no-op.
static IRREGULAR_PLURALS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let pairs: &[(&str, &str)] = &[
        ("person", "people"),
        ("man", "men"),
        ("woman", "women"),
        ("child", "children"),
        ("mouse", "mice"),
        ("tooth", "teeth"),
        ("foot", "feet"),
        ("goose", "geese"),
        ("ox", "oxen"),
        // Invariant forms.
        ("sheep", "sheep"),
        ("deer", "deer"),
        ("fish", "fish"),
        ("moose", "moose"),
        ("series", "series"),
        ("species", "species"),
    ];
    let mut map = HashMap::new();
    for &(singular, plural) in pairs {
        map.insert(singular, plural);
        map.insert(plural, plural);
    }
    map
});

/// Resolves a model's physical table name.
///
/// An explicit table name wins unchanged; a frozen model keeps its logical
/// name unchanged; otherwise the name is pluralized via [`pluralize`].
#[must_use]
pub fn resolve_table_name(model_name: &str, explicit: Option<&str>, freeze: bool) -> String {
    if let Some(table) = explicit {
        return table.to_string();
    }
    if freeze {
        return model_name.to_string();
    }
    pluralize(model_name)
}

/// Pluralizes an English word, preserving leading capitalization.
///
/// Irregular forms come from a lookup table that includes its own plural
/// forms, so `pluralize(pluralize(w))` is stable for any irregular `w`.
/// Unknown words fall through to the regular suffix rules, which is an
/// acceptable outcome, never a failure.
#[must_use]
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    if let Some(plural) = IRREGULAR_PLURALS.get(lower.as_str()) {
        return match_capitalization(word, plural);
    }

    // Regular rules: consonant + "y" -> "ies"; sibilant endings -> "es";
    // everything else -> "s".
    if let Some(stem) = word.strip_suffix('y') {
        if stem
            .chars()
            .last()
            .is_some_and(|c| !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Capitalizes `result`'s first letter when `original` starts uppercase.
fn match_capitalization(original: &str, result: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return result.to_string();
    }
    let mut chars = result.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
