//! Placeholder substitution engine.
//!
//! Replaces `${key}` tokens in template text with values from a data row.
//! Keys that have no value in the row are left verbatim, so a later pass
//! (or the reader) can still see which placeholders went unresolved.

use regex::Regex;
use std::collections::HashMap;

lazy_static::lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex");
}

/// Substitute every `${key}` occurrence in `text` with the matching value
/// from `data`. Unknown keys are kept as-is.
pub fn substitute(text: &str, data: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures| match data.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
