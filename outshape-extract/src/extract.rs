//! Extraction entry points: locate a JSON span and decode it.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::scanner::find_json_span;

/// A successfully recovered value paired with the exact substring that
/// produced it.
///
/// Keeping `raw_json` lets callers log, replay, or re-validate precisely
/// what the model emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult<T> {
    /// The decoded value.
    pub value: T,
    /// The exact JSON substring the value was decoded from.
    pub raw_json: String,
}

impl<T> ExtractionResult<T> {
    /// Pair a decoded value with its source substring.
    #[must_use]
    pub fn new(value: T, raw_json: impl Into<String>) -> Self {
        Self {
            value,
            raw_json: raw_json.into(),
        }
    }

    /// Consume the result, keeping only the decoded value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Recover a JSON value embedded in noisy text using a caller-supplied
/// decoder.
///
/// Exactly one attempt is made, against the right-most complete top-level
/// span: models prepend prose far more often than they append it, and
/// when several blocks are echoed the final one is authoritative. Earlier
/// spans are never retried.
///
/// "The model produced no valid structured output" is an expected,
/// common outcome, so every failure mode collapses to `None`: no span,
/// unbalanceable brackets, or a span the decoder rejects.
pub fn extract_and_parse_with<T, E, F>(text: &str, decode: F) -> Option<ExtractionResult<T>>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    let span = find_json_span(text)?;
    let candidate = &text[span];
    match decode(candidate) {
        Ok(value) => Some(ExtractionResult::new(value, candidate)),
        Err(err) => {
            tracing::debug!(error = %err, candidate, "extracted span failed to decode");
            None
        }
    }
}

/// Recover a typed value from noisy text via `serde_json`.
///
/// # Example
///
/// ```rust
/// use outshape_extract::extract_and_parse;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let text = r#"Here you go: {"name":"Tom","age":18} hope that helps!"#;
/// let result = extract_and_parse::<Person>(text).unwrap();
/// assert_eq!(result.value.name, "Tom");
/// assert_eq!(result.raw_json, r#"{"name":"Tom","age":18}"#);
/// ```
#[must_use]
pub fn extract_and_parse<T: DeserializeOwned>(text: &str) -> Option<ExtractionResult<T>> {
    extract_and_parse_with(text, |raw| serde_json::from_str::<T>(raw))
}

/// Recover an untyped [`serde_json::Value`] from noisy text.
#[must_use]
pub fn extract_json_value(text: &str) -> Option<ExtractionResult<JsonValue>> {
    extract_and_parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
        age: u32,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn test_extraction_identity() {
        let text = r#"{"name":"Tom","age":18}"#;
        let result = extract_and_parse::<Person>(text).unwrap();
        assert_eq!(result.value.name, "Tom");
        assert_eq!(result.value.age, 18);
        assert_eq!(result.raw_json, text);
    }

    #[test]
    fn test_noise_tolerance() {
        let text = r#"prefix {"name":"Jerry","age":20} suffix"#;
        let result = extract_and_parse::<Person>(text).unwrap();
        assert_eq!(result.value.name, "Jerry");
        assert_eq!(result.value.age, 20);
        assert_eq!(result.raw_json, r#"{"name":"Jerry","age":20}"#);
    }

    #[test]
    fn test_rightmost_selection() {
        let text = r#"foo {"name":"A","age":1} bar {"name":"B","age":2}"#;
        let result = extract_and_parse::<Person>(text).unwrap();
        assert_eq!(result.value.name, "B");
        assert_eq!(result.value.age, 2);
    }

    #[test]
    fn test_quote_awareness() {
        let text = r#"{"name":"Tom","age":18,"tags":["a","b","[c]"]}"#;
        let result = extract_and_parse::<Person>(text).unwrap();
        assert_eq!(result.value.tags, ["a", "b", "[c]"]);
        assert_eq!(result.raw_json, text);
    }

    #[test]
    fn test_absence_on_no_match() {
        assert_eq!(extract_and_parse::<Person>("not a json"), None);
    }

    #[test]
    fn test_single_attempt_no_fallback_to_earlier_span() {
        // A valid payload followed by a broken one: the right-most span
        // fails to decode and no earlier candidate is retried.
        let text = r#"{"name":"Tom","age":18} then {"name":}"#;
        assert_eq!(extract_and_parse::<Person>(text), None);
    }

    #[test]
    fn test_markdown_fenced_payload() {
        let text = "Sure:\n```json\n{\"name\":\"Ann\",\"age\":9}\n```\n";
        let result = extract_and_parse::<Person>(text).unwrap();
        assert_eq!(result.value.name, "Ann");
    }

    #[test]
    fn test_top_level_array() {
        let text = r#"The list: [1,2,3] as requested"#;
        let result = extract_and_parse::<Vec<u32>>(text).unwrap();
        assert_eq!(result.value, vec![1, 2, 3]);
        assert_eq!(result.raw_json, "[1,2,3]");
    }

    #[test]
    fn test_custom_decoder() {
        let text = r#"answer: {"name":"Tom","age":18}"#;
        let result = extract_and_parse_with(text, |raw| {
            serde_json::from_str::<Person>(raw).map(|p| p.age)
        })
        .unwrap();
        assert_eq!(result.value, 18);
    }

    #[test]
    fn test_decoder_type_mismatch_is_absence() {
        // Balanced span, valid JSON, wrong shape for the target type.
        let text = r#"{"completely":"different"}"#;
        assert_eq!(extract_and_parse::<Person>(text), None);
    }

    #[test]
    fn test_extract_json_value() {
        let text = r#"blah {"k":[1,2]} blah"#;
        let result = extract_json_value(text).unwrap();
        assert_eq!(result.value["k"][1], 2);
    }

    #[test]
    fn test_into_value() {
        let result = ExtractionResult::new(7u32, "7");
        assert_eq!(result.into_value(), 7);
    }
}
