//! # outshape-extract
//!
//! Recovery of JSON payloads embedded in noisy model output.
//!
//! Raw language-model completions routinely wrap a JSON payload in
//! prose, markdown fences, or repeated examples. This crate locates the
//! right-most complete top-level JSON span with a quote-aware
//! balanced-bracket scanner and decodes it into a target type, pairing
//! the value with the exact substring it came from.
//!
//! Absence is data here, not an error: a completion without valid
//! structured output is an expected outcome that callers handle as a
//! retry or fallback signal, so every entry point returns `Option`.
//!
//! ## Example
//!
//! ```rust
//! use outshape_extract::extract_and_parse;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Answer {
//!     city: String,
//! }
//!
//! let completion = r#"The capital is below.
//! {"city":"Paris"}
//! Let me know if you need anything else!"#;
//!
//! let result = extract_and_parse::<Answer>(completion).unwrap();
//! assert_eq!(result.value.city, "Paris");
//! assert_eq!(result.raw_json, r#"{"city":"Paris"}"#);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod extract;
pub mod scanner;

// Re-exports
pub use extract::{extract_and_parse, extract_and_parse_with, extract_json_value, ExtractionResult};
pub use scanner::find_json_span;
