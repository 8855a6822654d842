//! Quote-aware balanced-bracket scanning.
//!
//! Model completions usually wrap a JSON payload in prose; occasionally
//! several blocks are echoed and the final one is authoritative. The
//! scanner therefore locates the right-most complete top-level span:
//! a forward pass finds the last structural `}` or `]`, a backward pass
//! balances brackets of that kind to find the matching opener. Both
//! passes track string literals with escape awareness so brackets inside
//! string values (a tag literally named `"[c]"`, code snippets with
//! braces) are never mistaken for structural delimiters.

use std::ops::Range;

/// String-tracking states of the forward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal.
    Normal,
    /// Inside a string literal.
    InString,
    /// Inside a string literal, immediately after a backslash.
    Escaped,
}

/// Locate the right-most complete top-level JSON span in `text`.
///
/// Returns the byte range of the candidate span (including its
/// delimiters), or `None` when no balanceable object or array span
/// exists. The returned range always lies on character boundaries.
///
/// # Example
///
/// ```rust
/// use outshape_extract::find_json_span;
///
/// let text = r#"Sure, here you go: {"ok": true}"#;
/// let span = find_json_span(text).unwrap();
/// assert_eq!(&text[span], r#"{"ok": true}"#);
/// ```
#[must_use]
pub fn find_json_span(text: &str) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let (end, close) = rightmost_close(bytes)?;
    let open = match close {
        b'}' => b'{',
        _ => b'[',
    };
    let start = matching_open(bytes, end, open, close)?;
    Some(start..end + 1)
}

/// Forward pass: the position and kind of the last `}`/`]` that sits
/// outside any string literal.
fn rightmost_close(bytes: &[u8]) -> Option<(usize, u8)> {
    let mut state = ScanState::Normal;
    let mut last: Option<(usize, u8)> = None;

    for (i, &b) in bytes.iter().enumerate() {
        state = match state {
            ScanState::Normal => match b {
                b'"' => ScanState::InString,
                b'}' | b']' => {
                    last = Some((i, b));
                    ScanState::Normal
                }
                _ => ScanState::Normal,
            },
            ScanState::InString => match b {
                b'\\' => ScanState::Escaped,
                b'"' => ScanState::Normal,
                _ => ScanState::InString,
            },
            ScanState::Escaped => ScanState::InString,
        };
    }

    last
}

/// Backward pass: starting at the closing delimiter at `end`, balance
/// brackets of the same kind back to the span's opener.
///
/// Quote tracking is run in reverse: a `"` toggles the in-string flag
/// unless escaped, where escapedness is the parity of the run of
/// backslashes immediately before it. Brackets of the other kind and
/// brackets inside strings are ignored.
fn matching_open(bytes: &[u8], end: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;

    for i in (0..=end).rev() {
        let b = bytes[i];
        if b == b'"' && !is_escaped(bytes, i) {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        if b == close {
            depth += 1;
        } else if b == open {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    tracing::trace!(end, "no matching opener for candidate span");
    None
}

/// Whether the byte at `i` is preceded by an odd run of backslashes.
fn is_escaped(bytes: &[u8], i: usize) -> bool {
    let mut backslashes = 0;
    let mut j = i;
    while j > 0 && bytes[j - 1] == b'\\' {
        backslashes += 1;
        j -= 1;
    }
    backslashes % 2 == 1
}
