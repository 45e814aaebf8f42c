//! Lenient extraction of a JSON document from raw model text.
//!
//! The model is expected to answer with one JSON object, but often wraps it
//! in prose or code fences, leaves trailing commas, or truncates the tail.
//! Parsing tries a direct decode of the outermost `{..}` slice first and
//! falls back to small, targeted repairs before giving up.

use serde_json::Value;

/// A failed parse. Carries the raw text for retry prompts and fatal records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub raw: String,
    pub diagnostic: String,
    /// Unrecoverable failures (an empty response) skip the retry budget and
    /// go straight to the fatal path.
    pub unrecoverable: bool,
}

/// Extract one JSON object from `raw`.
///
/// # Errors
///
/// Returns a [`ParseFailure`] describing why no object could be recovered;
/// never panics on model output.
pub fn parse_document(raw: &str) -> Result<Value, ParseFailure> {
    let text = strip_fences(raw);
    if text.is_empty() {
        return Err(ParseFailure {
            raw: raw.to_string(),
            diagnostic: "empty response".into(),
            unrecoverable: true,
        });
    }

    let Some(start) = text.find('{') else {
        return Err(failure(raw, "no JSON object found"));
    };

    // Outermost slice first: last closing brace after the first opening one.
    if let Some(end) = text.rfind('}') {
        if end > start {
            let candidate = &text[start..=end];
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                return require_object(value, raw);
            }
            let repaired = strip_trailing_commas(candidate);
            if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                return require_object(value, raw);
            }
        }
    }

    // Truncated output: close whatever was left open.
    let completed = close_open_scopes(&strip_trailing_commas(&text[start..]));
    if let Ok(value) = serde_json::from_str::<Value>(&completed) {
        return require_object(value, raw);
    }

    Err(failure(raw, "unparsable JSON object"))
}

fn failure(raw: &str, diagnostic: &str) -> ParseFailure {
    ParseFailure {
        raw: raw.to_string(),
        diagnostic: diagnostic.into(),
        unrecoverable: false,
    }
}

fn require_object(value: Value, raw: &str) -> Result<Value, ParseFailure> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(failure(raw, "top-level JSON value is not an object"))
    }
}

/// Remove ```json / ``` fences and surrounding whitespace.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Drop commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '}' | ']' => {
                while out.ends_with(|c: char| c.is_whitespace()) {
                    out.pop();
                }
                if out.ends_with(',') {
                    out.pop();
                }
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Append the closing braces/brackets a truncated object is missing. An
/// unterminated string is closed first.
fn close_open_scopes(text: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&ch) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = text.trim_end().trim_end_matches(',').to_string();
    if in_string {
        out.push('"');
    }
    while let Some(close) = stack.pop() {
        out.push(close);
    }
    out
}
