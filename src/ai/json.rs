//! Lenient decoding of JSON answers from a model.
//!
//! Models wrap JSON in markdown fences, leave trailing commas, surround it
//! with prose or get cut off mid-object. Each repair is tried in turn before
//! giving up.

use serde::de::DeserializeOwned;

use crate::error::AiError;

/// Decode a model answer into `T`.
///
/// # Errors
///
/// [`AiError::Parse`] if no repair produces valid JSON of the right shape.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let body = fenced_body(text).unwrap_or(text).trim();
    if let Some(value) = try_repairs(body) {
        return Ok(value);
    }
    if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}'))
        && start < end
        && let Some(value) = try_repairs(&body[start..=end])
    {
        return Ok(value);
    }
    Err(AiError::Parse(format!("no JSON object in {} chars of output", text.len())))
}

fn try_repairs<T: DeserializeOwned>(raw: &str) -> Option<T> {
    if let Ok(v) = serde_json::from_str(raw) {
        return Some(v);
    }
    let fixed = strip_trailing_commas(raw);
    if let Ok(v) = serde_json::from_str(&fixed) {
        return Some(v);
    }
    serde_json::from_str(&close_truncated(&fixed)).ok()
}

/// Contents of the first ```` ``` ```` fence, with an optional `json` tag.
fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(&rest[..end])
}

/// Remove commas that directly precede `}` or `]`, outside strings.
fn strip_trailing_commas(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            in_string = !(c == '"' && !escaped);
            escaped = c == '\\' && !escaped;
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Close a document cut off mid-way: drop a dangling partial entry, then
/// append the brackets still open.
fn close_truncated(raw: &str) -> String {
    let (open, last_clean) = scan(raw);
    if open.is_empty() {
        return raw.to_owned();
    }
    let kept = &raw[..last_clean];
    let (open, _) = scan(kept);
    let mut out = kept.trim_end().trim_end_matches(',').to_owned();
    out.extend(open.iter().rev());
    out
}

/// Closers still pending at the end of `raw`, and the byte offset just past
/// the last complete entry.
fn scan(raw: &str) -> (Vec<char>, usize) {
    let mut open = Vec::new();
    let mut last_clean = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in raw.char_indices() {
        if in_string {
            in_string = !(c == '"' && !escaped);
            escaped = c == '\\' && !escaped;
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                open.pop();
                last_clean = i + 1;
            }
            ',' => last_clean = i,
            _ => {}
        }
    }
    (open, last_clean)
}

#[cfg(test)]
#[path = "json_test.rs"]
mod tests;
