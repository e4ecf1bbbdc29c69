//! Pulling generated text out of untyped provider JSON.
//!
//! Providers answer in a handful of shapes. Each [`ShapeMatcher`] recognises
//! one of them; [`extract_text`] tries an ordered slice and the first
//! non-empty match wins.

use serde_json::Value;

/// Recognises one response shape and returns its text, if present.
pub type ShapeMatcher = fn(&Value) -> Option<String>;

/// Characters kept from a raw JSON dump used as last-resort text.
pub const RAW_DUMP_CHARS: usize = 1000;

/// Vision endpoints: `{generated_text}`, then `[{generated_text}]`, then the raw body.
pub const VISION_SHAPES: &[ShapeMatcher] = &[generated_text_field, first_generated_text, raw_dump];

/// Plain text-generation endpoints: `[{generated_text}]` first.
pub const TEXT_SHAPES: &[ShapeMatcher] = &[first_generated_text, generated_text_field, raw_dump];

/// Chat-completion endpoints: `choices[0].message.content` only.
pub const CHAT_SHAPES: &[ShapeMatcher] = &[chat_choice_content];

pub fn extract_text(body: &Value, shapes: &[ShapeMatcher]) -> Option<String> {
    shapes
        .iter()
        .filter_map(|matcher| matcher(body))
        .find(|text| !text.trim().is_empty())
}

/// `{"generated_text": "..."}`
pub fn generated_text_field(body: &Value) -> Option<String> {
    body.get("generated_text")?.as_str().map(str::to_owned)
}

/// `[{"generated_text": "..."}, ...]`
pub fn first_generated_text(body: &Value) -> Option<String> {
    body.as_array()?
        .first()?
        .get("generated_text")?
        .as_str()
        .map(str::to_owned)
}

/// `{"choices": [{"message": {"content": "..."}}]}`
pub fn chat_choice_content(body: &Value) -> Option<String> {
    body.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_owned)
}

/// Compact JSON of the whole body, truncated to [`RAW_DUMP_CHARS`] characters.
pub fn raw_dump(body: &Value) -> Option<String> {
    if body.is_null() {
        return None;
    }
    Some(body.to_string().chars().take(RAW_DUMP_CHARS).collect())
}
