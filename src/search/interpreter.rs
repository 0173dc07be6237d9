// src/search/interpreter.rs

use crate::domain::filter::{PropertyType, RawFilter, StructuredFilter};
use crate::search::llm::LanguageModel;
use crate::search::llm_error::LlmError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const FALLBACK_INTERPRETATION: &str = "I couldn't quite understand that search, so here are \
     some of the best rental deals right now. Try a more specific prompt, like \
     \"2 bedroom in Brooklyn under $4,000\".";

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("fenced block pattern")
});

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*```[A-Za-z0-9_-]*").expect("opening fence pattern"));

/// Asks the model to read `query` and returns the filter it produced.
///
/// Only a failed model call is an error. A reply that holds no usable JSON
/// becomes [`fallback_filter`].
pub fn interpret(
    model: &dyn LanguageModel,
    system_prompt: &str,
    query: &str,
) -> Result<StructuredFilter, LlmError> {
    let reply = model.complete(system_prompt, query)?;
    tracing::debug!(%query, reply_len = reply.len(), "model replied");
    Ok(parse_model_reply(&reply))
}

pub fn parse_model_reply(reply: &str) -> StructuredFilter {
    let Some(json) = extract_json_object(reply) else {
        tracing::warn!(reply = %truncate(reply, 200), "no JSON object in model reply");
        return fallback_filter();
    };

    match serde_json::from_str::<RawFilter>(json) {
        Ok(raw) => StructuredFilter::from(raw),
        Err(e) => {
            tracing::warn!(error = %e, json = %truncate(json, 200), "model JSON did not parse");
            fallback_filter()
        }
    }
}

/// Rentals, nothing else narrowed, with the canned "be more specific" text.
pub fn fallback_filter() -> StructuredFilter {
    StructuredFilter {
        property_type: Some(PropertyType::Rent),
        interpretation: FALLBACK_INTERPRETATION.to_string(),
        ..StructuredFilter::default()
    }
}

/// Inside of the first ```-fenced block, or the reply minus a dangling
/// opening fence, or the reply as is.
///
/// A fenced block only counts when it opens before the first `{` and holds
/// a `{` itself; a fence in prose after an unfenced object is ignored.
pub fn strip_code_fences(reply: &str) -> &str {
    let first_brace = reply.find('{');
    if let Some(caps) = FENCED_BLOCK.captures(reply) {
        if let (Some(fence), Some(inner)) = (caps.get(0), caps.get(1)) {
            let opens_first = first_brace.map_or(true, |brace| fence.start() < brace);
            if opens_first && inner.as_str().contains('{') {
                return inner.as_str();
            }
            return reply;
        }
    }
    match OPENING_FENCE.find(reply) {
        Some(fence) => &reply[fence.end()..],
        None => reply,
    }
}

/// The first balanced `{...}` in the reply after fence stripping. Braces
/// inside JSON strings don't count; prose before or after is ignored.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let text = strip_code_fences(reply);
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
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
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
