//! Turns the vision service's reply text into an [`AnnotationRecord`].
//!
//! The service is told to answer with bare JSON, but replies sometimes arrive
//! wrapped in prose or Markdown code fences. Replies are classified into one
//! of three shapes before anything is parsed:
//!
//! - a fence opened with a `json` tag: the content up to the next fence
//! - any other fence: the content between the first pair of fences
//! - no fence at all: the whole text
//!
//! A fence that is opened but never closed is a [`ParseError`].

use serde_json::Value;

use crate::annotation::record::AnnotationRecord;
use crate::error::ParseError;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// How strictly the parsed object is checked against the annotation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaMode {
    /// Any JSON object is accepted.
    #[default]
    Lenient,
    /// The object must deserialize into the typed annotation.
    Strict,
}

/// Where the JSON payload sits inside a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape<'a> {
    Bare(&'a str),
    FencedTagged(&'a str),
    FencedUntagged(&'a str),
}

impl<'a> ReplyShape<'a> {
    pub fn classify(text: &'a str) -> Result<Self, ParseError> {
        if let Some(start) = text.find(JSON_FENCE) {
            let body = &text[start + JSON_FENCE.len()..];
            return closing_fence(body, text).map(Self::FencedTagged);
        }

        if let Some(start) = text.find(FENCE) {
            let body = &text[start + FENCE.len()..];
            return closing_fence(body, text)
                .map(strip_info_string)
                .map(Self::FencedUntagged);
        }

        Ok(Self::Bare(text))
    }

    pub fn payload(&self) -> &'a str {
        match self {
            Self::Bare(s) | Self::FencedTagged(s) | Self::FencedUntagged(s) => s.trim(),
        }
    }
}

fn closing_fence<'a>(body: &'a str, raw: &str) -> Result<&'a str, ParseError> {
    body.find(FENCE)
        .map(|end| &body[..end])
        .ok_or_else(|| ParseError::UnterminatedFence {
            raw: raw.to_string(),
        })
}

/// Drops a language tag such as `JSON` or `javascript` left on the fence line.
fn strip_info_string(body: &str) -> &str {
    match body.split_once('\n') {
        Some((first, rest))
            if !first.trim().is_empty()
                && first.trim().chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            rest
        }
        _ => body,
    }
}

/// Extracts and parses the structured record from raw reply text.
pub fn normalize(raw: &str, mode: SchemaMode) -> Result<AnnotationRecord, ParseError> {
    let payload = ReplyShape::classify(raw)?.payload();

    let value: Value = serde_json::from_str(payload).map_err(|e| ParseError::InvalidJson {
        raw: raw.to_string(),
        source: e,
    })?;

    let record = match value {
        Value::Object(map) if map.is_empty() => {
            return Err(ParseError::Empty {
                raw: raw.to_string(),
            })
        }
        Value::Object(map) => AnnotationRecord::new(map),
        _ => {
            return Err(ParseError::NotAnObject {
                raw: raw.to_string(),
            })
        }
    };

    if mode == SchemaMode::Strict {
        record.to_annotation().map_err(|e| ParseError::Schema {
            raw: raw.to_string(),
            source: e,
        })?;
    }

    Ok(record)
}
