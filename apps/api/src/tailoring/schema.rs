//! Response Schema Normalizer: raw model output → strict `ResumeRecord`.
//!
//! The prompt asks for abbreviated keys to save output tokens; stored and
//! differently-prompted output still uses the long names. Every field is looked
//! up short-key first, then long-key, then defaulted. Only a missing JSON
//! object boundary or a twice-failed parse is an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::{Bullet, Education, Experience, ResumeRecord};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```[a-z0-9_+-]*[ \t]*\r?\n?").expect("valid regex"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```\s*$").expect("valid regex"));
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([\]}])").expect("valid regex"));

// ────────────────────────────────────────────────────────────────────────────
// Key table
// ────────────────────────────────────────────────────────────────────────────

/// A field's two accepted spellings. Short is checked first.
#[derive(Debug, Clone, Copy)]
pub struct Key {
    pub short: &'static str,
    pub long: &'static str,
}

const fn key(short: &'static str, long: &'static str) -> Key {
    Key { short, long }
}

pub const EXPERIENCE: Key = key("x", "experience");
pub const SKILLS: Key = key("sk", "skills");
pub const EDUCATION: Key = key("ed", "education");
pub const BULLETS: Key = key("b", "bullets");
pub const BULLET_TEXT: Key = key("t", "text");
pub const BULLET_AUTHENTIC: Key = key("a", "authentic");
pub const BULLET_FLAGGED: Key = key("f", "flagged");

type Setter<T> = fn(&mut T, String);

const PROFILE_FIELDS: &[(Key, Setter<ResumeRecord>)] = &[
    (key("n", "name"), |r, v| r.name = v),
    (key("e", "email"), |r, v| r.email = v),
    (key("p", "phone"), |r, v| r.phone = v),
    (key("l", "location"), |r, v| r.location = v),
    (key("li", "linkedin"), |r, v| r.linkedin = v),
    (key("s", "summary"), |r, v| r.summary = v),
];

const EXPERIENCE_FIELDS: &[(Key, Setter<Experience>)] = &[
    (key("c", "company"), |e, v| e.company = v),
    (key("t", "title"), |e, v| e.title = v),
    (key("d", "dates"), |e, v| e.dates = v),
];

const EDUCATION_FIELDS: &[(Key, Setter<Education>)] = &[
    (key("i", "institution"), |e, v| e.institution = v),
    (key("g", "degree"), |e, v| e.degree = v),
    (key("d", "dates"), |e, v| e.dates = v),
];

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes raw model text into a `ResumeRecord`.
pub fn normalize_response(raw: &str) -> Result<ResumeRecord, SchemaError> {
    let body = extract_object(strip_fences(raw)).ok_or(SchemaError::NoJsonObject)?;
    let value = parse_with_repair(body)?;
    Ok(map_record(&value))
}

/// Trims and removes a leading/trailing fenced code block marker.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let start = LEADING_FENCE.find(text).map(|m| m.end()).unwrap_or(0);
    let text = &text[start..];
    let end = TRAILING_FENCE.find(text).map(|m| m.start()).unwrap_or(text.len());
    text[..end].trim()
}

/// The substring from the first `{` to the last `}` inclusive.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_with_repair(body: &str) -> Result<Value, SchemaError> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!("Strict parse failed ({first}); retrying without trailing commas");
            let repaired = TRAILING_COMMA.replace_all(body, "$1");
            let value = serde_json::from_str(&repaired).map_err(|e| {
                warn!("Model output unparseable after repair: {e}");
                SchemaError::Json(e)
            })?;
            warn!("Model output needed trailing-comma repair");
            Ok(value)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Mapping
// ────────────────────────────────────────────────────────────────────────────

fn lookup<'a>(obj: &'a Map<String, Value>, key: Key) -> Option<&'a Value> {
    obj.get(key.short).or_else(|| obj.get(key.long))
}

/// Strings pass through, numbers are rendered, anything else is "".
fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn array_of<'a>(obj: &'a Map<String, Value>, key: Key) -> &'a [Value] {
    lookup(obj, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn apply_fields<T: Default>(obj: &Map<String, Value>, fields: &[(Key, Setter<T>)]) -> T {
    let mut target = T::default();
    for (key, set) in fields {
        set(&mut target, text_of(lookup(obj, *key)));
    }
    target
}

pub fn map_record(value: &Value) -> ResumeRecord {
    let Some(obj) = value.as_object() else {
        return ResumeRecord::default();
    };

    let mut record: ResumeRecord = apply_fields(obj, PROFILE_FIELDS);
    record.experience = array_of(obj, EXPERIENCE).iter().map(map_experience).collect();
    record.skills = array_of(obj, SKILLS)
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    record.education = array_of(obj, EDUCATION).iter().map(map_education).collect();
    record
}

fn map_experience(value: &Value) -> Experience {
    let Some(obj) = value.as_object() else {
        return Experience::default();
    };
    let mut experience: Experience = apply_fields(obj, EXPERIENCE_FIELDS);
    experience.bullets = array_of(obj, BULLETS).iter().map(map_bullet).collect();
    experience
}

fn map_education(value: &Value) -> Education {
    value
        .as_object()
        .map(|obj| apply_fields(obj, EDUCATION_FIELDS))
        .unwrap_or_default()
}

/// Bare strings are authentic. Objects carry `authentic` directly or its
/// inverse `flagged`; anything else degrades to an empty authentic bullet.
fn map_bullet(value: &Value) -> Bullet {
    match value {
        Value::String(text) => Bullet {
            text: text.clone(),
            authentic: true,
        },
        Value::Object(obj) => {
            let authentic = match lookup(obj, BULLET_AUTHENTIC).and_then(Value::as_bool) {
                Some(authentic) => authentic,
                None => !lookup(obj, BULLET_FLAGGED)
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            };
            Bullet {
                text: text_of(lookup(obj, BULLET_TEXT)),
                authentic,
            }
        }
        _ => Bullet::default(),
    }
}
