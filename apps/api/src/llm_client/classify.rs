//! Error Classifier: raw generation failure signal → closed `ErrorCode` taxonomy.
//!
//! This is the only place that pattern-matches on provider error text.
//! Rules are evaluated top to bottom and the first match wins; quota rules
//! come first because quota bodies embed unrelated status-like numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fallback countdown when a rate-limit signal carries no delay.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const EXCERPT_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    DailyLimit,
    RateLimit,
    InvalidKey,
    Permission,
    ServerError,
    Unknown,
    /// Local precondition: no API key saved.
    NoKey,
    /// Local precondition: no base resume saved.
    NoResume,
}

/// What the client may offer the user after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry is pointless until the quota cycle resets.
    Disabled,
    Countdown(u64),
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub code: ErrorCode,
    pub message: String,
    pub retry_after: Option<u64>,
}

impl ClassifiedError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn no_key() -> Self {
        Self::new(ErrorCode::NoKey, "Add your API key in settings to generate a resume.")
    }

    pub fn no_resume() -> Self {
        Self::new(ErrorCode::NoResume, "Upload your base resume before tailoring.")
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        match self.code {
            ErrorCode::DailyLimit => RetryPolicy::Disabled,
            ErrorCode::RateLimit => {
                RetryPolicy::Countdown(self.retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS))
            }
            _ => RetryPolicy::Immediate,
        }
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

/// Pre-lowercased view of a raw signal shared by every rule.
struct Signal<'a> {
    raw: &'a str,
    lower: String,
}

impl Signal<'_> {
    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.lower.contains(n))
    }
}

type Rule = (fn(&Signal) -> bool, fn(&Signal) -> ClassifiedError);

const QUOTA_MARKERS: &[&str] = &["429", "resource_exhausted", "quota"];
const DAY_MARKERS: &[&str] = &["perday", "per_day", "per day", "daily"];
const INVALID_KEY_MARKERS: &[&str] = &[
    "401",
    "api_key_invalid",
    "api key not valid",
    "invalid api key",
    "unauthenticated",
];
const PERMISSION_MARKERS: &[&str] = &["403", "permission_denied", "permission denied"];
const SERVER_MARKERS: &[&str] = &["500", "503", "internal error", "\"internal\"", "unavailable"];

const RULES: &[Rule] = &[
    (
        |s| s.has_any(QUOTA_MARKERS) && s.has_any(DAY_MARKERS),
        |_| ClassifiedError::new(
            ErrorCode::DailyLimit,
            "Daily request limit reached. Try again tomorrow.",
        ),
    ),
    (
        |s| s.has_any(QUOTA_MARKERS),
        |s| {
            let secs = extract_retry_delay(s.raw).unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            ClassifiedError {
                code: ErrorCode::RateLimit,
                message: format!("Too many requests. Retry in {secs}s."),
                retry_after: Some(secs),
            }
        },
    ),
    (
        |s| s.has_any(INVALID_KEY_MARKERS),
        |_| ClassifiedError::new(
            ErrorCode::InvalidKey,
            "Your API key was rejected. Check it in settings.",
        ),
    ),
    (
        |s| s.has_any(PERMISSION_MARKERS),
        |_| ClassifiedError::new(
            ErrorCode::Permission,
            "Your API key lacks permission for this model.",
        ),
    ),
    (
        |s| s.has_any(SERVER_MARKERS),
        |_| ClassifiedError::new(
            ErrorCode::ServerError,
            "The generation service had an internal error. Please retry.",
        ),
    ),
];

/// Maps a raw failure signal to a `ClassifiedError`. Total: never fails.
pub fn classify(raw: &str) -> ClassifiedError {
    let signal = Signal {
        raw,
        lower: raw.to_lowercase(),
    };

    RULES
        .iter()
        .find(|(matches, _)| matches(&signal))
        .map(|(_, build)| build(&signal))
        .unwrap_or_else(|| {
            ClassifiedError::new(
                ErrorCode::Unknown,
                format!("Unexpected error: {}", excerpt(raw)),
            )
        })
}

static STRUCTURED_DELAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""?retryDelay"?\s*:\s*"?(\d+(?:\.\d+)?)s"#).expect("valid regex")
});
static PHRASE_DELAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)retry\D{0,30}?(\d+(?:\.\d+)?)\s*s\b").expect("valid regex"));

/// Retry delay in whole seconds (rounded up), structured field first.
fn extract_retry_delay(raw: &str) -> Option<u64> {
    [&*STRUCTURED_DELAY, &*PHRASE_DELAY]
        .into_iter()
        .find_map(|re| re.captures(raw))
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .map(|secs| secs.ceil() as u64)
}

fn excerpt(raw: &str) -> String {
    raw.trim().chars().take(EXCERPT_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_with_structured_delay() {
        let err = classify("429 RESOURCE_EXHAUSTED ... retryDelay: 30s");
        assert_eq!(err.code, ErrorCode::RateLimit);
        assert_eq!(err.retry_after, Some(30));
        assert_eq!(err.retry_policy(), RetryPolicy::Countdown(30));
    }

    #[test]
    fn test_rate_limit_with_quoted_json_delay() {
        let body = concat!(
            r#"429 {"error":{"code":429,"status":"RESOURCE_EXHAUSTED","details":"#,
            r#"[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"17s"}]}}"#,
        );
        let err = classify(body);
        assert_eq!(err.code, ErrorCode::RateLimit);
        assert_eq!(err.retry_after, Some(17));
    }

    #[test]
    fn test_rate_limit_with_phrase_delay_rounds_up() {
        let err = classify("Quota exceeded. Please retry in 12.4s.");
        assert_eq!(err.code, ErrorCode::RateLimit);
        assert_eq!(err.retry_after, Some(13));
    }

    #[test]
    fn test_rate_limit_defaults_to_sixty_seconds() {
        let err = classify("429 Too Many Requests");
        assert_eq!(err.code, ErrorCode::RateLimit);
        assert_eq!(err.retry_after, Some(DEFAULT_RETRY_AFTER_SECS));
    }

    #[test]
    fn test_daily_limit_has_no_retry() {
        let err = classify(concat!(
            "429 RESOURCE_EXHAUSTED ",
            "quotaId: GenerateRequestsPerDayPerProjectPerModel retryDelay: 30s",
        ));
        assert_eq!(err.code, ErrorCode::DailyLimit);
        assert_eq!(err.retry_after, None);
        assert_eq!(err.retry_policy(), RetryPolicy::Disabled);
    }

    #[test]
    fn test_quota_precedes_embedded_status_codes() {
        // 500 and 403 appear in the body but the quota marker wins
        let err = classify("429 quota exceeded for project 500403");
        assert_eq!(err.code, ErrorCode::RateLimit);
    }

    #[test]
    fn test_invalid_key() {
        let err = classify("400 API key not valid. Please pass a valid API key.");
        assert_eq!(err.code, ErrorCode::InvalidKey);
        assert_eq!(classify("401 Unauthorized").code, ErrorCode::InvalidKey);
    }

    #[test]
    fn test_permission() {
        let err = classify("403 PERMISSION_DENIED");
        assert_eq!(err.code, ErrorCode::Permission);
        assert_eq!(err.retry_policy(), RetryPolicy::Immediate);
    }

    #[test]
    fn test_server_error() {
        assert_eq!(classify("500 An internal error has occurred").code, ErrorCode::ServerError);
        let err = classify("503 The model is overloaded. UNAVAILABLE");
        assert_eq!(err.code, ErrorCode::ServerError);
    }

    #[test]
    fn test_unknown_keeps_truncated_excerpt() {
        let raw = "x".repeat(500);
        let err = classify(&raw);
        assert_eq!(err.code, ErrorCode::Unknown);
        assert!(err.message.ends_with(&"x".repeat(EXCERPT_MAX_CHARS)));
        assert!(!err.message.contains(&"x".repeat(EXCERPT_MAX_CHARS + 1)));
    }

    #[test]
    fn test_unknown_excerpt_is_char_boundary_safe() {
        let raw = "é".repeat(200);
        let err = classify(&raw);
        assert_eq!(err.code, ErrorCode::Unknown);
        assert_eq!(err.message.chars().filter(|c| *c == 'é').count(), EXCERPT_MAX_CHARS);
    }

    #[test]
    fn test_empty_signal_is_unknown() {
        assert_eq!(classify("").code, ErrorCode::Unknown);
    }

    #[test]
    fn test_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::DailyLimit).unwrap();
        assert_eq!(json, "\"DAILY_LIMIT\"");
        let json = serde_json::to_string(&ErrorCode::NoResume).unwrap();
        assert_eq!(json, "\"NO_RESUME\"");
    }
}
