//! Core types shared across Wicket components.

use serde::{Deserialize, Serialize};

/// Question kind, controls how a submitted answer is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Free text; case-insensitive unless `case_sensitive` is set
    Text,
    /// Password field; always exact match
    Password,
    /// Single choice from `options`; always exact match
    Choice,
}

/// A single gate question.
///
/// The reference answer is stored encrypted (`iv:cipher` hex token) so the
/// catalog file never contains plaintext answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique ID within its question set
    pub id: String,

    /// Prompt shown to the reader
    pub prompt: String,

    /// Optional image attached to the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Question kind
    #[serde(rename = "type")]
    pub kind: QuestionType,

    /// Ordered options; required iff `kind` is `choice`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Encrypted reference answer (`iv:cipher` hex token)
    pub encrypted_answer: String,

    /// Compare text answers exactly instead of case-insensitively.
    /// Only meaningful for `text` questions; absent means insensitive.
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Ordered sequence of questions gating one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

/// Client-facing view of a question: everything except the reference
/// answer and the comparison flag.
#[derive(Debug, Clone, Serialize)]
pub struct ClientQuestion {
    pub id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl From<&Question> for ClientQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            prompt: q.prompt.clone(),
            image_url: q.image_url.clone(),
            kind: q.kind,
            options: q.options.clone(),
        }
    }
}

/// One submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: String,
    pub answer: String,
}

/// Validation request body for `POST /validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// Article being unlocked
    pub slug: String,
    /// Question set gating the article
    pub question_set_id: String,
    /// Submitted answers; order is irrelevant
    pub answers: Vec<UserAnswer>,
}

/// Validation outcome returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub message: String,
    /// Present only while the visitor is locked out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_lock_seconds: Option<u64>,
}

impl ValidateResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            remaining_lock_seconds: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            remaining_lock_seconds: None,
        }
    }

    pub fn locked(message: impl Into<String>, remaining_secs: u64) -> Self {
        Self {
            success: false,
            message: message.into(),
            remaining_lock_seconds: Some(remaining_secs),
        }
    }
}

/// Per (visitor, slug) failure record tracked by the rate limiter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Consecutive failed attempts
    pub attempts: u32,

    /// Lock expiry as a Unix millisecond timestamp; set once `attempts`
    /// reaches the threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<i64>,
}

impl RateLimitRecord {
    /// Check whether the record is currently locked
    pub fn is_locked(&self) -> bool {
        match self.locked_until {
            Some(until) => chrono::Utc::now().timestamp_millis() < until,
            None => false,
        }
    }

    /// Remaining lock time as a whole-second countdown (0 when open).
    /// Rounds up, so a lock never reports 0 while still active.
    pub fn remaining_lock_secs(&self) -> u64 {
        match self.locked_until {
            Some(until) => {
                let now = chrono::Utc::now().timestamp_millis();
                if now < until {
                    ((until - now) as u64).div_ceil(1000)
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_open_by_default() {
        let record = RateLimitRecord::default();
        assert!(!record.is_locked());
        assert_eq!(record.remaining_lock_secs(), 0);
    }

    #[test]
    fn test_record_countdown_rounds_up() {
        let now = chrono::Utc::now().timestamp_millis();
        let record = RateLimitRecord {
            attempts: 5,
            locked_until: Some(now + 1500),
        };
        assert!(record.is_locked());
        assert_eq!(record.remaining_lock_secs(), 2);
    }

    #[test]
    fn test_expired_lock_reads_as_open() {
        let now = chrono::Utc::now().timestamp_millis();
        let record = RateLimitRecord {
            attempts: 5,
            locked_until: Some(now - 1),
        };
        assert!(!record.is_locked());
        assert_eq!(record.remaining_lock_secs(), 0);
    }

    #[test]
    fn test_client_question_redacts_answer() {
        let q = Question {
            id: "q1".to_string(),
            prompt: "What color is the sky?".to_string(),
            image_url: None,
            kind: QuestionType::Text,
            options: None,
            encrypted_answer: "aa:bb".to_string(),
            case_sensitive: false,
        };
        let client = ClientQuestion::from(&q);
        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("encrypted_answer").is_none());
        assert!(json.get("case_sensitive").is_none());
        assert_eq!(json.get("type").unwrap(), "text");
    }
}
