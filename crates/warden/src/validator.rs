//! Answer validation: lockout check → per-question comparison → grant.
//!
//! Validation short-circuits at the first mismatch and never reveals
//! which question failed. Internal faults (decrypt or store errors) are
//! translated to a generic failure at this boundary and are not counted
//! against the visitor.

use std::sync::Arc;

use wicket_common::{QuestionType, SecretCodec, ValidateRequest, ValidateResponse, WicketError};

use crate::access::AccessFlags;
use crate::catalog::QuestionCatalog;
use crate::limiter::RateLimiter;
use crate::store::StateStore;

const MSG_LOCKED: &str = "Too many attempts.";
const MSG_NOT_FOUND: &str = "Question set not found.";
const MSG_ANSWER_ALL: &str = "Please answer all questions.";
const MSG_INCORRECT: &str = "Incorrect answer.";
const MSG_CORRECT: &str = "Correct! You now have access to this article.";
const MSG_INTERNAL: &str = "Something went wrong. Please try again later.";

/// Validation service
pub struct AnswerValidator {
    catalog: Arc<QuestionCatalog>,
    codec: Arc<SecretCodec>,
    limiter: RateLimiter,
    access: AccessFlags,
}

impl AnswerValidator {
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        codec: Arc<SecretCodec>,
        limiter: RateLimiter,
        access: AccessFlags,
    ) -> Self {
        Self {
            catalog,
            codec,
            limiter,
            access,
        }
    }

    /// Validate a submission. Always returns a structured outcome; any
    /// internal fault is logged and surfaced as a generic failure.
    pub async fn validate<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        request: &ValidateRequest,
    ) -> ValidateResponse {
        match self.validate_inner(store, visitor, request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    visitor = %visitor,
                    slug = %request.slug,
                    "Validation aborted by internal fault"
                );
                ValidateResponse::failure(MSG_INTERNAL)
            }
        }
    }

    async fn validate_inner<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        request: &ValidateRequest,
    ) -> Result<ValidateResponse, WicketError> {
        let slug = request.slug.as_str();

        // Fail fast while locked; a locked retry does no comparison work
        // and never extends the lock.
        let remaining = self.limiter.check_lock(store, visitor, slug).await?;
        if remaining > 0 {
            let minutes = remaining.div_ceil(60);
            return Ok(ValidateResponse::locked(
                format!("{MSG_LOCKED} Try again in {minutes} minute(s)."),
                remaining,
            ));
        }

        // Unknown set is an operator error, not a user failure.
        let Some(set) = self.catalog.get(&request.question_set_id) else {
            tracing::warn!(
                question_set_id = %request.question_set_id,
                slug = %slug,
                "Validation against unknown question set"
            );
            return Ok(ValidateResponse::failure(MSG_NOT_FOUND));
        };

        for question in &set.questions {
            let Some(user_answer) = request
                .answers
                .iter()
                .find(|a| a.question_id == question.id)
            else {
                self.limiter.record_failure(store, visitor, slug).await?;
                return Ok(ValidateResponse::failure(MSG_ANSWER_ALL));
            };

            // A decrypt failure here is corrupted configuration; it
            // propagates to the boundary above and is not recorded.
            let reference = self.codec.decrypt(&question.encrypted_answer)?;

            let correct = if question.kind == QuestionType::Text && !question.case_sensitive {
                user_answer.answer.to_lowercase() == reference.to_lowercase()
            } else {
                user_answer.answer == reference
            };

            if !correct {
                let record = self.limiter.record_failure(store, visitor, slug).await?;
                tracing::debug!(
                    visitor = %visitor,
                    slug = %slug,
                    attempts = record.attempts,
                    "Incorrect submission"
                );
                return Ok(ValidateResponse::failure(MSG_INCORRECT));
            }
        }

        self.access.grant(store, visitor, slug).await?;
        self.limiter.reset(store, visitor, slug).await?;

        Ok(ValidateResponse::success(MSG_CORRECT))
    }

    /// Access-flag membership for the HTTP surface.
    pub async fn is_granted<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        slug: &str,
    ) -> Result<bool, WicketError> {
        self.access.is_granted(store, visitor, slug).await
    }
}
