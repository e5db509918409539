use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::error::AssessmentError;
use crate::models::{Attempt, GradingResult, Language};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

const ATTEMPTS_COLLECTION: &str = "assessment_attempts";

/// Append-only history of graded attempts. Records are immutable once
/// inserted; prior attempts are never overwritten or deleted.
pub struct AttemptLedger {
    mongo: Database,
}

impl AttemptLedger {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn collection(&self) -> Collection<Attempt> {
        self.mongo.collection(ATTEMPTS_COLLECTION)
    }

    /// Persists a graded result as the next attempt for this
    /// (user, language) pair.
    ///
    /// The attempt number is read-then-incremented: two concurrent
    /// submissions by the same user for the same language race on the
    /// assignment and last writer wins. Gap-free numbering under
    /// concurrency is an accepted limitation, not a guarantee.
    pub async fn record_attempt(
        &self,
        user_id: &str,
        language: Language,
        result: GradingResult,
        time_taken_seconds: Option<u32>,
    ) -> Result<Attempt, AssessmentError> {
        let attempt_number = self.next_attempt_number(user_id, language).await?;

        let attempt = Attempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            language,
            attempt_number,
            answers: result.answers,
            score: result.score,
            total_questions: result.total_questions,
            percentage: result.percentage,
            proficiency_level: result.proficiency_level,
            topic_breakdown: result.topic_breakdown,
            completed_at: Utc::now(),
            time_taken_seconds,
        };

        let collection = self.collection();
        retry_async_with_config(RetryConfig::aggressive(), || async {
            collection.insert_one(&attempt).await.map(|_| ())
        })
        .await?;

        tracing::info!(
            "Attempt recorded: user={}, language={}, attempt_number={}, score={}/{}",
            attempt.user_id,
            attempt.language,
            attempt.attempt_number,
            attempt.score,
            attempt.total_questions
        );

        Ok(attempt)
    }

    async fn next_attempt_number(
        &self,
        user_id: &str,
        language: Language,
    ) -> Result<u32, AssessmentError> {
        let options = FindOneOptions::builder()
            .sort(doc! { "attempt_number": -1 })
            .build();

        let latest = self
            .collection()
            .find_one(doc! { "user_id": user_id, "language": language.as_str() })
            .with_options(options)
            .await?;

        Ok(latest.map(|a| a.attempt_number + 1).unwrap_or(1))
    }

    /// The attempt with the maximum `completed_at`, optionally scoped
    /// to one language. `attempt_number` breaks same-millisecond ties
    /// within a pair.
    pub async fn latest_attempt(
        &self,
        user_id: &str,
        language: Option<Language>,
    ) -> Result<Attempt, AssessmentError> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(language) = language {
            filter.insert("language", language.as_str());
        }

        let options = FindOneOptions::builder()
            .sort(doc! { "completed_at": -1, "attempt_number": -1 })
            .build();

        self.collection()
            .find_one(filter)
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AssessmentError::not_found(format!("No attempts found for user: {}", user_id))
            })
    }

    /// Full history for a user across all languages, most recent
    /// `completed_at` first. A user with no history is `NotFound`
    /// rather than an empty list; the HTTP layer surfaces 404.
    pub async fn all_attempts(&self, user_id: &str) -> Result<Vec<Attempt>, AssessmentError> {
        let options = FindOptions::builder()
            .sort(doc! { "completed_at": -1, "attempt_number": -1 })
            .build();

        let cursor = self
            .collection()
            .find(doc! { "user_id": user_id })
            .with_options(options)
            .await?;

        let attempts: Vec<Attempt> = cursor.try_collect().await?;

        if attempts.is_empty() {
            return Err(AssessmentError::not_found(format!(
                "No attempts found for user: {}",
                user_id
            )));
        }

        Ok(attempts)
    }
}
