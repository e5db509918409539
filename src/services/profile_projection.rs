use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::{Collection, Database};

use crate::error::AssessmentError;
use crate::models::{Attempt, UserProfile};

const PROFILES_COLLECTION: &str = "user_profiles";

/// Last-writer-wins summary of the single most recent attempt per
/// user, across all languages. A single-document upsert keyed by user
/// id; no transaction needed beyond the atomic document write.
pub struct ProfileProjection {
    mongo: Database,
}

impl ProfileProjection {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn collection(&self) -> Collection<UserProfile> {
        self.mongo.collection(PROFILES_COLLECTION)
    }

    /// Unconditionally overwrites the user's summary with the state of
    /// the given attempt. Called exactly once per recorded attempt,
    /// strictly after the attempt insert is acknowledged.
    pub async fn reconcile(&self, attempt: &Attempt) -> Result<(), AssessmentError> {
        let profile = UserProfile {
            user_id: attempt.user_id.clone(),
            has_completed_assessment: true,
            assessment_language: Some(attempt.language),
            proficiency_level: Some(attempt.proficiency_level),
            last_assessment_date: Some(attempt.completed_at),
        };

        self.collection()
            .replace_one(doc! { "_id": &attempt.user_id }, &profile)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await?;

        tracing::debug!(
            "Profile reconciled: user={}, language={}, level={}",
            attempt.user_id,
            attempt.language,
            attempt.proficiency_level.as_str()
        );

        Ok(())
    }

    /// Current projection for a user. An unknown user is `NotFound`;
    /// a known user who never attempted reads back with
    /// `has_completed_assessment == false`.
    pub async fn status(&self, user_id: &str) -> Result<UserProfile, AssessmentError> {
        self.collection()
            .find_one(doc! { "_id": user_id })
            .await?
            .ok_or_else(|| AssessmentError::not_found(format!("Unknown user: {}", user_id)))
    }
}
