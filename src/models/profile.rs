use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attempt::ProficiencyLevel;
use super::question::Language;

/// Denormalized latest-state summary stored in "user_profiles", one
/// document per user, keyed by the external user id. Overwritten in
/// place on every new attempt; it tracks the single most recent
/// attempt across all languages, not a per-language summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub user_id: String,
    #[serde(default)]
    pub has_completed_assessment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency_level: Option<ProficiencyLevel>,
    #[serde(
        default,
        with = "super::bson_datetime_as_chrono_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_assessment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub has_completed_assessment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proficiency_level: Option<ProficiencyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_assessment_date: Option<DateTime<Utc>>,
}

impl From<UserProfile> for StatusResponse {
    fn from(profile: UserProfile) -> Self {
        StatusResponse {
            has_completed_assessment: profile.has_completed_assessment,
            assessment_language: profile.assessment_language,
            proficiency_level: profile.proficiency_level,
            last_assessment_date: profile.last_assessment_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson::{self, Bson};

    #[test]
    fn last_assessment_date_is_stored_as_bson_datetime() {
        let date = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let profile = UserProfile {
            user_id: "learner-1".to_string(),
            has_completed_assessment: true,
            assessment_language: Some(Language::Java),
            proficiency_level: Some(ProficiencyLevel::Intermediate),
            last_assessment_date: Some(date),
        };

        let doc = bson::to_document(&profile).unwrap();
        assert!(matches!(
            doc.get("last_assessment_date"),
            Some(Bson::DateTime(_))
        ));

        let restored: UserProfile = bson::from_document(doc).unwrap();
        assert_eq!(restored.last_assessment_date, Some(date));
    }

    #[test]
    fn absent_last_assessment_date_deserializes_as_none() {
        let doc = bson::doc! { "_id": "learner-2" };
        let profile: UserProfile = bson::from_document(doc).unwrap();
        assert!(!profile.has_completed_assessment);
        assert_eq!(profile.last_assessment_date, None);
    }
}
