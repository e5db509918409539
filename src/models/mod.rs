pub mod attempt;
pub mod profile;
pub mod question;

pub use attempt::{
    AnswerReview, Attempt, AttemptHistoryResponse, GradedAnswer, GradingResult,
    LatestResultResponse, ProficiencyLevel, SubmitAssessmentRequest, SubmitAssessmentResponse,
    TopicStat,
};
pub use profile::{StatusResponse, UserProfile};
pub use question::{DisplayQuestion, Language, LanguageInfo, Question, QUESTIONS_PER_ASSESSMENT};

/// Serde adapter storing a `chrono::DateTime<Utc>` as a native BSON
/// datetime, so MongoDB indexes and sorts the field chronologically.
pub(crate) mod bson_datetime_as_chrono {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        bson::DateTime::from_millis(date.timestamp_millis()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bson_dt = bson::DateTime::deserialize(deserializer)?;
        DateTime::from_timestamp_millis(bson_dt.timestamp_millis())
            .ok_or_else(|| serde::de::Error::custom("BSON datetime out of chrono range"))
    }
}

/// Option variant of [`bson_datetime_as_chrono`].
pub(crate) mod bson_datetime_as_chrono_option {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => {
                serializer.serialize_some(&bson::DateTime::from_millis(d.timestamp_millis()))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<bson::DateTime>::deserialize(deserializer)? {
            Some(bson_dt) => DateTime::from_timestamp_millis(bson_dt.timestamp_millis())
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom("BSON datetime out of chrono range")),
            None => Ok(None),
        }
    }
}
