use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::question::Language;

/// Coarse skill tier derived solely from the overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "beginner",
            ProficiencyLevel::Intermediate => "intermediate",
            ProficiencyLevel::Advanced => "advanced",
        }
    }
}

/// Per-question grading outcome, aligned 1:1 with the question bank
/// order at grading time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub question_id: String,
    /// None when the learner left the question unanswered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_answer: Option<String>,
    pub is_correct: bool,
}

/// Correct/total tally for one topic within one attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicStat {
    pub correct: u32,
    pub total: u32,
}

/// Output of the grading engine. Pure data; persistence happens in the
/// attempt ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingResult {
    pub answers: Vec<GradedAnswer>,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: i32,
    pub proficiency_level: ProficiencyLevel,
    pub topic_breakdown: HashMap<String, TopicStat>,
}

/// One complete, scored submission, stored in "assessment_attempts".
/// Append-only: never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub language: Language,
    pub attempt_number: u32,
    pub answers: Vec<GradedAnswer>,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: i32,
    pub proficiency_level: ProficiencyLevel,
    pub topic_breakdown: HashMap<String, TopicStat>,
    // Native BSON datetime in storage; the ledger sorts on it
    #[serde(with = "super::bson_datetime_as_chrono")]
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_seconds: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAssessmentRequest {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,
    pub language: Language,
    pub answers: Vec<String>,
    #[serde(default)]
    pub time_taken_seconds: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAssessmentResponse {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: i32,
    pub proficiency_level: ProficiencyLevel,
    pub topic_breakdown: HashMap<String, TopicStat>,
    pub attempt_number: u32,
}

impl From<&Attempt> for SubmitAssessmentResponse {
    fn from(attempt: &Attempt) -> Self {
        SubmitAssessmentResponse {
            score: attempt.score,
            total_questions: attempt.total_questions,
            percentage: attempt.percentage,
            proficiency_level: attempt.proficiency_level,
            topic_breakdown: attempt.topic_breakdown.clone(),
            attempt_number: attempt.attempt_number,
        }
    }
}

/// Latest attempt with display question metadata joined in.
#[derive(Debug, Serialize)]
pub struct LatestResultResponse {
    pub language: Language,
    pub attempt_number: u32,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: i32,
    pub proficiency_level: ProficiencyLevel,
    pub topic_breakdown: HashMap<String, TopicStat>,
    pub completed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken_seconds: Option<u32>,
    pub answers: Vec<AnswerReview>,
}

/// One graded answer enriched with the question it was graded against.
/// The assessment is complete at this point, so the answer key and
/// explanation are shown.
#[derive(Debug, Serialize)]
pub struct AnswerReview {
    pub question_id: String,
    pub prompt: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttemptHistoryResponse {
    pub attempts: Vec<Attempt>,
    pub count: usize,
}
