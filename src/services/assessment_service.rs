use mongodb::Database;
use redis::aio::ConnectionManager;

use crate::error::AssessmentError;
use crate::metrics::ASSESSMENTS_SUBMITTED_TOTAL;
use crate::models::attempt::{AnswerReview, LatestResultResponse};
use crate::models::{Attempt, SubmitAssessmentRequest};

use super::attempt_ledger::AttemptLedger;
use super::grading;
use super::profile_projection::ProfileProjection;
use super::question_bank::QuestionBank;

/// Orchestrates one submission as a single linear sequence: fetch the
/// question bank, grade (pure), append to the ledger, reconcile the
/// profile projection, respond.
pub struct AssessmentService {
    bank: QuestionBank,
    ledger: AttemptLedger,
    projection: ProfileProjection,
}

impl AssessmentService {
    pub fn new(mongo: Database, redis: ConnectionManager) -> Self {
        Self {
            bank: QuestionBank::new(mongo.clone(), redis),
            ledger: AttemptLedger::new(mongo.clone()),
            projection: ProfileProjection::new(mongo),
        }
    }

    pub async fn submit(&self, req: SubmitAssessmentRequest) -> Result<Attempt, AssessmentError> {
        tracing::info!(
            "Processing assessment submission: user={}, language={}, answers={}",
            req.user_id,
            req.language,
            req.answers.len()
        );

        // NotFound here aborts before anything is written: no attempt,
        // no projection mutation.
        let questions = self.bank.questions_for_grading(req.language).await?;

        if req.answers.len() < questions.len() {
            tracing::warn!(
                "Submission has {} answers for {} questions: unanswered items graded as incorrect",
                req.answers.len(),
                questions.len()
            );
        }

        let result = grading::grade(&questions, &req.answers);

        // The attempt insert must be acknowledged before the
        // projection write is issued; the projection never reflects an
        // attempt that failed to persist.
        let attempt = self
            .ledger
            .record_attempt(&req.user_id, req.language, result, req.time_taken_seconds)
            .await?;

        self.projection.reconcile(&attempt).await?;

        ASSESSMENTS_SUBMITTED_TOTAL
            .with_label_values(&[attempt.language.as_str(), attempt.proficiency_level.as_str()])
            .inc();

        Ok(attempt)
    }

    /// Most recent attempt across all languages, with display question
    /// metadata joined in for review.
    pub async fn latest_result(
        &self,
        user_id: &str,
    ) -> Result<LatestResultResponse, AssessmentError> {
        let attempt = self.ledger.latest_attempt(user_id, None).await?;

        // The bank may have been reloaded since this attempt was
        // graded; a missing question set degrades the review rather
        // than hiding the attempt.
        let questions = match self.bank.questions_for_grading(attempt.language).await {
            Ok(questions) => questions,
            Err(AssessmentError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        let answers = attempt
            .answers
            .iter()
            .map(|graded| {
                let question = questions.iter().find(|q| q.id == graded.question_id);
                AnswerReview {
                    question_id: graded.question_id.clone(),
                    prompt: question.map(|q| q.prompt.clone()).unwrap_or_default(),
                    topic: question.map(|q| q.topic.clone()).unwrap_or_default(),
                    submitted_answer: graded.submitted_answer.clone(),
                    correct_answer: question
                        .map(|q| q.correct_answer.clone())
                        .unwrap_or_default(),
                    is_correct: graded.is_correct,
                    explanation: question.and_then(|q| q.explanation.clone()),
                }
            })
            .collect();

        Ok(LatestResultResponse {
            language: attempt.language,
            attempt_number: attempt.attempt_number,
            score: attempt.score,
            total_questions: attempt.total_questions,
            percentage: attempt.percentage,
            proficiency_level: attempt.proficiency_level,
            topic_breakdown: attempt.topic_breakdown,
            completed_at: attempt.completed_at,
            time_taken_seconds: attempt.time_taken_seconds,
            answers,
        })
    }
}
