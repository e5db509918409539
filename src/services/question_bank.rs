use std::collections::{HashMap, HashSet};

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use redis::aio::ConnectionManager;

use crate::error::AssessmentError;
use crate::metrics::{record_cache_hit, record_cache_miss, QUESTION_BANK_RELOADS_TOTAL};
use crate::models::{DisplayQuestion, Language, LanguageInfo, Question, QUESTIONS_PER_ASSESSMENT};

const QUESTIONS_COLLECTION: &str = "questions";
const DISPLAY_CACHE_TTL_SECONDS: u64 = 300;

/// Read-side of the static question catalogue plus the admin bulk
/// reload. Question content is seeded out of band and never mutated
/// during grading.
pub struct QuestionBank {
    mongo: Database,
    redis: ConnectionManager,
}

impl QuestionBank {
    pub fn new(mongo: Database, redis: ConnectionManager) -> Self {
        Self { mongo, redis }
    }

    /// Static, order-preserving track listing. Never errors.
    pub fn list_languages() -> Vec<LanguageInfo> {
        Language::ALL
            .iter()
            .map(|lang| LanguageInfo {
                id: *lang,
                display_name: lang.display_name(),
                icon: lang.icon(),
            })
            .collect()
    }

    /// Display-safe question list for one language, ordered by
    /// `order_index`, answer keys stripped. Served from the Redis
    /// cache when possible; the cache is invalidated on bulk reload,
    /// so repeated reads between reloads return identical content.
    pub async fn questions_for_display(
        &self,
        language: Language,
    ) -> Result<Vec<DisplayQuestion>, AssessmentError> {
        let cache_key = display_cache_key(language);
        let mut conn = self.redis.clone();

        let cached: Option<String> = redis::cmd("GET")
            .arg(&cache_key)
            .query_async(&mut conn)
            .await?;

        if let Some(json) = cached {
            if let Ok(questions) = serde_json::from_str::<Vec<DisplayQuestion>>(&json) {
                record_cache_hit();
                return Ok(questions);
            }
            tracing::warn!("Dropping undecodable question cache entry: {}", cache_key);
        }
        record_cache_miss();

        let questions: Vec<DisplayQuestion> = self
            .questions_for_grading(language)
            .await?
            .into_iter()
            .map(DisplayQuestion::from)
            .collect();

        let json = serde_json::to_string(&questions)
            .map_err(|e| AssessmentError::Persistence(anyhow::Error::new(e)))?;
        redis::cmd("SETEX")
            .arg(&cache_key)
            .arg(DISPLAY_CACHE_TTL_SECONDS)
            .arg(json)
            .query_async::<()>(&mut conn)
            .await?;

        Ok(questions)
    }

    /// Full question records including answer keys, ordered by
    /// `order_index`, limited to one assessment round. Internal to the
    /// grading path; never exposed over HTTP.
    pub async fn questions_for_grading(
        &self,
        language: Language,
    ) -> Result<Vec<Question>, AssessmentError> {
        let collection: Collection<Question> = self.mongo.collection(QUESTIONS_COLLECTION);
        let options = FindOptions::builder()
            .sort(doc! { "order_index": 1 })
            .limit(QUESTIONS_PER_ASSESSMENT)
            .build();

        let cursor = collection
            .find(doc! { "language": language.as_str() })
            .with_options(options)
            .await?;

        let questions: Vec<Question> = cursor.try_collect().await?;

        if questions.is_empty() {
            // Data-seeding error, not a zero-score assessment
            return Err(AssessmentError::not_found(format!(
                "No questions configured for language: {}",
                language
            )));
        }

        Ok(questions)
    }

    /// Admin bulk load: replaces the entire question set for all
    /// languages (full delete-then-insert). Partial updates are not
    /// supported. Display caches are invalidated afterwards.
    pub async fn replace_all(&self, questions: Vec<Question>) -> Result<usize, AssessmentError> {
        validate_question_set(&questions)?;

        let collection: Collection<Question> = self.mongo.collection(QUESTIONS_COLLECTION);
        collection.delete_many(doc! {}).await?;

        let loaded = if questions.is_empty() {
            0
        } else {
            collection.insert_many(&questions).await?;
            questions.len()
        };

        self.invalidate_display_caches().await?;
        QUESTION_BANK_RELOADS_TOTAL.inc();
        tracing::info!("Question bank reloaded: {} questions", loaded);

        Ok(loaded)
    }

    async fn invalidate_display_caches(&self) -> Result<(), AssessmentError> {
        let mut conn = self.redis.clone();
        for language in Language::ALL {
            redis::cmd("DEL")
                .arg(display_cache_key(language))
                .query_async::<()>(&mut conn)
                .await?;
        }
        Ok(())
    }
}

fn display_cache_key(language: Language) -> String {
    format!("questions:display:{}", language)
}

/// Rejects a bulk load that would break the fixed-round invariants:
/// every question's answer key must be one of its options, and each
/// included language carries a full round with order indexes forming
/// exactly 1..=15. A language may be omitted entirely, but never
/// partially loaded.
fn validate_question_set(questions: &[Question]) -> Result<(), AssessmentError> {
    let mut seen_orders: HashSet<(Language, i32)> = HashSet::new();
    let mut per_language: HashMap<Language, i64> = HashMap::new();

    for question in questions {
        if question.order_index < 1 || i64::from(question.order_index) > QUESTIONS_PER_ASSESSMENT {
            return Err(AssessmentError::invalid_input(format!(
                "Question {}: order_index must be within 1..={}",
                question.id, QUESTIONS_PER_ASSESSMENT
            )));
        }
        if !seen_orders.insert((question.language, question.order_index)) {
            return Err(AssessmentError::invalid_input(format!(
                "Duplicate order_index {} for language {}",
                question.order_index, question.language
            )));
        }
        if !question.options.contains(&question.correct_answer) {
            return Err(AssessmentError::invalid_input(format!(
                "Question {}: correct_answer is not among the options",
                question.id
            )));
        }
        *per_language.entry(question.language).or_insert(0) += 1;
    }

    // Unique in-range indexes plus a full count means each included
    // language covers exactly 1..=15.
    for (language, count) in per_language {
        if count != QUESTIONS_PER_ASSESSMENT {
            return Err(AssessmentError::invalid_input(format!(
                "Language {} has {} questions; a full round of {} is required",
                language, count, QUESTIONS_PER_ASSESSMENT
            )));
        }
    }

    Ok(())
}
