use axum::Router;
use mongodb::bson::doc;
use proficiency_api::{config::Config, create_router, services::AppState};
use std::sync::Arc;

/// Every seeded question's answer key.
pub const CORRECT_OPTION: &str = "beta";
pub const WRONG_OPTION: &str = "delta";

pub const SEEDED_TOPICS: [&str; 5] = ["Loops", "Functions", "Data Types", "Collections", "Syntax"];

pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // Load test environment from .env.test
    dotenvy::from_filename(".env.test").ok();

    let config = Config::load().expect("Failed to load test configuration");

    let mongo_client = mongodb::Client::with_uri_str(&config.mongo_uri)
        .await
        .expect("Failed to connect to test MongoDB");

    let redis_client =
        redis::Client::open(config.redis_uri.clone()).expect("Failed to create test Redis client");

    let app_state = Arc::new(
        AppState::new(config.clone(), mongo_client.clone(), redis_client)
            .await
            .expect("Failed to initialize test app state"),
    );

    // Python and JavaScript get full question sets; Java is left
    // unseeded on purpose for the empty-bank failure tests.
    seed_question_set(&mongo_client, &config.mongo_database, "python", "py").await;
    seed_question_set(&mongo_client, &config.mongo_database, "javascript", "js").await;

    create_router(app_state)
}

/// A full 15-answer submission with exactly `correct` correct entries.
pub fn answers_with_correct(correct: usize) -> Vec<String> {
    (0..15)
        .map(|i| {
            if i < correct {
                CORRECT_OPTION.to_string()
            } else {
                WRONG_OPTION.to_string()
            }
        })
        .collect()
}

async fn seed_question_set(
    mongo_client: &mongodb::Client,
    db_name: &str,
    language: &str,
    id_prefix: &str,
) {
    let db = mongo_client.database(db_name);
    let questions = db.collection::<mongodb::bson::Document>("questions");

    let first_id = format!("{}-q1", id_prefix);
    let exists = questions
        .find_one(doc! { "_id": &first_id })
        .await
        .expect("Failed to probe for seeded questions");
    if exists.is_some() {
        return;
    }

    let docs: Vec<mongodb::bson::Document> = (1..=15)
        .map(|i| {
            doc! {
                "_id": format!("{}-q{}", id_prefix, i),
                "language": language,
                "order_index": i,
                "kind": "multiple_choice",
                "topic": SEEDED_TOPICS[((i - 1) as usize) % SEEDED_TOPICS.len()],
                "difficulty": "medium",
                "prompt": format!("{} question {}", language, i),
                "options": ["alpha", CORRECT_OPTION, "gamma", WRONG_OPTION],
                "correct_answer": CORRECT_OPTION,
                "explanation": format!("The answer to question {} is {}.", i, CORRECT_OPTION),
            }
        })
        .collect();

    // Parallel test binaries race on the seed; a duplicate-key
    // failure just means another binary won.
    match questions.insert_many(docs).await {
        Ok(_) => eprintln!("Seeded {} question set", language),
        Err(e) => {
            let seeded = questions
                .find_one(doc! { "_id": &first_id })
                .await
                .ok()
                .flatten();
            if seeded.is_some() {
                eprintln!("{} question set already seeded by a parallel test", language);
            } else {
                panic!("Failed to seed {} questions: {:?}", language, e);
            }
        }
    }
}
