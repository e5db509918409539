use std::collections::HashMap;

use crate::models::{GradedAnswer, GradingResult, ProficiencyLevel, Question, TopicStat};

/// Grades a submission against the question set for one language.
///
/// Pure computation: no I/O, no side effects. The caller is
/// responsible for fetching a non-empty, `order_index`-sorted question
/// set (the question bank fails with `NotFound` on an empty set, so a
/// silent zero-score result is not reachable).
///
/// `submitted` is positionally aligned with `questions` and may be
/// shorter; unanswered trailing questions are graded as incorrect.
/// Correctness is exact string equality. No trimming, no case folding:
/// the answer keys are verbatim copies of the option strings.
pub fn grade(questions: &[Question], submitted: &[String]) -> GradingResult {
    let total_questions = questions.len() as u32;
    let mut answers = Vec::with_capacity(questions.len());
    let mut topic_breakdown: HashMap<String, TopicStat> = HashMap::new();
    let mut score = 0u32;

    for (i, question) in questions.iter().enumerate() {
        let submitted_answer = submitted.get(i).cloned();
        let is_correct = submitted_answer.as_deref() == Some(question.correct_answer.as_str());

        if is_correct {
            score += 1;
        }

        let stat = topic_breakdown.entry(question.topic.clone()).or_default();
        stat.total += 1;
        if is_correct {
            stat.correct += 1;
        }

        answers.push(GradedAnswer {
            question_id: question.id.clone(),
            submitted_answer,
            is_correct,
        });
    }

    let percentage = percentage(score, total_questions);

    GradingResult {
        answers,
        score,
        total_questions,
        percentage,
        proficiency_level: classify(percentage),
        topic_breakdown,
    }
}

/// Integer percentage, rounded half-up on the real-number ratio.
pub fn percentage(score: u32, total: u32) -> i32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) * 100.0 / f64::from(total)).round() as i32
}

/// Tier classification by inclusive upper bounds: the boundaries at
/// exactly 40 and exactly 70 belong to the lower tier.
pub fn classify(percentage: i32) -> ProficiencyLevel {
    if percentage <= 40 {
        ProficiencyLevel::Beginner
    } else if percentage <= 70 {
        ProficiencyLevel::Intermediate
    } else {
        ProficiencyLevel::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{Difficulty, Language, QuestionKind};

    fn question(id: &str, order: i32, topic: &str, correct: &str) -> Question {
        Question {
            id: id.to_string(),
            language: Language::Python,
            order_index: order,
            kind: QuestionKind::MultipleChoice,
            topic: topic.to_string(),
            difficulty: Difficulty::Medium,
            prompt: format!("Question {}", order),
            code_snippet: None,
            options: vec!["alpha".into(), "beta".into(), correct.to_string()],
            correct_answer: correct.to_string(),
            explanation: None,
        }
    }

    fn bank(n: usize) -> Vec<Question> {
        let topics = ["Loops", "Functions", "Data Types"];
        (0..n)
            .map(|i| {
                question(
                    &format!("q{}", i + 1),
                    (i + 1) as i32,
                    topics[i % topics.len()],
                    "right",
                )
            })
            .collect()
    }

    fn answers(correct: usize, total: usize) -> Vec<String> {
        (0..total)
            .map(|i| {
                if i < correct {
                    "right".to_string()
                } else {
                    "wrong".to_string()
                }
            })
            .collect()
    }

    #[test]
    fn all_correct_scores_full() {
        let questions = bank(15);
        let result = grade(&questions, &answers(15, 15));
        assert_eq!(result.score, 15);
        assert_eq!(result.percentage, 100);
        assert_eq!(result.proficiency_level, ProficiencyLevel::Advanced);
    }

    #[test]
    fn six_of_fifteen_is_beginner_at_exactly_forty() {
        let questions = bank(15);
        let result = grade(&questions, &answers(6, 15));
        assert_eq!(result.score, 6);
        assert_eq!(result.percentage, 40);
        assert_eq!(result.proficiency_level, ProficiencyLevel::Beginner);
    }

    #[test]
    fn eleven_of_fifteen_is_advanced() {
        let questions = bank(15);
        let result = grade(&questions, &answers(11, 15));
        assert_eq!(result.percentage, 73);
        assert_eq!(result.proficiency_level, ProficiencyLevel::Advanced);
    }

    #[test]
    fn tier_boundaries_belong_to_lower_tier() {
        assert_eq!(classify(0), ProficiencyLevel::Beginner);
        assert_eq!(classify(40), ProficiencyLevel::Beginner);
        assert_eq!(classify(41), ProficiencyLevel::Intermediate);
        assert_eq!(classify(70), ProficiencyLevel::Intermediate);
        assert_eq!(classify(71), ProficiencyLevel::Advanced);
        assert_eq!(classify(100), ProficiencyLevel::Advanced);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1/8 = 12.5% -> 13
        assert_eq!(percentage(1, 8), 13);
        // 1/3 = 33.33% -> 33
        assert_eq!(percentage(1, 3), 33);
        // 2/3 = 66.67% -> 67
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 15), 0);
        assert_eq!(percentage(15, 15), 100);
    }

    #[test]
    fn percentage_always_within_bounds() {
        for total in 1..=20u32 {
            for score in 0..=total {
                let p = percentage(score, total);
                assert!((0..=100).contains(&p), "{}/{} -> {}", score, total, p);
            }
        }
    }

    #[test]
    fn missing_trailing_answers_are_incorrect_not_an_error() {
        let questions = bank(15);
        let result = grade(&questions, &answers(5, 5));
        assert_eq!(result.score, 5);
        assert_eq!(result.answers.len(), 15);
        assert!(result.answers[5..].iter().all(|a| !a.is_correct));
        assert!(result.answers[5..]
            .iter()
            .all(|a| a.submitted_answer.is_none()));
    }

    #[test]
    fn empty_submission_scores_zero() {
        let questions = bank(15);
        let result = grade(&questions, &[]);
        assert_eq!(result.score, 0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.proficiency_level, ProficiencyLevel::Beginner);
        assert_eq!(result.answers.len(), 15);
    }

    #[test]
    fn comparison_is_exact_no_normalization() {
        let questions = vec![question("q1", 1, "Syntax", "3")];
        // Trailing whitespace and case differences are wrong answers.
        assert_eq!(grade(&questions, &["3 ".to_string()]).score, 0);
        assert_eq!(grade(&questions, &[" 3".to_string()]).score, 0);
        let questions = vec![question("q1", 1, "Syntax", "True")];
        assert_eq!(grade(&questions, &["true".to_string()]).score, 0);
        assert_eq!(grade(&questions, &["True".to_string()]).score, 1);
    }

    #[test]
    fn topic_totals_sum_to_question_count() {
        let questions = bank(15);
        let result = grade(&questions, &answers(7, 15));
        let total: u32 = result.topic_breakdown.values().map(|s| s.total).sum();
        assert_eq!(total, result.total_questions);
        // 15 questions cycling over 3 topics: 5 each.
        assert!(result.topic_breakdown.values().all(|s| s.total == 5));
    }

    #[test]
    fn topic_correct_counts_follow_answers() {
        let questions = bank(3); // one question per topic
        let result = grade(&questions, &answers(2, 3));
        assert_eq!(result.topic_breakdown["Loops"].correct, 1);
        assert_eq!(result.topic_breakdown["Functions"].correct, 1);
        assert_eq!(result.topic_breakdown["Data Types"].correct, 0);
        assert!(result
            .topic_breakdown
            .values()
            .all(|s| s.correct <= s.total));
    }

    #[test]
    fn topic_keys_are_verbatim() {
        let questions = vec![
            question("q1", 1, "Loops", "right"),
            question("q2", 2, "loops", "right"),
        ];
        let result = grade(&questions, &answers(2, 2));
        // "Loops" and "loops" are distinct topics; keys are not normalized.
        assert_eq!(result.topic_breakdown.len(), 2);
    }

    #[test]
    fn graded_answers_align_with_bank_order() {
        let questions = bank(4);
        let submitted = vec![
            "right".to_string(),
            "wrong".to_string(),
            "right".to_string(),
            "wrong".to_string(),
        ];
        let result = grade(&questions, &submitted);
        for (graded, question) in result.answers.iter().zip(questions.iter()) {
            assert_eq!(graded.question_id, question.id);
        }
        assert!(result.answers[0].is_correct);
        assert!(!result.answers[1].is_correct);
        assert!(result.answers[2].is_correct);
        assert!(!result.answers[3].is_correct);
    }
}
