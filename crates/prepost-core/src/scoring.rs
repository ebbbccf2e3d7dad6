//! Multiple-choice scoring engine.
//!
//! Pure and total: identical input gives identical output, no side effects,
//! and no input (including a fully empty answer map) is an error.

use std::collections::{BTreeMap, HashMap};

/// Points awarded per correctly answered question.
pub const POINTS_PER_QUESTION: u32 = 10;

/// Raw answers collected by the presentation layer, keyed by question id.
/// `None` means the question was left unanswered.
pub type AnswerMap = HashMap<String, Option<String>>;

/// The fixed answer key: question id -> correct choice label.
pub type AnswerKey = BTreeMap<String, char>;

/// Score a set of raw answers against the answer key.
///
/// For every question in the key, the answer earns [`POINTS_PER_QUESTION`]
/// when it is present and its text begins with the correct label letter
/// ("B. Oxygen" matches key 'B'). Unanswered or missing questions score
/// zero. Answers for ids not in the key are ignored, so the engine works for
/// any question count without modification.
pub fn score(answers: &AnswerMap, key: &AnswerKey) -> u32 {
    let correct = key
        .iter()
        .filter(|(id, label)| {
            answers
                .get(id.as_str())
                .and_then(|choice| choice.as_deref())
                .is_some_and(|text| text.starts_with(**label))
        })
        .count() as u32;

    correct * POINTS_PER_QUESTION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(entries: &[(&str, char)]) -> AnswerKey {
        entries.iter().map(|(id, c)| (id.to_string(), *c)).collect()
    }

    fn answer(id: &str, text: &str) -> (String, Option<String>) {
        (id.to_string(), Some(text.to_string()))
    }

    #[test]
    fn all_correct_scores_100() {
        let key = key(&[
            ("q1", 'A'),
            ("q2", 'B'),
            ("q3", 'C'),
            ("q4", 'A'),
            ("q5", 'D'),
            ("q6", 'B'),
            ("q7", 'C'),
            ("q8", 'A'),
            ("q9", 'D'),
            ("q10", 'B'),
        ]);
        let answers: AnswerMap = key
            .iter()
            .map(|(id, c)| (id.clone(), Some(format!("{c}. some choice"))))
            .collect();

        assert_eq!(score(&answers, &key), 100);
    }

    #[test]
    fn empty_answers_score_0() {
        let key = key(&[("q1", 'A'), ("q2", 'B')]);
        assert_eq!(score(&AnswerMap::new(), &key), 0);
    }

    #[test]
    fn unanswered_questions_score_0_without_error() {
        let key = key(&[("q1", 'A'), ("q2", 'B'), ("q3", 'C')]);
        let answers: AnswerMap = [
            answer("q1", "A. right"),
            ("q2".to_string(), None),
            // q3 missing entirely
        ]
        .into_iter()
        .collect();

        assert_eq!(score(&answers, &key), 10);
    }

    #[test]
    fn wrong_answers_score_0() {
        let key = key(&[("q1", 'A'), ("q2", 'B')]);
        let answers: AnswerMap = [answer("q1", "B. wrong"), answer("q2", "D. wrong")]
            .into_iter()
            .collect();

        assert_eq!(score(&answers, &key), 0);
    }

    #[test]
    fn matches_on_label_prefix_only() {
        let key = key(&[("q1", 'A')]);

        // Anything beginning with the correct letter counts.
        let answers: AnswerMap = [answer("q1", "A")].into_iter().collect();
        assert_eq!(score(&answers, &key), 10);

        // Lowercase does not match the uppercase label.
        let answers: AnswerMap = [answer("q1", "a. right letter, wrong case")]
            .into_iter()
            .collect();
        assert_eq!(score(&answers, &key), 0);
    }

    #[test]
    fn extra_answers_outside_key_are_ignored() {
        let key = key(&[("q1", 'A')]);
        let answers: AnswerMap = [answer("q1", "A. right"), answer("q99", "A. stray")]
            .into_iter()
            .collect();

        assert_eq!(score(&answers, &key), 10);
    }

    #[test]
    fn arbitrary_question_counts() {
        let key = key(&[("q1", 'A'), ("q2", 'B'), ("q3", 'C'), ("q4", 'D')]);
        let answers: AnswerMap = [answer("q1", "A. x"), answer("q3", "C. y")]
            .into_iter()
            .collect();

        assert_eq!(score(&answers, &key), 20);
    }

    #[test]
    fn deterministic_across_calls() {
        let key = key(&[("q1", 'A'), ("q2", 'B')]);
        let answers: AnswerMap = [answer("q1", "A. x")].into_iter().collect();

        let first = score(&answers, &key);
        assert_eq!(score(&answers, &key), first);
    }
}
