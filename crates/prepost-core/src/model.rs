//! Core data model types for prepost.
//!
//! These are the fundamental types that the entire prepost system uses to
//! represent stored exam records, exam definitions, and in-flight sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Timestamp format written into [`ExamRecord::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One stored row per examinee.
///
/// Field names are serde-renamed to the worksheet column headers the store
/// uses (`Nama`, `Skor_Pretest`, `Skor_Posttest`, `Waktu`), so this type is
/// both the domain record and the wire row shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    /// Examinee name. Trimmed, non-empty; case-insensitive uniqueness key.
    #[serde(rename = "Nama")]
    pub name: String,
    /// Pre-test score, 0..=100 in steps of 10.
    #[serde(rename = "Skor_Pretest")]
    pub pretest_score: u32,
    /// Post-test score. `0` also means "not yet taken"; there is no tri-state.
    #[serde(rename = "Skor_Posttest", default)]
    pub posttest_score: u32,
    /// Pre-test submission time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "Waktu")]
    pub timestamp: String,
}

impl ExamRecord {
    /// Build the record created at pre-test submission. The post-test score
    /// starts at zero and is filled in by a later update.
    pub fn new_pretest(name: &str, pretest_score: u32, timestamp: String) -> Self {
        Self {
            name: name.to_string(),
            pretest_score,
            posttest_score: 0,
            timestamp,
        }
    }
}

/// Which score column an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreField {
    Pretest,
    Posttest,
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreField::Pretest => write!(f, "pretest"),
            ScoreField::Posttest => write!(f, "posttest"),
        }
    }
}

/// One stage of the exam lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Login,
    PreTest,
    Material,
    PostTest,
    Final,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Login => write!(f, "login"),
            Phase::PreTest => write!(f, "pretest"),
            Phase::Material => write!(f, "material"),
            Phase::PostTest => write!(f, "posttest"),
            Phase::Final => write!(f, "final"),
        }
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "login" => Ok(Phase::Login),
            "pretest" | "pre-test" => Ok(Phase::PreTest),
            "material" => Ok(Phase::Material),
            "posttest" | "post-test" => Ok(Phase::PostTest),
            "final" => Ok(Phase::Final),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

/// In-memory state of one active exam attempt.
///
/// Owned by the orchestrating caller (one value per connection or terminal
/// session) and threaded explicitly through [`crate::session::SessionMachine`]
/// transition calls. Never persisted, never a process-wide singleton.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    pub examinee_name: String,
    pub pretest_score: u32,
    pub posttest_score: u32,
    /// Correlation id for log output only.
    pub session_id: Uuid,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Login,
            examinee_name: String::new(),
            pretest_score: 0,
            posttest_score: 0,
            session_id: Uuid::new_v4(),
        }
    }

    /// Return to the initial values with a fresh session id.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the exam (e.g. "q1").
    pub id: String,
    /// The question text shown to the examinee.
    pub text: String,
    /// Labeled choices in presentation order ("A. …" .. "D. …").
    pub choices: Vec<String>,
    /// The correct choice label, a single uppercase letter.
    pub correct: char,
}

impl Question {
    /// The label letter of a choice string ("B. Oxygen" -> Some('B')).
    pub fn choice_label(choice: &str) -> Option<char> {
        choice.chars().next().filter(|c| c.is_ascii_uppercase())
    }
}

/// A complete exam: question bank, answer key, and interlude material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDefinition {
    /// Unique identifier for this exam.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of what this exam covers.
    #[serde(default)]
    pub description: String,
    /// Instructional text shown between the pre-test and the post-test.
    #[serde(default)]
    pub material: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl ExamDefinition {
    /// Derive the answer key: question id -> correct choice label.
    ///
    /// Ordered so scoring and reporting iterate deterministically.
    pub fn answer_key(&self) -> std::collections::BTreeMap<String, char> {
        self.questions
            .iter()
            .map(|q| (q.id.clone(), q.correct))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display_and_parse() {
        assert_eq!(Phase::Login.to_string(), "login");
        assert_eq!(Phase::PreTest.to_string(), "pretest");
        assert_eq!("pretest".parse::<Phase>().unwrap(), Phase::PreTest);
        assert_eq!("Post-Test".parse::<Phase>().unwrap(), Phase::PostTest);
        assert_eq!("FINAL".parse::<Phase>().unwrap(), Phase::Final);
        assert!("intermission".parse::<Phase>().is_err());
    }

    #[test]
    fn session_state_initial_values() {
        let state = SessionState::new();
        assert_eq!(state.phase, Phase::Login);
        assert!(state.examinee_name.is_empty());
        assert_eq!(state.pretest_score, 0);
        assert_eq!(state.posttest_score, 0);
    }

    #[test]
    fn session_state_reset_regenerates_id() {
        let mut state = SessionState::new();
        state.phase = Phase::Final;
        state.examinee_name = "Budi".into();
        let old_id = state.session_id;

        state.reset();
        assert_eq!(state.phase, Phase::Login);
        assert!(state.examinee_name.is_empty());
        assert_ne!(state.session_id, old_id);
    }

    #[test]
    fn exam_record_serde_uses_worksheet_columns() {
        let record = ExamRecord::new_pretest("Budi", 80, "2025-01-01 10:00:00".into());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Nama\":\"Budi\""));
        assert!(json.contains("\"Skor_Pretest\":80"));
        assert!(json.contains("\"Skor_Posttest\":0"));
        assert!(json.contains("\"Waktu\""));

        let back: ExamRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn answer_key_from_questions() {
        let exam = ExamDefinition {
            id: "x".into(),
            name: "X".into(),
            description: String::new(),
            material: String::new(),
            questions: vec![
                Question {
                    id: "q1".into(),
                    text: "One?".into(),
                    choices: vec!["A. yes".into(), "B. no".into()],
                    correct: 'A',
                },
                Question {
                    id: "q2".into(),
                    text: "Two?".into(),
                    choices: vec!["A. yes".into(), "B. no".into()],
                    correct: 'B',
                },
            ],
        };
        let key = exam.answer_key();
        assert_eq!(key.len(), 2);
        assert_eq!(key["q1"], 'A');
        assert_eq!(key["q2"], 'B');
    }

    #[test]
    fn choice_label_extraction() {
        assert_eq!(Question::choice_label("B. Oxygen"), Some('B'));
        assert_eq!(Question::choice_label("b. lowercase"), None);
        assert_eq!(Question::choice_label(""), None);
    }
}
