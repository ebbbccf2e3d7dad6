//! TOML exam definition parser.
//!
//! Loads exam definitions from TOML files and directories, and validates
//! them. The question bank, answer key, and interlude material all live in
//! the exam file; nothing about a specific question is hard-coded.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{ExamDefinition, Question};

/// Intermediate TOML structure for parsing exam files.
#[derive(Debug, Deserialize)]
struct TomlExamFile {
    exam: TomlExamHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    material: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(default)]
    choices: Vec<String>,
    /// Single uppercase letter, written as a string in TOML.
    correct: String,
}

/// Parse a single TOML file into an `ExamDefinition`.
pub fn parse_exam(path: &Path) -> Result<ExamDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path)
}

/// Parse a TOML string into an `ExamDefinition` (useful for testing).
pub fn parse_exam_str(content: &str, source_path: &Path) -> Result<ExamDefinition> {
    let parsed: TomlExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let correct = parse_label(&q.correct).with_context(|| {
                format!("question '{}' in {}", q.id, source_path.display())
            })?;
            Ok(Question {
                id: q.id,
                text: q.text,
                choices: q.choices,
                correct,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExamDefinition {
        id: parsed.exam.id,
        name: parsed.exam.name,
        description: parsed.exam.description,
        material: parsed.exam.material,
        questions,
    })
}

/// A choice label must be exactly one uppercase ASCII letter.
fn parse_label(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Ok(c),
        _ => anyhow::bail!("correct label must be a single uppercase letter, got '{s}'"),
    }
}

/// Recursively load all `.toml` exam files from a directory.
pub fn load_exam_directory(dir: &Path) -> Result<Vec<ExamDefinition>> {
    let mut exams = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            exams.extend(load_exam_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_exam(&path) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(exams)
}

/// A warning from exam validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an exam definition for common issues.
pub fn validate_exam(exam: &ExamDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if exam.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "exam has no questions".into(),
        });
    }

    // Check for duplicate question ids
    let mut seen_ids = std::collections::HashSet::new();
    for q in &exam.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question id: {}", q.id),
            });
        }
    }

    for q in &exam.questions {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "question text is empty".into(),
            });
        }

        if q.choices.is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "question has no choices".into(),
            });
            continue;
        }

        // Every choice must carry a parseable label, unique within the question
        let mut labels = std::collections::HashSet::new();
        for choice in &q.choices {
            match Question::choice_label(choice) {
                Some(label) => {
                    if !labels.insert(label) {
                        warnings.push(ValidationWarning {
                            question_id: Some(q.id.clone()),
                            message: format!("duplicate choice label '{label}'"),
                        });
                    }
                }
                None => warnings.push(ValidationWarning {
                    question_id: Some(q.id.clone()),
                    message: format!(
                        "choice '{choice}' does not start with an uppercase label"
                    ),
                }),
            }
        }

        // The correct label has to be answerable
        if !labels.contains(&q.correct) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("correct label '{}' matches no choice", q.correct),
            });
        }
    }

    warnings
}
