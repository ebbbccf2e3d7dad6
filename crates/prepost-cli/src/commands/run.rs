//! The `prepost run` command: an interactive exam session on the terminal.
//!
//! The terminal acts as the presentation layer: it renders each question's
//! labeled choices, collects a choice letter (or a skip) per question, and
//! hands the selected choice text to the session machine.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use prepost_core::error::SessionError;
use prepost_core::gateway::StoreGateway;
use prepost_core::model::{ExamDefinition, Question, SessionState};
use prepost_core::parser;
use prepost_core::repository::RecordRepository;
use prepost_core::scoring::AnswerMap;
use prepost_core::session::SessionMachine;
use prepost_store::config::load_config_from;
use prepost_store::create_store;

pub async fn execute(exam_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let exam_path = exam_path
        .or_else(|| config.default_exam.clone())
        .context("no exam file given; pass --exam or set default_exam in prepost.toml")?;
    let exam = parser::parse_exam(&exam_path)?;

    let warnings = parser::validate_exam(&exam);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("[{id}] "))
            .unwrap_or_default();
        eprintln!("Warning: {prefix}{}", w.message);
    }

    let store = create_store(&config.store)?;
    let gateway = StoreGateway::new(Arc::from(store), &config.worksheet);
    let repository = Arc::new(RecordRepository::new(gateway));
    let machine = SessionMachine::new(repository, exam);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(&machine, &mut stdin.lock(), &mut stdout.lock()).await
}

/// Drive one full session over any line-based input/output pair.
async fn run_session<R: BufRead, W: Write>(
    machine: &SessionMachine,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let mut state = SessionState::new();
    let exam = machine.exam().clone();

    writeln!(output, "=== {} ===", exam.name)?;
    if !exam.description.is_empty() {
        writeln!(output, "{}", exam.description)?;
    }

    // Login: loop until a usable name is accepted. A store outage fails
    // closed rather than letting an unverified name through.
    loop {
        let name = prompt(input, output, "Full name: ")?;
        match machine.login(&mut state, &name).await {
            Ok(()) => break,
            Err(e @ SessionError::RegistrationUnavailable(_)) => return Err(e.into()),
            Err(e) => writeln!(output, "{e}")?,
        }
    }

    // Pre-test. A failed write leaves the phase unchanged, so retrying
    // reissues the same transition with the same answers.
    writeln!(output, "\n--- Pre-Test ---")?;
    let answers = collect_answers(&exam, input, output)?;
    let score = loop {
        match machine.submit_pretest(&mut state, &answers).await {
            Ok(score) => break score,
            Err(e @ SessionError::SaveFailed(_)) => {
                writeln!(output, "{e}")?;
                prompt(input, output, "Press Enter to retry the submission.")?;
            }
            Err(e) => return Err(e.into()),
        }
    };
    writeln!(output, "Pre-test score: {score}")?;

    // Material
    writeln!(output, "\n--- Material ---")?;
    if exam.material.is_empty() {
        writeln!(output, "(no material provided)")?;
    } else {
        writeln!(output, "{}", exam.material)?;
    }
    prompt(input, output, "\nPress Enter to continue to the post-test.")?;
    machine.enter_posttest(&mut state)?;

    // Post-test
    writeln!(output, "\n--- Post-Test ---")?;
    let answers = collect_answers(&exam, input, output)?;
    let score = loop {
        match machine.submit_posttest(&mut state, &answers).await {
            Ok(score) => break score,
            Err(e @ SessionError::SaveFailed(_)) => {
                writeln!(output, "{e}")?;
                prompt(input, output, "Press Enter to retry the submission.")?;
            }
            Err(e) => return Err(e.into()),
        }
    };
    writeln!(output, "Post-test score: {score}")?;

    // Final
    writeln!(output, "\n--- Done ---")?;
    writeln!(output, "Name:      {}", state.examinee_name)?;
    writeln!(output, "Pre-test:  {}", state.pretest_score)?;
    writeln!(output, "Post-test: {}", state.posttest_score)?;
    prompt(input, output, "\nPress Enter to finish.")?;
    machine.finish(&mut state)?;
    writeln!(output, "Thank you for taking the exam!")?;

    Ok(())
}

/// Print a prompt and read one line. EOF is an error: the session cannot
/// continue without input.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> Result<String> {
    write!(output, "{text}")?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    anyhow::ensure!(read > 0, "input ended unexpectedly");
    Ok(line.trim().to_string())
}

/// Present every question and collect the chosen choice text per question id.
fn collect_answers<R: BufRead, W: Write>(
    exam: &ExamDefinition,
    input: &mut R,
    output: &mut W,
) -> Result<AnswerMap> {
    let mut answers = AnswerMap::new();

    for (i, question) in exam.questions.iter().enumerate() {
        writeln!(output, "\n{}. {}", i + 1, question.text)?;
        for choice in &question.choices {
            writeln!(output, "   {choice}")?;
        }

        let reply = prompt(input, output, "Answer [letter, Enter to skip]: ")?;
        answers.insert(question.id.clone(), pick_choice(question, &reply));
    }

    Ok(answers)
}

/// Map a typed reply to the full choice text, or `None` for a skip or an
/// unrecognized letter.
fn pick_choice(question: &Question, reply: &str) -> Option<String> {
    let letter = reply.trim().chars().next()?.to_ascii_uppercase();
    question
        .choices
        .iter()
        .find(|c| Question::choice_label(c) == Some(letter))
        .cloned()
}
