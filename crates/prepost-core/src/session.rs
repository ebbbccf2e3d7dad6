//! Exam session state machine.
//!
//! Drives the Login -> PreTest -> Material -> PostTest -> Final lifecycle,
//! calling the scoring engine and the record repository at the right
//! transitions. State lives in an explicit [`SessionState`] value owned by
//! the caller and passed into every transition; the machine itself holds no
//! per-examinee state.
//!
//! Failure semantics: state fields are only mutated after the store call for
//! a transition has succeeded, so a failed write leaves the phase unchanged
//! and the examinee can reissue the submission.

use std::sync::Arc;

use crate::error::{SessionError, StoreError};
use crate::model::{ExamDefinition, ExamRecord, Phase, ScoreField, SessionState, TIMESTAMP_FORMAT};
use crate::repository::RecordRepository;
use crate::scoring::{self, AnswerKey, AnswerMap};

/// The session state machine for one exam definition.
///
/// One machine can serve many sessions; each session's progress is the
/// [`SessionState`] value threaded through the calls.
pub struct SessionMachine {
    repository: Arc<RecordRepository>,
    exam: ExamDefinition,
    key: AnswerKey,
}

impl SessionMachine {
    pub fn new(repository: Arc<RecordRepository>, exam: ExamDefinition) -> Self {
        let key = exam.answer_key();
        Self {
            repository,
            exam,
            key,
        }
    }

    /// The exam this machine administers.
    pub fn exam(&self) -> &ExamDefinition {
        &self.exam
    }

    fn require_phase(
        state: &SessionState,
        expected: Phase,
        action: &'static str,
    ) -> Result<(), SessionError> {
        if state.phase == expected {
            Ok(())
        } else {
            Err(SessionError::PhaseMismatch {
                action,
                phase: state.phase,
            })
        }
    }

    /// Login transition: register the examinee name and enter the pre-test.
    ///
    /// Guards: the trimmed name must be non-empty and not already registered
    /// (case-insensitive). A store read failure here fails closed with
    /// [`SessionError::RegistrationUnavailable`]; an unverifiable name never
    /// proceeds.
    pub async fn login(&self, state: &mut SessionState, name: &str) -> Result<(), SessionError> {
        Self::require_phase(state, Phase::Login, "login")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        let taken = self
            .repository
            .exists(name)
            .await
            .map_err(SessionError::RegistrationUnavailable)?;
        if taken {
            return Err(SessionError::DuplicateName(name.to_string()));
        }

        state.examinee_name = name.to_string();
        state.phase = Phase::PreTest;
        tracing::info!(
            session_id = %state.session_id,
            examinee = %state.examinee_name,
            exam = %self.exam.id,
            "examinee logged in"
        );
        Ok(())
    }

    /// Pre-test submission: score the answers and create the durable record.
    ///
    /// The pre-test creates the row (with `posttest_score = 0` and the
    /// timestamp set now), so an attempt abandoned before the post-test still
    /// leaves a record distinguishable from "never started". The uniqueness
    /// guard ran at login and is not re-checked here.
    pub async fn submit_pretest(
        &self,
        state: &mut SessionState,
        answers: &AnswerMap,
    ) -> Result<u32, SessionError> {
        Self::require_phase(state, Phase::PreTest, "submit_pretest")?;

        let score = scoring::score(answers, &self.key);
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let record = ExamRecord::new_pretest(&state.examinee_name, score, timestamp);

        self.repository
            .append(record)
            .await
            .map_err(SessionError::SaveFailed)?;

        state.pretest_score = score;
        state.phase = Phase::Material;
        tracing::info!(
            session_id = %state.session_id,
            examinee = %state.examinee_name,
            score,
            "pre-test recorded"
        );
        Ok(score)
    }

    /// Leave the instructional material and enter the post-test.
    pub fn enter_posttest(&self, state: &mut SessionState) -> Result<(), SessionError> {
        Self::require_phase(state, Phase::Material, "enter_posttest")?;
        state.phase = Phase::PostTest;
        Ok(())
    }

    /// Post-test submission: score the answers and update the existing row.
    ///
    /// Updates rather than appends, preserving one-record-per-examinee. A
    /// missing row is logged and the session still completes; a failed write
    /// blocks the transition.
    pub async fn submit_posttest(
        &self,
        state: &mut SessionState,
        answers: &AnswerMap,
    ) -> Result<u32, SessionError> {
        Self::require_phase(state, Phase::PostTest, "submit_posttest")?;

        let score = scoring::score(answers, &self.key);
        let updated = self
            .repository
            .update_score(&state.examinee_name, ScoreField::Posttest, score)
            .await
            .map_err(SessionError::SaveFailed)?;
        if !updated {
            tracing::warn!(
                session_id = %state.session_id,
                examinee = %state.examinee_name,
                "no stored record to update with post-test score"
            );
        }

        state.posttest_score = score;
        state.phase = Phase::Final;
        tracing::info!(
            session_id = %state.session_id,
            examinee = %state.examinee_name,
            score,
            "post-test recorded"
        );
        Ok(score)
    }

    /// End the session from the final screen, resetting to initial values.
    pub fn finish(&self, state: &mut SessionState) -> Result<(), SessionError> {
        Self::require_phase(state, Phase::Final, "finish")?;
        tracing::info!(
            session_id = %state.session_id,
            examinee = %state.examinee_name,
            "session finished"
        );
        state.reset();
        Ok(())
    }
}

/// Classify a store read failure for display paths that may degrade to an
/// empty dataset instead of blocking (e.g. a results listing).
pub fn degrade_to_empty(result: Result<Vec<ExamRecord>, StoreError>) -> Vec<ExamRecord> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("store unavailable, showing empty dataset: {e}");
            Vec::new()
        }
    }
}
