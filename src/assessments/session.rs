use std::sync::Arc;

use super::answers::AnswerSheet;
use super::catalog::DefinitionCatalog;
use super::contact::{validate_contact, ContactDraft, ContactValidationError};
use super::domain::{Answer, ContactRecord, InterpretationRange, Question, TestDefinition};
use super::scoring::{compute_score, resolve_interpretation};
use super::submission::{ResultPayload, ResultSink, SubmissionError, SubmissionReceipt};

/// Lifecycle of one respondent attempt. Sessions are memory-only and do not
/// survive a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// Presenting the question at this index.
    Presenting(usize),
    AwaitingContact,
    Submitting,
    Completed,
    /// Terminal view with no retry, e.g. a definition that cannot be
    /// presented.
    Error(String),
}

/// Handle to a scheduled auto-advance. The ticket is only honored while its
/// generation is current; any competing transition invalidates it, so a
/// timer that fires late cannot move a session that has gone elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    from_index: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No active definition for the slug, or the content store failed.
    /// The two cases are deliberately indistinguishable to the respondent.
    #[error("test not found")]
    DefinitionNotFound,
    #[error("{action} is not available in the current step")]
    InvalidTransition { action: &'static str },
    #[error("selected value is not offered by question {question_id}")]
    ValueNotOffered { question_id: String },
    #[error("answer the final question before submitting")]
    FinalAnswerMissing,
    #[error(transparent)]
    Validation(#[from] ContactValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    /// A concurrent save was attempted while one is still running. Raised by
    /// [`super::driver::SessionHandle::save_results`]; the controller itself
    /// is synchronous and cannot observe an in-flight submission.
    #[error("your results are already being saved")]
    SubmissionInFlight,
}

/// Finite-state machine driving one respondent through
/// intro → questions → contact capture → submission → completion.
///
/// The controller is synchronous; the debounce around auto-advance lives in
/// [`super::driver::SessionHandle`], which owns the timer and calls back into
/// [`SessionController::fire_advance`].
pub struct SessionController<S> {
    definition: TestDefinition,
    state: SessionState,
    answers: AnswerSheet,
    score: Option<f64>,
    interpretation: Option<InterpretationRange>,
    contact: Option<ContactRecord>,
    last_error: Option<String>,
    generation: u64,
    sink: Arc<S>,
}

impl<S: ResultSink> SessionController<S> {
    pub fn new(definition: TestDefinition, sink: Arc<S>) -> Self {
        Self {
            definition,
            state: SessionState::NotStarted,
            answers: AnswerSheet::new(),
            score: None,
            interpretation: None,
            contact: None,
            last_error: None,
            generation: 0,
            sink,
        }
    }

    /// Load an active definition by slug and build a fresh session for it.
    /// A missing definition and a content-store failure both collapse into
    /// [`SessionError::DefinitionNotFound`]; the caller maps it to a terminal
    /// not-found view with no retry.
    pub fn from_catalog<C: DefinitionCatalog>(
        catalog: &C,
        slug: &str,
        sink: Arc<S>,
    ) -> Result<Self, SessionError> {
        let definition = catalog
            .active_by_slug(slug)
            .ok()
            .flatten()
            .ok_or(SessionError::DefinitionNotFound)?;
        Ok(Self::new(definition, sink))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn definition(&self) -> &TestDefinition {
        &self.definition
    }

    pub fn answers(&self) -> &[Answer] {
        self.answers.answers()
    }

    /// Computed score, `None` until "save results" has run scoring.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn interpretation(&self) -> Option<&InterpretationRange> {
        self.interpretation.as_ref()
    }

    pub fn contact(&self) -> Option<&ContactRecord> {
        self.contact.as_ref()
    }

    /// Transient message from the last recoverable failure, cleared on
    /// success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::Presenting(index) => self.definition.question_at(index),
            _ => None,
        }
    }

    /// Explicit start: intro → first question. A definition with no
    /// questions cannot be presented and lands in the terminal error view.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::InvalidTransition { action: "start" });
        }
        if self.definition.questions.is_empty() {
            let reason = "test definition has no questions".to_string();
            self.state = SessionState::Error(reason);
            return Ok(());
        }
        self.state = SessionState::Presenting(0);
        Ok(())
    }

    /// Record the respondent's selection for the question currently shown.
    ///
    /// Re-selecting replaces the prior answer (last-write-wins) and
    /// invalidates any pending advance. Returns a ticket when an advance to
    /// the next question should be scheduled; the final question never
    /// auto-advances.
    pub fn select_answer(&mut self, value: f64) -> Result<Option<AdvanceTicket>, SessionError> {
        let index = match self.state {
            SessionState::Presenting(index) => index,
            _ => {
                return Err(SessionError::InvalidTransition {
                    action: "answer",
                })
            }
        };

        let question = self
            .definition
            .question_at(index)
            .ok_or(SessionError::InvalidTransition { action: "answer" })?;

        if !question.options.iter().any(|option| option.value == value) {
            return Err(SessionError::ValueNotOffered {
                question_id: question.id.clone(),
            });
        }

        self.answers.record(Answer {
            question_id: question.id.clone(),
            value,
            weight: question.weight,
        });

        // Any previously scheduled advance is now stale.
        self.generation += 1;

        if index + 1 < self.definition.question_count() {
            Ok(Some(AdvanceTicket {
                generation: self.generation,
                from_index: index,
            }))
        } else {
            Ok(None)
        }
    }

    /// Fire a scheduled advance. Returns `false` for stale tickets: the
    /// answer changed, the respondent navigated, or the advance already
    /// fired.
    pub fn fire_advance(&mut self, ticket: AdvanceTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        let index = match self.state {
            SessionState::Presenting(index) if index == ticket.from_index => index,
            _ => return false,
        };
        let question = match self.definition.question_at(index) {
            Some(question) => question,
            None => return false,
        };
        if !self.answers.has_answer(&question.id) {
            return false;
        }

        self.generation += 1;
        self.state = SessionState::Presenting(index + 1);
        true
    }

    /// Explicit backward navigation. Never clears the answer at the current
    /// index, and cancels any pending advance.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Presenting(index) if index > 0 => {
                self.generation += 1;
                self.state = SessionState::Presenting(index - 1);
                Ok(())
            }
            _ => Err(SessionError::InvalidTransition { action: "previous" }),
        }
    }

    /// Explicit "submit answers" from the final question into contact
    /// capture. Requires an answer for the final question.
    pub fn submit_answers(&mut self) -> Result<(), SessionError> {
        let last = self.definition.question_count().saturating_sub(1);
        match self.state {
            SessionState::Presenting(index) if index == last => {
                let question = self
                    .definition
                    .question_at(last)
                    .ok_or(SessionError::InvalidTransition { action: "submit" })?;
                if !self.answers.has_answer(&question.id) {
                    return Err(SessionError::FinalAnswerMissing);
                }
                self.generation += 1;
                self.state = SessionState::AwaitingContact;
                Ok(())
            }
            _ => Err(SessionError::InvalidTransition { action: "submit" }),
        }
    }

    /// Non-destructive "review answers": back to the final question with all
    /// answers intact.
    pub fn review_answers(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::AwaitingContact {
            return Err(SessionError::InvalidTransition { action: "review" });
        }
        self.generation += 1;
        let last = self.definition.question_count().saturating_sub(1);
        self.state = SessionState::Presenting(last);
        Ok(())
    }

    /// Explicit "save results": validate contact, compute score and
    /// interpretation, then perform the single persistence attempt.
    ///
    /// Validation failure and persistence failure both leave the session in
    /// `AwaitingContact` with the message surfaced via [`Self::last_error`];
    /// only a successful write reaches `Completed`.
    pub fn save_results(
        &mut self,
        draft: &ContactDraft,
    ) -> Result<SubmissionReceipt, SessionError> {
        match self.state {
            SessionState::AwaitingContact => {}
            _ => return Err(SessionError::InvalidTransition { action: "save" }),
        }

        let contact = match validate_contact(draft) {
            Ok(contact) => contact,
            Err(violation) => {
                self.last_error = Some(violation.to_string());
                return Err(violation.into());
            }
        };

        let score = compute_score(self.answers.answers(), self.definition.scoring_method);
        let interpretation =
            resolve_interpretation(score, &self.definition.ranges).cloned();
        self.score = Some(score);
        self.interpretation = interpretation.clone();

        let payload = ResultPayload {
            test_id: self.definition.id.clone(),
            test_slug: self.definition.slug.clone(),
            answers: self.answers.answers().to_vec(),
            total_score: score,
            interpretation: interpretation.as_ref().map(|range| range.label.clone()),
            severity: interpretation.as_ref().map(|range| range.severity.clone()),
            user_info: contact.clone(),
        };

        self.state = SessionState::Submitting;
        match self.sink.submit(&payload) {
            Ok(receipt) => {
                self.state = SessionState::Completed;
                self.contact = Some(contact);
                self.last_error = None;
                Ok(receipt)
            }
            Err(error) => {
                self.state = SessionState::AwaitingContact;
                self.last_error = Some(error.to_string());
                Err(error.into())
            }
        }
    }
}
