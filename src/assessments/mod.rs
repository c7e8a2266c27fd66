//! Self-administered assessment engine: definitions, answer capture,
//! scoring, interpretation, contact capture, and result persistence.

pub mod answers;
pub mod builtin;
pub mod catalog;
pub mod contact;
pub mod domain;
pub mod driver;
pub mod routes;
pub mod scoring;
pub mod session;
pub mod submission;

pub use catalog::{DefinitionCatalog, MemoryCatalog};
pub use contact::{validate_contact, ContactDraft, ContactValidationError};
pub use domain::{
    Answer, AnswerOption, ContactRecord, InterpretationRange, Question, ScoringMethod,
    TestDefinition,
};
pub use driver::{SessionHandle, DEFAULT_ADVANCE_DELAY};
pub use routes::{assessment_router, AssessmentApi};
pub use scoring::{compute_score, resolve_interpretation};
pub use session::{SessionController, SessionError, SessionState};
pub use submission::{
    MemoryResultStore, RepositorySink, ResultPayload, ResultRepository, ResultSink,
    SubmissionError, SubmissionReceipt,
};
