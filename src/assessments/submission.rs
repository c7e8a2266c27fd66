use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Answer, ContactRecord};

/// Wire payload persisted when a respondent saves their results. Key casing
/// follows the site API (`testSlug`, `totalScore`, `userInfo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub test_id: String,
    pub test_slug: String,
    pub answers: Vec<Answer>,
    pub total_score: f64,
    /// Resolved band label, or `None` when no authored range matched.
    pub interpretation: Option<String>,
    pub severity: Option<String>,
    pub user_info: ContactRecord,
}

/// Acknowledgement returned on a successful write. Durability is assumed
/// from this response; the engine does not verify further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub result_id: String,
}

/// Failure of the single remote write attempt. The display text is what the
/// respondent sees above the retry-able save action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The store answered with an error body.
    #[error("{message}")]
    Remote { status: u16, message: String },
    /// The request never produced a store response.
    #[error("could not save your results, please try again")]
    Transport(String),
}

/// Outbound write used by the session controller. One attempt per
/// invocation; retry is a respondent decision, never automatic.
pub trait ResultSink: Send + Sync {
    fn submit(&self, payload: &ResultPayload) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Stored form of a submitted result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub result_id: String,
    pub payload: ResultPayload,
    pub submitted_at: DateTime<Utc>,
}

/// Persistence failure behind the save endpoint.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("result store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction behind `POST /api/saveTestResult`.
pub trait ResultRepository: Send + Sync {
    fn save(&self, payload: ResultPayload) -> Result<ResultRecord, RepositoryError>;
    fn fetch(&self, result_id: &str) -> Result<Option<ResultRecord>, RepositoryError>;
}

/// In-memory reference store.
#[derive(Default)]
pub struct MemoryResultStore {
    records: Mutex<HashMap<String, ResultRecord>>,
    sequence: AtomicU64,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("result store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultRepository for MemoryResultStore {
    fn save(&self, payload: ResultPayload) -> Result<ResultRecord, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = ResultRecord {
            result_id: format!("result-{id:06}"),
            payload,
            submitted_at: Utc::now(),
        };
        let mut records = self.records.lock().expect("result store lock");
        records.insert(record.result_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, result_id: &str) -> Result<Option<ResultRecord>, RepositoryError> {
        let records = self.records.lock().expect("result store lock");
        Ok(records.get(result_id).cloned())
    }
}

/// Sink writing straight through a result repository. This is the in-process
/// equivalent of posting to the save endpoint: the engine and the HTTP
/// surface share persistence semantics.
pub struct RepositorySink<R> {
    repository: Arc<R>,
}

impl<R> RepositorySink<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: ResultRepository> ResultSink for RepositorySink<R> {
    fn submit(&self, payload: &ResultPayload) -> Result<SubmissionReceipt, SubmissionError> {
        let record = self
            .repository
            .save(payload.clone())
            .map_err(|err| SubmissionError::Remote {
                status: 500,
                message: err.to_string(),
            })?;
        Ok(SubmissionReceipt {
            result_id: record.result_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ResultPayload {
        ResultPayload {
            test_id: "builtin-anxiety".to_string(),
            test_slug: "anxiety-self-check".to_string(),
            answers: vec![Answer {
                question_id: "anx-1".to_string(),
                value: 2.0,
                weight: 1.0,
            }],
            total_score: 2.0,
            interpretation: Some("Minimal anxiety".to_string()),
            severity: Some("minimal".to_string()),
            user_info: ContactRecord {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: None,
            },
        }
    }

    #[test]
    fn payload_serializes_with_site_api_key_casing() {
        let value = serde_json::to_value(payload()).expect("payload serializes");

        assert!(value.get("testSlug").is_some());
        assert!(value.get("totalScore").is_some());
        assert_eq!(
            value
                .pointer("/userInfo/firstName")
                .and_then(serde_json::Value::as_str),
            Some("Jane")
        );
        assert_eq!(
            value
                .pointer("/answers/0/questionId")
                .and_then(serde_json::Value::as_str),
            Some("anx-1")
        );
        assert!(value.get("total_score").is_none());
        assert!(value.get("user_info").is_none());
    }

    #[test]
    fn memory_store_assigns_sequential_ids_and_is_fetchable() {
        let store = MemoryResultStore::new();
        let first = store.save(payload()).expect("save succeeds");
        let second = store.save(payload()).expect("save succeeds");
        assert_ne!(first.result_id, second.result_id);

        let fetched = store
            .fetch(&first.result_id)
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(fetched.payload.test_slug, "anxiety-self-check");
    }

    #[test]
    fn repository_sink_returns_receipt_with_stored_id() {
        let store = Arc::new(MemoryResultStore::new());
        let sink = RepositorySink::new(store.clone());

        let receipt = sink.submit(&payload()).expect("submit succeeds");
        assert!(store
            .fetch(&receipt.result_id)
            .expect("fetch succeeds")
            .is_some());
    }

    #[test]
    fn remote_error_displays_server_message() {
        let error = SubmissionError::Remote {
            status: 500,
            message: "result store unavailable: offline".to_string(),
        };
        assert!(error.to_string().contains("unavailable"));
    }

    #[test]
    fn transport_error_displays_generic_fallback() {
        let error = SubmissionError::Transport("connection reset".to_string());
        assert_eq!(
            error.to_string(),
            "could not save your results, please try again"
        );
    }
}
