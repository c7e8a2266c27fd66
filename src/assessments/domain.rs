use serde::{Deserialize, Serialize};

/// Aggregation function turning a collection of answers into one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    Total,
    Average,
    Weighted,
}

impl ScoringMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Average => "Average",
            Self::Weighted => "Weighted",
        }
    }
}

/// One selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub value: f64,
}

fn default_weight() -> f64 {
    1.0
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
    /// Multiplier applied under the weighted scoring method.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Authoring metadata; auto-advance already guarantees an answer exists
    /// before forward navigation, so this is not enforced at runtime.
    #[serde(default = "default_required")]
    pub required: bool,
}

/// Authored score band. Ranges are trusted as-is; the engine performs no
/// overlap or coverage validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationRange {
    pub min_score: f64,
    pub max_score: f64,
    pub label: String,
    pub severity: String,
    pub color: String,
}

impl InterpretationRange {
    pub fn contains(&self, score: f64) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// A complete authored assessment, fetched once per attempt and read-only
/// thereafter. Serializes with camelCase keys, matching the content store's
/// wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub duration_label: String,
    pub instructions: Vec<String>,
    pub disclaimer: String,
    pub questions: Vec<Question>,
    pub scoring_method: ScoringMethod,
    pub ranges: Vec<InterpretationRange>,
}

impl TestDefinition {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

/// A recorded selection. The weight is copied from the question at answer
/// time so scoring never re-consults the definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: f64,
    pub weight: f64,
}

/// Respondent identity captured after scoring, immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}
