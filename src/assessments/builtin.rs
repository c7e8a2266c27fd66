//! Compiled-in assessments.
//!
//! These used to be separate hardcoded flows; they are now plain
//! `TestDefinition` data literals served through the same catalog and engine
//! as content-authored tests.

use super::domain::{
    AnswerOption, InterpretationRange, Question, ScoringMethod, TestDefinition,
};

pub const ANXIETY_SLUG: &str = "anxiety-self-check";
pub const BURNOUT_SLUG: &str = "burnout-self-check";

pub fn all() -> Vec<TestDefinition> {
    vec![anxiety_self_check(), burnout_self_check()]
}

fn frequency_options() -> Vec<AnswerOption> {
    vec![
        AnswerOption {
            label: "Never".to_string(),
            value: 0.0,
        },
        AnswerOption {
            label: "Several days".to_string(),
            value: 1.0,
        },
        AnswerOption {
            label: "More than half the days".to_string(),
            value: 2.0,
        },
        AnswerOption {
            label: "Nearly every day".to_string(),
            value: 3.0,
        },
    ]
}

fn question(id: &str, prompt: &str) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: frequency_options(),
        weight: 1.0,
        required: true,
    }
}

fn range(min: f64, max: f64, label: &str, severity: &str, color: &str) -> InterpretationRange {
    InterpretationRange {
        min_score: min,
        max_score: max,
        label: label.to_string(),
        severity: severity.to_string(),
        color: color.to_string(),
    }
}

pub fn anxiety_self_check() -> TestDefinition {
    TestDefinition {
        id: "builtin-anxiety".to_string(),
        slug: ANXIETY_SLUG.to_string(),
        title: "Anxiety Self-Check".to_string(),
        description: "A short screening of how often anxiety symptoms have affected you over the last two weeks.".to_string(),
        duration_label: "About 3 minutes".to_string(),
        instructions: vec![
            "Answer with the last two weeks in mind.".to_string(),
            "Pick the option closest to your experience; there are no right answers.".to_string(),
        ],
        disclaimer: "This self-check is informational and is not a diagnosis. If your results concern you, talk to a qualified professional.".to_string(),
        questions: vec![
            question("anx-1", "Feeling nervous, anxious, or on edge"),
            question("anx-2", "Not being able to stop or control worrying"),
            question("anx-3", "Trouble relaxing"),
            question("anx-4", "Becoming easily annoyed or irritable"),
            question("anx-5", "Feeling afraid as if something awful might happen"),
        ],
        scoring_method: ScoringMethod::Total,
        ranges: vec![
            range(0.0, 4.0, "Minimal anxiety", "minimal", "#4caf50"),
            range(5.0, 9.0, "Mild anxiety", "mild", "#ffc107"),
            range(10.0, 15.0, "Moderate to severe anxiety", "severe", "#f44336"),
        ],
    }
}

pub fn burnout_self_check() -> TestDefinition {
    TestDefinition {
        id: "builtin-burnout".to_string(),
        slug: BURNOUT_SLUG.to_string(),
        title: "Burnout Self-Check".to_string(),
        description: "Gauge how depleted you feel by work or caregiving demands.".to_string(),
        duration_label: "About 3 minutes".to_string(),
        instructions: vec![
            "Think about a typical week over the past month.".to_string(),
        ],
        disclaimer: "This self-check is informational and is not a diagnosis.".to_string(),
        questions: vec![
            question("brn-1", "I feel emotionally drained at the end of the day"),
            question("brn-2", "I find it hard to get started in the morning"),
            question("brn-3", "I feel detached from the people I work with or care for"),
            question("brn-4", "Small tasks feel like large obstacles"),
        ],
        scoring_method: ScoringMethod::Average,
        ranges: vec![
            range(0.0, 1.0, "Low burnout signals", "low", "#4caf50"),
            range(1.0, 2.0, "Emerging burnout signals", "moderate", "#ffc107"),
            range(2.0, 3.0, "Strong burnout signals", "high", "#f44336"),
        ],
    }
}
