use super::domain::Answer;

/// In-session answer store. Holds at most one answer per question id; a
/// second selection for the same question replaces the prior value in place
/// and keeps the original position, never appends.
#[derive(Debug, Default, Clone)]
pub struct AnswerSheet {
    answers: Vec<Answer>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, replacing any prior answer for the same question.
    pub fn record(&mut self, answer: Answer) {
        match self
            .answers
            .iter_mut()
            .find(|existing| existing.question_id == answer.question_id)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|answer| answer.question_id == question_id)
    }

    pub fn has_answer(&self, question_id: &str) -> bool {
        self.get(question_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }
}
