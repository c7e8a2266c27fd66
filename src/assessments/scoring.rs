use super::domain::{Answer, InterpretationRange, ScoringMethod};

/// Compute the numeric score for a set of recorded answers.
///
/// Pure over its inputs: recomputing from the same unmodified answers always
/// yields the same value. Unanswered questions simply do not appear in the
/// slice, so `Average` divides by the answered count, not the question count.
/// An empty slice scores 0.0 under every method.
pub fn compute_score(answers: &[Answer], method: ScoringMethod) -> f64 {
    match method {
        ScoringMethod::Total => answers.iter().map(|answer| answer.value).sum(),
        ScoringMethod::Average => {
            if answers.is_empty() {
                return 0.0;
            }
            let sum: f64 = answers.iter().map(|answer| answer.value).sum();
            sum / answers.len() as f64
        }
        ScoringMethod::Weighted => answers
            .iter()
            .map(|answer| answer.value * answer.weight)
            .sum(),
    }
}

/// Resolve a score against authored ranges.
///
/// The first range in authored order containing the score wins, which is the
/// deterministic tie-break for overlapping ranges. `None` means the caller
/// shows the raw score without a band label.
pub fn resolve_interpretation(
    score: f64,
    ranges: &[InterpretationRange],
) -> Option<&InterpretationRange> {
    ranges.iter().find(|range| range.contains(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(question_id: &str, value: f64, weight: f64) -> Answer {
        Answer {
            question_id: question_id.to_string(),
            value,
            weight,
        }
    }

    fn range(min: f64, max: f64, label: &str) -> InterpretationRange {
        InterpretationRange {
            min_score: min,
            max_score: max,
            label: label.to_string(),
            severity: label.to_lowercase(),
            color: "#cccccc".to_string(),
        }
    }

    #[test]
    fn total_sums_values_independent_of_order() {
        let forward = [answer("q1", 2.0, 1.0), answer("q2", 1.0, 1.0)];
        let reversed = [answer("q2", 1.0, 1.0), answer("q1", 2.0, 1.0)];

        assert_eq!(compute_score(&forward, ScoringMethod::Total), 3.0);
        assert_eq!(compute_score(&reversed, ScoringMethod::Total), 3.0);
    }

    #[test]
    fn average_divides_by_answered_count() {
        let answers = [answer("q1", 2.0, 1.0), answer("q2", 4.0, 1.0)];
        assert_eq!(compute_score(&answers, ScoringMethod::Average), 3.0);
    }

    #[test]
    fn average_over_zero_answers_is_zero() {
        assert_eq!(compute_score(&[], ScoringMethod::Average), 0.0);
    }

    #[test]
    fn weighted_multiplies_each_value_by_its_weight() {
        let answers = [answer("q1", 2.0, 3.0), answer("q2", 1.0, 1.0)];
        assert_eq!(compute_score(&answers, ScoringMethod::Weighted), 7.0);
    }

    #[test]
    fn weighted_defaults_align_with_total_when_weight_is_one() {
        let answers = [answer("q1", 2.0, 1.0), answer("q2", 1.0, 1.0)];
        assert_eq!(
            compute_score(&answers, ScoringMethod::Weighted),
            compute_score(&answers, ScoringMethod::Total)
        );
    }

    #[test]
    fn interpretation_first_match_wins_on_overlap() {
        let ranges = [range(0.0, 10.0, "A"), range(5.0, 15.0, "B")];
        let resolved = resolve_interpretation(7.0, &ranges).expect("7 falls in both ranges");
        assert_eq!(resolved.label, "A");
    }

    #[test]
    fn interpretation_bounds_are_inclusive() {
        let ranges = [range(0.0, 2.0, "Low"), range(3.0, 5.0, "Moderate")];
        assert_eq!(
            resolve_interpretation(2.0, &ranges).map(|r| r.label.as_str()),
            Some("Low")
        );
        assert_eq!(
            resolve_interpretation(3.0, &ranges).map(|r| r.label.as_str()),
            Some("Moderate")
        );
    }

    #[test]
    fn interpretation_returns_none_outside_all_ranges() {
        let ranges = [range(0.0, 2.0, "Low")];
        assert!(resolve_interpretation(9.0, &ranges).is_none());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let answers = [answer("q1", 2.0, 2.0), answer("q2", 1.0, 1.0)];
        let ranges = [range(0.0, 10.0, "Low")];

        let first = compute_score(&answers, ScoringMethod::Weighted);
        let second = compute_score(&answers, ScoringMethod::Weighted);
        assert_eq!(first, second);

        let first_band = resolve_interpretation(first, &ranges).map(|r| r.label.clone());
        let second_band = resolve_interpretation(second, &ranges).map(|r| r.label.clone());
        assert_eq!(first_band, second_band);
    }
}
