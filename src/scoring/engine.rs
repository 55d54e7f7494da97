use uuid::Uuid;

use super::status::Status;
use crate::records::{RecordKind, StudentRecord, BASE_SCORE};

/// Positive points beyond this total no longer raise the score.
pub const POSITIVE_CAP: u64 = 20;
pub const MIN_SCORE: u32 = 0;
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub base_score: u32,
    pub total_positive: u64,
    pub effective_positive: u64, // min(POSITIVE_CAP, total_positive)
    pub total_negative: u64,
    pub raw: i64, // Before clamping to MIN_SCORE..=MAX_SCORE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u32,
    pub status: Status,
    pub breakdown: ScoreBreakdown,
}

/// Fold a student's records into a score.
///
/// Order-independent and total: any collection, including an empty one,
/// produces a score in `0..=100`.
pub fn calculate_score<'a, I>(records: I) -> ScoreResult
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut total_positive: u64 = 0;
    let mut total_negative: u64 = 0;

    for record in records {
        match record.kind {
            RecordKind::Positive => {
                total_positive = total_positive.saturating_add(record.points as u64)
            }
            RecordKind::Negative => {
                total_negative = total_negative.saturating_add(record.points as u64)
            }
        }
    }

    let effective_positive = total_positive.min(POSITIVE_CAP);
    let raw = (BASE_SCORE as i64)
        .saturating_add(effective_positive as i64)
        .saturating_sub(total_negative.min(i64::MAX as u64) as i64);
    let score = raw.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u32;

    ScoreResult {
        score,
        status: Status::from_score(score),
        breakdown: ScoreBreakdown {
            base_score: BASE_SCORE,
            total_positive,
            effective_positive,
            total_negative,
            raw,
        },
    }
}

/// Score one student out of a mixed record list.
pub fn score_for_student(student_id: Uuid, records: &[StudentRecord]) -> ScoreResult {
    calculate_score(records.iter().filter(|r| r.student_id == student_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    const NO_RECORDS: &[StudentRecord] = &[];

    fn record(kind: RecordKind, points: u32) -> StudentRecord {
        StudentRecord {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            kind,
            date: Utc::now(),
            details: "test".to_string(),
            points,
            observer: "Counselor".to_string(),
            procedure_applied: None,
            violation_id: None,
        }
    }

    fn positive(points: u32) -> StudentRecord {
        record(RecordKind::Positive, points)
    }

    fn negative(points: u32) -> StudentRecord {
        record(RecordKind::Negative, points)
    }

    #[test]
    fn test_empty_records_score_base() {
        let result = calculate_score(NO_RECORDS);
        assert_eq!(result.score, 80);
        assert_eq!(result.status, Status::Distinguished);
    }

    #[test]
    fn test_negative_deducts() {
        let result = calculate_score(&[negative(10)]);
        assert_eq!(result.score, 70);
        assert_eq!(result.status, Status::NeedsImprovement);
    }

    #[test]
    fn test_positive_capped_at_twenty() {
        let records = vec![positive(15), positive(15)];
        let result = calculate_score(&records);
        assert_eq!(result.score, 100);
        assert_eq!(result.breakdown.total_positive, 30);
        assert_eq!(result.breakdown.effective_positive, 20);
    }

    #[test]
    fn test_cap_applies_before_deductions() {
        // 80 + min(20, 30) - 10 = 90, not 80 + 30 - 10 clamped
        let records = vec![positive(30), negative(10)];
        assert_eq!(calculate_score(&records).score, 90);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let result = calculate_score(&[negative(200)]);
        assert_eq!(result.score, 0);
        assert_eq!(result.breakdown.raw, -120);
        assert_eq!(result.status, Status::NeedsCloseFollowUp);
    }

    #[test]
    fn test_concrete_scenario() {
        let mut records: Vec<StudentRecord> = Vec::new();
        assert_eq!(calculate_score(&records).score, 80);

        records.push(negative(10));
        let result = calculate_score(&records);
        assert_eq!(result.score, 70);
        assert_eq!(result.status, Status::NeedsImprovement);

        records.push(positive(15));
        let result = calculate_score(&records);
        assert_eq!(result.score, 85);
        assert_eq!(result.status, Status::Distinguished);
    }

    #[test]
    fn test_score_for_student_filters_others() {
        let me = Uuid::new_v4();
        let mut mine = negative(5);
        mine.student_id = me;
        let mut theirs = negative(50);
        theirs.student_id = Uuid::new_v4();
        let result = score_for_student(me, &[mine, theirs]);
        assert_eq!(result.score, 75);
    }

    #[test]
    fn test_huge_point_totals_do_not_overflow() {
        let records = vec![negative(u32::MAX), negative(u32::MAX), positive(u32::MAX)];
        assert_eq!(calculate_score(&records).score, 0);
    }

    fn arb_record() -> impl Strategy<Value = StudentRecord> {
        (any::<bool>(), 0u32..60).prop_map(|(is_positive, points)| {
            if is_positive {
                positive(points)
            } else {
                negative(points)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_score_within_bounds(records in prop::collection::vec(arb_record(), 0..40)) {
            let result = calculate_score(&records);
            prop_assert!(result.score <= MAX_SCORE);
        }

        #[test]
        fn prop_order_independent(records in prop::collection::vec(arb_record(), 0..40)) {
            let mut reversed = records.clone();
            reversed.reverse();
            prop_assert_eq!(calculate_score(&records).score, calculate_score(&reversed).score);
        }

        #[test]
        fn prop_single_positive(p in 0u32..200) {
            let expected = (80 + p.min(20)).min(100);
            prop_assert_eq!(calculate_score(&[positive(p)]).score, expected);
        }

        #[test]
        fn prop_negative_never_increases(
            records in prop::collection::vec(arb_record(), 0..30),
            n in 0u32..60,
        ) {
            let before = calculate_score(&records).score;
            let mut after = records.clone();
            after.push(negative(n));
            prop_assert!(calculate_score(&after).score <= before);
        }

        #[test]
        fn prop_positive_never_decreases(
            records in prop::collection::vec(arb_record(), 0..30),
            p in 0u32..60,
        ) {
            let before = calculate_score(&records).score;
            let mut after = records.clone();
            after.push(positive(p));
            prop_assert!(calculate_score(&after).score >= before);
        }

        #[test]
        fn prop_positive_cap_is_idempotent(
            records in prop::collection::vec(arb_record(), 0..30),
            x in 0u32..60,
        ) {
            let mut saturated = records.clone();
            saturated.push(positive(20));
            let before = calculate_score(&saturated).score;
            saturated.push(positive(x));
            prop_assert_eq!(calculate_score(&saturated).score, before);
        }

        #[test]
        fn prop_round_trip_matches_signed_contribution(
            records in prop::collection::vec(arb_record(), 0..30),
            added in arb_record(),
        ) {
            let prior = calculate_score(&records).breakdown;
            let mut all = records.clone();
            all.push(added.clone());

            let (pos, neg) = if added.is_positive() {
                (prior.total_positive + added.points as u64, prior.total_negative)
            } else {
                (prior.total_positive, prior.total_negative + added.points as u64)
            };
            let expected = (80 + pos.min(20) as i64 - neg as i64).clamp(0, 100) as u32;
            prop_assert_eq!(calculate_score(&all).score, expected);
        }
    }
}
