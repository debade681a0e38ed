use chrono::NaiveDate;
use serde::Serialize;

/// Vote sub-score cap.
pub const VOTE_SCORE_MAX: i64 = 60;
/// Staleness sub-score cap.
pub const STALE_SCORE_MAX: i64 = 40;
/// Composite score cap.
pub const TOTAL_SCORE_MAX: i64 = 100;

/// Derived score breakdown for one entry. Never persisted — recomputed from
/// the live vote count and `last_activity_date` on every read, so displayed
/// scores can never drift from ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSnapshot {
    pub votes: i64,
    pub days_stale: i64,
    pub vote_score: i64,
    pub stale_score: i64,
    pub total_score: i64,
}

/// Computes the abandonment score for an entry.
///
/// - `vote_score = min(60, round(20 * log2(1 + votes)))` — saturates once
///   an entry has 7 votes.
/// - `stale_score = min(40, floor(days_stale / 7))` — one point per full
///   week without activity, saturating at 280 days. A `last_activity_date`
///   in the future yields a stale score of 0, not a negative term;
///   `days_stale` itself is reported unclamped.
/// - `total_score = min(100, vote_score + stale_score)`.
///
/// Pure function: no state, no I/O, safe to call concurrently.
pub fn compute(votes: i64, last_activity_date: NaiveDate, today: NaiveDate) -> ScoreSnapshot {
    let days_stale = (today - last_activity_date).num_days();

    let vote_score = (20.0 * (1.0 + votes as f64).log2()).round() as i64;
    let vote_score = vote_score.min(VOTE_SCORE_MAX);

    // div_euclid floors toward negative infinity, so a future date would
    // drive the quotient negative; the lower clamp keeps it out of the sum.
    let stale_score = days_stale.div_euclid(7).clamp(0, STALE_SCORE_MAX);

    let total_score = (vote_score + stale_score).min(TOTAL_SCORE_MAX);

    ScoreSnapshot {
        votes,
        days_stale,
        vote_score,
        stale_score,
        total_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_zero_votes_same_day_scores_zero() {
        let today = d(2024, 6, 1);
        let snap = compute(0, today, today);
        assert_eq!(snap.vote_score, 0);
        assert_eq!(snap.stale_score, 0);
        assert_eq!(snap.total_score, 0);
    }

    #[test]
    fn test_vote_score_saturates_at_seven_votes() {
        let today = d(2024, 6, 1);
        // 20 * log2(8) = 60 exactly
        assert_eq!(compute(7, today, today).vote_score, 60);
        assert!(compute(6, today, today).vote_score < 60);
        // well past saturation stays pinned
        assert_eq!(compute(10_000, today, today).vote_score, 60);
    }

    #[test]
    fn test_stale_score_saturates_at_280_days() {
        let today = d(2024, 6, 1);
        let at_280 = today.checked_sub_days(Days::new(280)).unwrap();
        let at_273 = today.checked_sub_days(Days::new(273)).unwrap();
        assert_eq!(compute(0, at_280, today).stale_score, 40);
        assert_eq!(compute(5, at_280, today).stale_score, 40);
        assert_eq!(compute(0, at_273, today).stale_score, 39);
    }

    #[test]
    fn test_one_point_per_full_week() {
        let today = d(2024, 6, 1);
        let six_days = today.checked_sub_days(Days::new(6)).unwrap();
        let seven_days = today.checked_sub_days(Days::new(7)).unwrap();
        assert_eq!(compute(0, six_days, today).stale_score, 0);
        assert_eq!(compute(0, seven_days, today).stale_score, 1);
    }

    #[test]
    fn test_monotonic_in_votes() {
        let today = d(2024, 6, 1);
        let last = d(2023, 12, 1);
        let mut prev = compute(0, last, today).total_score;
        for votes in 1..=50 {
            let total = compute(votes, last, today).total_score;
            assert!(total >= prev, "score dropped at {votes} votes");
            prev = total;
        }
    }

    #[test]
    fn test_total_capped_at_100() {
        let today = d(2024, 6, 1);
        let ancient = d(2015, 1, 1);
        let snap = compute(1_000_000, ancient, today);
        assert_eq!(snap.vote_score, 60);
        assert_eq!(snap.stale_score, 40);
        assert_eq!(snap.total_score, 100);
    }

    #[test]
    fn test_future_activity_date_clamps_stale_score() {
        let today = d(2024, 6, 1);
        let future = d(2024, 7, 1);
        let snap = compute(3, future, today);
        assert_eq!(snap.days_stale, -30);
        assert_eq!(snap.stale_score, 0);
        assert_eq!(snap.total_score, snap.vote_score);
    }
}
