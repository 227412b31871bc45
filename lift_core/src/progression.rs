//! Progressive overload rule.
//!
//! Next week's weight is based on the heaviest working set of a session:
//! - Target reps hit on every working set: add 2.5%
//! - Otherwise: keep the same weight

use crate::SetEntry;

/// Multiplier applied when the target was met
pub const PROGRESSION_FACTOR: f64 = 1.025;

/// Round to two decimal places
///
/// Rounds the exact binary value, so `9.0 * 1.025` (stored just below
/// 9.225) gives 9.22. Values sitting exactly on a half cent go away from
/// zero.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // A half-cent tie is representable only as an odd multiple of 1/8,
    // and scaling those by 100 is exact.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return (value * 100.0).round() / 100.0;
    }

    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Weight to use next time for a single set outcome
pub fn next_weight(weight: f64, hit_target: bool) -> f64 {
    if hit_target {
        round2(weight * PROGRESSION_FACTOR)
    } else {
        round2(weight)
    }
}

/// Recommend next week's weight from parallel weight/reps lists
///
/// Zero-weight sets are ignored. Returns 0 when there are no working sets.
/// Pairs beyond the shorter of the two lists are dropped.
pub fn recommend(weights: &[f64], reps: &[u32], target_reps: u32) -> f64 {
    let working: Vec<(f64, u32)> = weights
        .iter()
        .copied()
        .zip(reps.iter().copied())
        .filter(|(w, _)| *w > 0.0)
        .collect();

    if working.is_empty() {
        tracing::debug!("No working sets, nothing to recommend");
        return 0.0;
    }

    let top_weight = working
        .iter()
        .map(|(w, _)| *w)
        .fold(f64::MIN, f64::max);
    let hit_all = working.iter().all(|(_, r)| *r >= target_reps);

    let recommended = next_weight(top_weight, hit_all);
    tracing::debug!(
        "Top working set {} ({} sets, target {} hit: {}) -> {}",
        top_weight,
        working.len(),
        target_reps,
        hit_all,
        recommended
    );
    recommended
}

/// Recommend next week's weight from a session's logged sets
pub fn recommend_for_sets(sets: &[SetEntry], target_reps: u32) -> f64 {
    let weights: Vec<f64> = sets.iter().map(|s| s.weight).collect();
    let reps: Vec<u32> = sets.iter().map(|s| s.reps).collect();
    recommend(&weights, &reps, target_reps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(recommend(&[], &[], 10), 0.0);
    }

    #[test]
    fn test_zero_weight_sets_ignored() {
        assert_eq!(recommend(&[0.0, 0.0], &[5, 5], 10), 0.0);
        // Warm-up at zero doesn't fail the target
        assert_eq!(recommend(&[0.0, 100.0], &[3, 10], 10), 102.5);
    }

    #[test]
    fn test_target_met_adds_two_and_a_half_percent() {
        assert_eq!(recommend(&[135.0], &[10], 10), 138.38);
        assert_eq!(recommend(&[100.0, 100.0, 100.0], &[10, 10, 10], 10), 102.5);
    }

    #[test]
    fn test_target_missed_keeps_top_weight() {
        assert_eq!(recommend(&[135.0, 140.0], &[10, 9], 10), 140.0);
    }

    #[test]
    fn test_zero_rep_working_set_fails_target() {
        assert_eq!(recommend(&[100.0, 100.0], &[10, 0], 10), 100.0);
    }

    #[test]
    fn test_uses_heaviest_set_not_last() {
        // Back-off set at lower weight still hits the target
        assert_eq!(recommend(&[200.0, 150.0], &[12, 15], 10), 205.0);
    }

    #[test]
    fn test_exceeding_target_counts_as_hit() {
        assert_eq!(recommend(&[60.0], &[12], 8), 61.5);
    }

    #[test]
    fn test_mismatched_lengths_use_pairs_only() {
        assert_eq!(recommend(&[100.0, 300.0], &[10], 10), 102.5);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(138.375), 138.38);
        assert_eq!(round2(140.0), 140.0);
        assert_eq!(round2(52.123), 52.12);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_products_just_below_half_cent_round_down() {
        // 9 * 1.025 is stored as 9.22499999...
        assert_eq!(recommend(&[9.0], &[10], 10), 9.22);
        assert_eq!(recommend(&[29.0], &[10], 10), 29.72);
        assert_eq!(recommend(&[3.0], &[10], 10), 3.07);
        assert_eq!(recommend(&[43.0], &[10], 10), 44.07);
        assert_eq!(next_weight(13.0, true), 13.32);
    }

    #[test]
    fn test_recommend_for_sets_matches_lists() {
        let sets = vec![
            SetEntry::new(135.0, 10),
            SetEntry::new(135.0, 10),
            SetEntry::new(135.0, 8),
        ];
        assert_eq!(recommend_for_sets(&sets, 10), 135.0);
        assert_eq!(recommend_for_sets(&sets, 8), 138.38);
    }
}
