//! Tail unlocks derived from total level.
//!
//! The companion starts with one tail. Each threshold in
//! [`TAIL_THRESHOLDS`] grants another, but only as a contiguous prefix:
//! thresholds are checked in order and scanning stops at the first one not
//! met. The result is clamped to `1..=9`.

/// Total-level thresholds for tails 2 through 9 (the ninth entry only
/// matters for the clamp).
pub const TAIL_THRESHOLDS: [u32; 9] = [9, 50, 100, 200, 350, 500, 650, 800, 891];

/// Maximum tail count.
pub const MAX_TAILS: u32 = 9;

/// Number of tails unlocked at `total_level`.
pub fn unlocked_tails(total_level: u32) -> u32 {
    let met = TAIL_THRESHOLDS
        .iter()
        .take_while(|&&threshold| total_level >= threshold)
        .count();
    let met = u32::try_from(met).unwrap_or(MAX_TAILS);
    met.saturating_add(1).clamp(1, MAX_TAILS)
}

/// Total level at which the next tail unlocks, or `None` with all nine.
pub fn next_tail_threshold(tails: u32) -> Option<u32> {
    if tails >= MAX_TAILS {
        return None;
    }
    let idx = usize::try_from(tails.saturating_sub(1)).ok()?;
    TAIL_THRESHOLDS.get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_examples() {
        assert_eq!(unlocked_tails(8), 1);
        assert_eq!(unlocked_tails(9), 2);
        assert_eq!(unlocked_tails(891), 9);
    }

    #[test]
    fn boundaries() {
        assert_eq!(unlocked_tails(0), 1);
        assert_eq!(unlocked_tails(49), 2);
        assert_eq!(unlocked_tails(50), 3);
        assert_eq!(unlocked_tails(199), 4);
        assert_eq!(unlocked_tails(200), 5);
        assert_eq!(unlocked_tails(799), 8);
        assert_eq!(unlocked_tails(800), 9);
    }

    #[test]
    fn monotonic_and_bounded() {
        let mut previous = unlocked_tails(0);
        for total in 0..=1000 {
            let tails = unlocked_tails(total);
            assert!((1..=MAX_TAILS).contains(&tails));
            assert!(tails >= previous, "total {total}");
            previous = tails;
        }
    }

    #[test]
    fn next_threshold_follows_table() {
        assert_eq!(next_tail_threshold(1), Some(9));
        assert_eq!(next_tail_threshold(2), Some(50));
        assert_eq!(next_tail_threshold(8), Some(800));
        assert_eq!(next_tail_threshold(9), None);
    }
}
