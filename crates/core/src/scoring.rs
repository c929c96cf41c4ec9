//! Scoring module - clear scoring and descent timing
//!
//! A clear of `n` tiles scores `n + (n - 3)^2`: three tiles score 3, every
//! tile beyond that adds a growing bonus. The descent interval shrinks each
//! round by `1 - 0.9^round` seconds and is floored at the configured minimum.

use std::time::Duration;

use crate::types::{DESCENT_DECAY, MIN_RUN};

/// Score for clearing `count` tiles in one pass
pub fn clear_score(count: usize) -> u32 {
    let extra = count.saturating_sub(MIN_RUN) as u32;
    (count as u32).saturating_add(extra.saturating_mul(extra))
}

/// Descent interval for `round`, given the base interval and floor
pub fn descent_interval(round: u32, base: Duration, min: Duration) -> Duration {
    let speed_up = 1.0 - DESCENT_DECAY.powi(round.min(i32::MAX as u32) as i32);
    let speed_up = Duration::from_nanos((speed_up * 1e9).round() as u64);
    base.saturating_sub(speed_up).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_score() {
        assert_eq!(clear_score(3), 3);
        assert_eq!(clear_score(4), 5);
        assert_eq!(clear_score(5), 9);
        assert_eq!(clear_score(6), 15);
        // A full grid
        assert_eq!(clear_score(96), 96 + 93 * 93);
    }

    #[test]
    fn test_descent_interval_round_zero_is_base() {
        let base = Duration::from_millis(700);
        let min = Duration::from_millis(100);
        assert_eq!(descent_interval(0, base, min), base);
    }

    #[test]
    fn test_descent_interval_shrinks_then_floors() {
        let base = Duration::from_millis(700);
        let min = Duration::from_millis(100);

        let r1 = descent_interval(1, base, min);
        assert_eq!(r1, Duration::from_millis(600));

        let r3 = descent_interval(3, base, min);
        assert!(r3 < r1);
        assert!(r3 > min);

        assert_eq!(descent_interval(12, base, min), min);
        assert_eq!(descent_interval(u32::MAX, base, min), min);
    }
}
