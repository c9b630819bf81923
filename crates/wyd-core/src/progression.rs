use crate::types::LevelUpPolicy;
use serde::{Deserialize, Serialize};

/// Highest reachable level. XP keeps accumulating once it is reached.
pub const MAX_LEVEL: u32 = 10_000;

/// Level, experience and currency for the signed-in user.
///
/// Totals are `u64` so that rewards piling up above the threshold under the
/// single-step policy are never clipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u64,
    #[serde(rename = "xpToNextLevel")]
    pub xp_to_next_level: u64,
    pub coins: u64,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(1, 100)
    }
}

impl Progression {
    pub fn new(level: u32, xp_to_next_level: u32) -> Self {
        Self {
            level: level.clamp(1, MAX_LEVEL),
            xp: 0,
            xp_to_next_level: u64::from(xp_to_next_level.max(1)),
            coins: 0,
        }
    }

    /// Add a reward and apply level-ups according to `policy`.
    ///
    /// Returns how many levels were gained. The XP remainder is always kept.
    pub fn grant(&mut self, xp: u32, coins: u32, policy: LevelUpPolicy) -> u32 {
        self.xp += u64::from(xp);
        self.coins += u64::from(coins);

        let mut gained = 0;
        while self.xp >= self.xp_to_next_level {
            if self.level >= MAX_LEVEL {
                tracing::debug!(xp = self.xp, "level cap reached; xp kept");
                break;
            }
            self.xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = next_threshold(self.xp_to_next_level);
            gained += 1;
            if policy == LevelUpPolicy::Single {
                break;
            }
        }
        gained
    }

    /// Progress toward the next level, 0..=100.
    pub fn percent_to_next(&self) -> u32 {
        let pct = u128::from(self.xp) * 100 / u128::from(self.xp_to_next_level.max(1));
        pct.min(100) as u32
    }
}

/// `floor(threshold * 1.5)`, never below 1.
pub fn next_threshold(threshold: u64) -> u64 {
    (threshold.saturating_mul(3) / 2).max(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_up_carries_remainder() {
        let mut p = Progression {
            level: 1,
            xp: 80,
            xp_to_next_level: 100,
            coins: 0,
        };
        let gained = p.grant(30, 0, LevelUpPolicy::Single);
        assert_eq!(gained, 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 10);
        assert_eq!(p.xp_to_next_level, 150);
    }

    #[test]
    fn no_level_up_below_threshold() {
        let mut p = Progression::default();
        assert_eq!(p.grant(99, 3, LevelUpPolicy::Single), 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp, 99);
        assert_eq!(p.coins, 3);
    }

    #[test]
    fn exact_threshold_levels_up_to_zero() {
        let mut p = Progression::default();
        p.grant(100, 0, LevelUpPolicy::Single);
        assert_eq!((p.level, p.xp, p.xp_to_next_level), (2, 0, 150));
    }

    #[test]
    fn single_policy_stops_after_one_level() {
        let mut p = Progression::default();
        let gained = p.grant(400, 0, LevelUpPolicy::Single);
        assert_eq!(gained, 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 300);
        assert_eq!(p.xp_to_next_level, 150);
    }

    #[test]
    fn cascade_policy_spans_levels() {
        let mut p = Progression::default();
        // 400 - 100 = 300; 300 - 150 = 150; 150 < 225
        let gained = p.grant(400, 0, LevelUpPolicy::Cascade);
        assert_eq!(gained, 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 150);
        assert_eq!(p.xp_to_next_level, 225);
    }

    #[test]
    fn threshold_floors_and_stays_positive() {
        assert_eq!(next_threshold(150), 225);
        assert_eq!(next_threshold(225), 337);
        assert_eq!(next_threshold(1), 1);
    }

    #[test]
    fn percent_is_capped() {
        let p = Progression {
            level: 2,
            xp: 300,
            xp_to_next_level: 150,
            coins: 0,
        };
        assert_eq!(p.percent_to_next(), 100);
        assert_eq!(Progression::default().percent_to_next(), 0);
    }

    #[test]
    fn large_rewards_are_not_clipped() {
        let mut p = Progression::default();
        let reward = 4_000_000_000u32;
        p.grant(reward, reward, LevelUpPolicy::Single);
        p.grant(reward, reward, LevelUpPolicy::Single);

        // Two single-step level-ups: 100 then 150 consumed by thresholds.
        assert_eq!(p.level, 3);
        assert_eq!(p.xp + 100 + 150, 2 * u64::from(reward));
        assert_eq!(p.coins, 2 * u64::from(reward));
    }

    #[test]
    fn level_stops_at_cap_and_keeps_xp() {
        let mut p = Progression::new(u32::MAX, 100);
        assert_eq!(p.level, MAX_LEVEL);
        assert_eq!(p.grant(100, 0, LevelUpPolicy::Cascade), 0);
        assert_eq!(p.level, MAX_LEVEL);
        assert_eq!(p.xp, 100);
        assert_eq!(p.xp_to_next_level, 100);
    }

    #[test]
    fn threshold_saturates_instead_of_wrapping() {
        assert_eq!(next_threshold(u64::MAX), u64::MAX / 2);
    }
}
