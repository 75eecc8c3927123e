//! Reward rule for quests.

use questboard_core::rng::DeterministicRng;

/// Amount awarded per character of the quest name, before scaling.
pub const DEFAULT_AMOUNT_PER_CHAR: u64 = 100;

/// Inclusive bounds of the random scaling factor.
pub const DEFAULT_FACTOR_RANGE: (u32, u32) = (0, 10);

/// Computes a quest's reward: name length × amount per char × factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRule {
    /// Amount per character of the quest name.
    pub amount_per_char: u64,
    /// Smallest factor that can be drawn.
    pub min_factor: u32,
    /// Largest factor that can be drawn.
    pub max_factor: u32,
}

impl Default for RewardRule {
    fn default() -> Self {
        Self {
            amount_per_char: DEFAULT_AMOUNT_PER_CHAR,
            min_factor: DEFAULT_FACTOR_RANGE.0,
            max_factor: DEFAULT_FACTOR_RANGE.1,
        }
    }
}

impl RewardRule {
    /// Draws a scaling factor within the rule's bounds.
    pub fn draw_factor(&self, rng: &mut dyn DeterministicRng) -> u32 {
        rng.next_u32_range(self.min_factor, self.max_factor)
    }

    /// Reward for `quest` at a given `factor`. Saturates instead of overflowing.
    #[must_use]
    pub fn reward(&self, quest: &str, factor: u32) -> u64 {
        let length = u64::try_from(quest.chars().count()).unwrap_or(u64::MAX);
        length
            .saturating_mul(self.amount_per_char)
            .saturating_mul(u64::from(factor))
    }
}

#[cfg(test)]
mod tests {
    use questboard_test_support::{MockRng, SequenceRng};

    use super::*;

    #[test]
    fn test_reward_scales_with_name_length_and_factor() {
        let rule = RewardRule::default();

        assert_eq!(rule.reward("A", 3), 300);
        assert_eq!(rule.reward("BB", 3), 600);
        assert_eq!(rule.reward("CCC", 7), 2100);
    }

    #[test]
    fn test_zero_factor_yields_zero_reward() {
        let rule = RewardRule::default();

        assert_eq!(rule.reward("The Clockwork Gambit", 0), 0);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let rule = RewardRule::default();

        assert_eq!(rule.reward("Ærø", 1), 300);
    }

    #[test]
    fn test_draw_factor_uses_rule_bounds() {
        let rule = RewardRule {
            min_factor: 2,
            ..RewardRule::default()
        };

        assert_eq!(rule.draw_factor(&mut MockRng), 2);
        assert_eq!(rule.draw_factor(&mut SequenceRng::new(vec![9])), 9);
    }

    #[test]
    fn test_reward_saturates() {
        let rule = RewardRule {
            amount_per_char: u64::MAX,
            ..RewardRule::default()
        };

        assert_eq!(rule.reward("AB", 10), u64::MAX);
    }
}
