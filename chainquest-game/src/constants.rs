//! Engine tuning constants
//!
//! Centralized so balance changes touch one file. Reward and penalty
//! tables are pure functions of quest difficulty; nothing here is
//! randomized.

use crate::story::Difficulty;

/// Starting and maximum energy for a freshly minted pioneer.
pub const START_ENERGY: i32 = 100;

/// Reputation gained on any successful quest, regardless of tier.
pub const SUCCESS_REPUTATION: i32 = 10;

/// Score awarded for completing a quest of the given tier.
#[must_use]
pub const fn score_reward(difficulty: Difficulty) -> i64 {
    match difficulty {
        Difficulty::Easy => 100,
        Difficulty::Medium => 200,
        Difficulty::Hard => 300,
        Difficulty::Legendary => 500,
    }
}

/// Energy burned on a failed validation attempt.
#[must_use]
pub const fn failure_energy_penalty(difficulty: Difficulty) -> i32 {
    match difficulty {
        Difficulty::Easy => 5,
        Difficulty::Medium => 10,
        Difficulty::Hard => 15,
        Difficulty::Legendary => 25,
    }
}

/// Reputation lost on a failed validation attempt.
#[must_use]
pub const fn failure_reputation_penalty(difficulty: Difficulty) -> i32 {
    match difficulty {
        Difficulty::Easy => 1,
        Difficulty::Medium => 2,
        Difficulty::Hard => 3,
        Difficulty::Legendary => 5,
    }
}
