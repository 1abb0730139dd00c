//! Resource ledger: energy, score, and reputation accounting
//!
//! The ledger is the sole owner of the three player resources. Clamping,
//! not error, is the policy on under/overflow: energy stays in
//! `[0, max_energy]`, reputation and score never go negative. The one
//! exception is [`ResourceLedger::apply_cost`], where paying a cost the
//! caller never checked is a programming error and fails instead of
//! clamping.

use serde::{Deserialize, Serialize};

use crate::constants::START_ENERGY;
use crate::error::EngineError;

/// Player resource state mutated only by the progression controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub energy: i32,
    pub max_energy: i32,
    pub score: i64,
    pub reputation: i32,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self {
            energy: START_ENERGY,
            max_energy: START_ENERGY,
            score: 0,
            reputation: 0,
        }
    }
}

impl ResourceLedger {
    /// Ledger with explicit starting values, clamped into the valid range.
    #[must_use]
    pub fn with_start(energy: i32, max_energy: i32, reputation: i32) -> Self {
        let max_energy = max_energy.max(0);
        Self {
            energy: energy.clamp(0, max_energy),
            max_energy,
            score: 0,
            reputation: reputation.max(0),
        }
    }

    /// True iff the current energy covers `cost`.
    #[must_use]
    pub const fn can_afford(&self, cost: i32) -> bool {
        self.energy >= cost
    }

    /// Deduct a quest's energy cost.
    ///
    /// Callers must gate on [`Self::can_afford`] first.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientResource` when the cost is not payable; the
    /// ledger is left unchanged.
    pub fn apply_cost(&mut self, cost: i32) -> Result<(), EngineError> {
        if !self.can_afford(cost) {
            return Err(EngineError::InsufficientResource {
                required: cost,
                available: self.energy,
            });
        }
        self.energy = (self.energy - cost).max(0);
        Ok(())
    }

    /// Credit a successful quest: score accumulates, reputation clamps at 0.
    pub fn apply_success(&mut self, score_delta: i64, reputation_delta: i32) {
        self.score = self.score.saturating_add(score_delta.max(0));
        self.reputation = self.reputation.saturating_add(reputation_delta).max(0);
    }

    /// Debit a failed attempt; both channels clamp at 0.
    pub fn apply_failure(&mut self, energy_penalty: i32, reputation_penalty: i32) {
        self.energy = (self.energy - energy_penalty.max(0)).max(0);
        self.reputation = (self.reputation - reputation_penalty.max(0)).max(0);
    }

    /// Restore energy (host-driven regeneration), clamped at `max_energy`.
    pub fn restore(&mut self, amount: i32) {
        self.energy = self
            .energy
            .saturating_add(amount.max(0))
            .min(self.max_energy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ledger_starts_full() {
        let ledger = ResourceLedger::default();
        assert_eq!(ledger.energy, 100);
        assert_eq!(ledger.max_energy, 100);
        assert_eq!(ledger.score, 0);
        assert_eq!(ledger.reputation, 0);
    }

    #[test]
    fn apply_cost_requires_affordability() {
        let mut ledger = ResourceLedger::with_start(5, 100, 0);
        let err = ledger.apply_cost(10).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientResource {
                required: 10,
                available: 5
            }
        );
        assert_eq!(ledger.energy, 5, "failed cost must not deduct");

        ledger.apply_cost(5).unwrap();
        assert_eq!(ledger.energy, 0);
    }

    #[test]
    fn failure_penalties_clamp_at_zero() {
        let mut ledger = ResourceLedger::with_start(3, 100, 1);
        ledger.apply_failure(10, 4);
        assert_eq!(ledger.energy, 0);
        assert_eq!(ledger.reputation, 0);
    }

    #[test]
    fn success_clamps_negative_reputation_delta() {
        let mut ledger = ResourceLedger::default();
        ledger.apply_success(100, -5);
        assert_eq!(ledger.score, 100);
        assert_eq!(ledger.reputation, 0);

        ledger.apply_success(-50, 10);
        assert_eq!(ledger.score, 100, "negative score deltas are ignored");
        assert_eq!(ledger.reputation, 10);
    }

    #[test]
    fn restore_clamps_at_max_energy() {
        let mut ledger = ResourceLedger::with_start(90, 100, 0);
        ledger.restore(25);
        assert_eq!(ledger.energy, 100);
        ledger.restore(-10);
        assert_eq!(ledger.energy, 100, "negative restore amounts are ignored");
    }
}
