//! Player progress: the single value object the host owns
//!
//! One living instance per player session. The host application loads it
//! through a `ProgressStore`, hands it to the progression controller for
//! each action, and persists whatever comes back. Nothing in the engine
//! keeps global state.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::cards::Collection;
use crate::graph::Position;
use crate::ledger::ResourceLedger;
use crate::pioneer::PioneerStart;

/// Everything the engine knows about one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Pioneer type minted at game start; keys the story catalog.
    pub pioneer: String,
    #[serde(default)]
    pub position: Position,
    /// Quest ids completed successfully; guards against re-rewarding.
    #[serde(default)]
    pub completed: BTreeSet<String>,
    /// Quest ids explicitly skipped; counts as resolved for chapters.
    #[serde(default)]
    pub skipped: BTreeSet<String>,
    #[serde(default)]
    pub ledger: ResourceLedger,
    #[serde(default)]
    pub collection: Collection,
    /// Optional faction/guild membership.
    #[serde(default)]
    pub guild: Option<String>,
}

impl PlayerProgress {
    /// Fresh progress with default resources at the start position.
    #[must_use]
    pub fn new(pioneer: &str) -> Self {
        Self {
            pioneer: pioneer.to_string(),
            position: Position::START,
            completed: BTreeSet::new(),
            skipped: BTreeSet::new(),
            ledger: ResourceLedger::default(),
            collection: Collection::new(),
            guild: None,
        }
    }

    /// Fresh progress seeded with a pioneer type's starting resources.
    #[must_use]
    pub fn with_start(pioneer: &str, start: &PioneerStart) -> Self {
        Self {
            ledger: ResourceLedger::with_start(start.energy, start.max_energy, start.reputation),
            ..Self::new(pioneer)
        }
    }

    /// Whether a quest id has been completed or explicitly skipped.
    #[must_use]
    pub fn is_resolved(&self, quest_id: &str) -> bool {
        self.completed.contains(quest_id) || self.skipped.contains(quest_id)
    }

    pub fn join_guild(&mut self, guild: &str) {
        self.guild = Some(guild.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Position;

    #[test]
    fn fresh_progress_uses_defaults() {
        let progress = PlayerProgress::new("prospector");
        assert_eq!(progress.position, Position::START);
        assert_eq!(progress.ledger.energy, 100);
        assert!(progress.collection.is_empty());
        assert!(progress.guild.is_none());
        assert!(!progress.is_resolved("anything"));
    }

    #[test]
    fn with_start_applies_pioneer_resources() {
        let start = PioneerStart {
            energy: 80,
            max_energy: 120,
            reputation: 5,
        };
        let progress = PlayerProgress::with_start("archivist", &start);
        assert_eq!(progress.ledger.energy, 80);
        assert_eq!(progress.ledger.max_energy, 120);
        assert_eq!(progress.ledger.reputation, 5);
    }

    #[test]
    fn progress_round_trips_through_json() {
        let mut progress = PlayerProgress::new("prospector");
        progress.completed.insert("q1".to_string());
        progress.position = Position::new(1, 2);
        progress.join_guild("north-star");

        let json = serde_json::to_string(&progress).unwrap();
        let restored: PlayerProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, progress);
    }

    #[test]
    fn legacy_snapshots_without_new_fields_still_load() {
        let json = r#"{ "pioneer": "prospector" }"#;
        let restored: PlayerProgress = serde_json::from_str(json).unwrap();
        assert_eq!(restored, PlayerProgress::new("prospector"));
    }
}
