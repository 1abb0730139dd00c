//! Progression controller: one player action, end to end
//!
//! Every entry point here is a complete transaction over the supplied
//! `PlayerProgress`: the probe is consulted exactly once, before any
//! mutation, and all mutation happens on a scratch copy committed only
//! once the outcome is fully computed. An `Err` therefore leaves the
//! caller's progress byte-identical to what it was.
use smallvec::SmallVec;

use crate::cards::VisionCard;
use crate::constants::{
    SUCCESS_REPUTATION, failure_energy_penalty, failure_reputation_penalty, score_reward,
};
use crate::error::EngineError;
use crate::graph::{Position, StoryGraph};
use crate::ledger::ResourceLedger;
use crate::oracle::{self, AttemptContext, ExternalProbe, ProbeError, ProbeSnapshot};
use crate::progress::PlayerProgress;
use crate::story::Story;

/// Cards granted by one action: at most the quest reward plus a chapter
/// completion reward.
pub type GrantedCards = SmallVec<[VisionCard; 2]>;

/// What the presentation layer needs after each action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// Whether the validation check passed. Always true for fusion,
    /// always false for a skip.
    pub validated: bool,
    /// Resource snapshot after the action.
    pub resources: ResourceLedger,
    /// Collectibles granted by this action, in grant order.
    pub granted: GrantedCards,
    /// Graph position after the action.
    pub position: Position,
    /// Whether the overall story is now complete.
    pub story_complete: bool,
}

/// Attempt the current quest.
///
/// The full pipeline: resolve the active quest, gate on affordability,
/// read the probe, evaluate, then settle costs, rewards, and position.
/// A failed validation is an `Ok` outcome (penalties applied, position
/// held or reset); only the named error kinds return `Err`.
///
/// A quest already in `completed` (replayed after a catastrophic reset)
/// still charges its energy cost and advances the position, but awards
/// no score, reputation, or cards a second time.
///
/// # Errors
///
/// - `NoActiveQuest` once the story is complete.
/// - `InsufficientResource` when energy cannot cover the quest cost.
/// - `ValidationTimeout` / `ProbeUnavailable` when the probe read fails.
/// - `DuplicateReward` when story content grants a conflicting one-off
///   card (rejected before any mutation is committed).
pub fn attempt_quest<P: ExternalProbe>(
    story: &Story,
    progress: &mut PlayerProgress,
    ctx: &AttemptContext,
    probe: &P,
) -> Result<ActionOutcome, EngineError> {
    let graph = StoryGraph::new(story);
    let Some(quest) = graph.current_quest(progress.position) else {
        return Err(EngineError::NoActiveQuest);
    };
    if !progress.ledger.can_afford(quest.energy_cost) {
        return Err(EngineError::InsufficientResource {
            required: quest.energy_cost,
            available: progress.ledger.energy,
        });
    }

    // One atomic probe read, fully consumed before any mutation.
    let mut snapshot = ProbeSnapshot::new();
    if let Some(key) = quest.check.probe_key() {
        let value = probe.read(key).map_err(|err| match err {
            ProbeError::Timeout => EngineError::ValidationTimeout,
            ProbeError::Unavailable(reason) => EngineError::ProbeUnavailable { reason },
        })?;
        snapshot.insert(key.to_string(), value);
    }

    let validated = oracle::evaluate(quest, ctx, &snapshot);

    let mut next = progress.clone();
    let mut granted = GrantedCards::new();
    if validated {
        next.ledger.apply_cost(quest.energy_cost)?;
        // A quest replayed after a catastrophic reset still advances the
        // position, but its rewards were already settled the first time.
        let first_clear = next.completed.insert(quest.id.clone());
        if first_clear {
            next.ledger
                .apply_success(score_reward(quest.difficulty), SUCCESS_REPUTATION);
            next.collection.grant(quest.reward.clone())?;
            granted.push(quest.reward.clone());
        } else {
            log::debug!("quest '{}' re-cleared, advancing without rewards", quest.id);
        }

        let before = progress.position;
        next.position = graph.advance(before);
        if next.position.chapter != before.chapter
            && let Some(reward) = graph
                .chapter(before)
                .and_then(|ch| ch.completion_reward.as_ref())
            && !next.collection.contains(&reward.id)
        {
            next.collection.grant(reward.clone())?;
            granted.push(reward.clone());
        }
        log::debug!(
            "quest '{}' completed: position {:?} -> {:?}, score {}",
            quest.id,
            before,
            next.position,
            next.ledger.score
        );
    } else {
        next.ledger.apply_failure(
            failure_energy_penalty(quest.difficulty),
            failure_reputation_penalty(quest.difficulty),
        );
        if quest.catastrophic {
            log::warn!("catastrophic failure on quest '{}', resetting progress", quest.id);
            next.position = graph.reset();
        } else {
            log::debug!("quest '{}' failed validation, position held", quest.id);
        }
    }

    let outcome = ActionOutcome {
        validated,
        resources: next.ledger.clone(),
        granted,
        position: next.position,
        story_complete: graph.is_complete(next.position),
    };
    *progress = next;
    Ok(outcome)
}

/// Resolve the current quest by skipping it: free, rewardless, advances.
///
/// # Errors
///
/// - `NoActiveQuest` once the story is complete.
/// - `QuestNotSkippable` when the quest does not allow skipping.
pub fn skip_quest(
    story: &Story,
    progress: &mut PlayerProgress,
) -> Result<ActionOutcome, EngineError> {
    let graph = StoryGraph::new(story);
    let Some(quest) = graph.current_quest(progress.position) else {
        return Err(EngineError::NoActiveQuest);
    };
    if !quest.skippable {
        return Err(EngineError::QuestNotSkippable {
            id: quest.id.clone(),
        });
    }

    let mut next = progress.clone();
    let mut granted = GrantedCards::new();
    next.skipped.insert(quest.id.clone());
    let before = progress.position;
    next.position = graph.advance(before);
    // Skipping still resolves the chapter, so its reward is still due.
    if next.position.chapter != before.chapter
        && let Some(reward) = graph
            .chapter(before)
            .and_then(|ch| ch.completion_reward.as_ref())
        && !next.collection.contains(&reward.id)
    {
        next.collection.grant(reward.clone())?;
        granted.push(reward.clone());
    }
    log::debug!("quest '{}' skipped", quest.id);

    let outcome = ActionOutcome {
        validated: false,
        resources: next.ledger.clone(),
        granted,
        position: next.position,
        story_complete: graph.is_complete(next.position),
    };
    *progress = next;
    Ok(outcome)
}

/// Fuse two owned cards, wrapped in the same transactional outcome shape.
///
/// # Errors
///
/// Returns `FusionIneligible` when either input is missing or not
/// fusable; the collection is untouched on failure.
pub fn fuse_cards(
    story: &Story,
    progress: &mut PlayerProgress,
    id_a: &str,
    id_b: &str,
) -> Result<ActionOutcome, EngineError> {
    let graph = StoryGraph::new(story);
    let mut next = progress.clone();
    let fused = next.collection.fuse(id_a, id_b)?;
    log::debug!("fused '{id_a}' + '{id_b}' into '{}'", fused.id);

    let outcome = ActionOutcome {
        validated: true,
        resources: next.ledger.clone(),
        granted: GrantedCards::from_iter([fused]),
        position: next.position,
        story_complete: graph.is_complete(next.position),
    };
    *progress = next;
    Ok(outcome)
}
