//! Story content model: chapters, quests, and the built-in catalog
//!
//! Per-pioneer stories are declarative data, not code branches: each
//! pioneer type keys a `Story` table of chapters and quests, and the
//! engine never inspects the pioneer type anywhere else.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::cards::VisionCard;
use crate::error::EngineError;
use crate::oracle::ValidationCheck;

/// Quest difficulty tiers, ordered easy < medium < hard < legendary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Legendary,
}

/// Optional constraints layered on top of a quest's validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestConstraints {
    /// Hard deadline in seconds; exceeding it fails the attempt.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    /// Fixed set of selectable answers; submissions outside it fail.
    #[serde(default)]
    pub options: Vec<String>,
}

/// An atomic player-facing challenge: a cost, a validation rule, a reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub energy_cost: i32,
    pub check: ValidationCheck,
    #[serde(default)]
    pub constraints: QuestConstraints,
    pub reward: VisionCard,
    /// Failure sends the player back to the very first quest.
    #[serde(default)]
    pub catastrophic: bool,
    /// The quest may be resolved by skipping instead of completing.
    #[serde(default)]
    pub skippable: bool,
}

/// An ordered group of quests sharing a narrative theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub intro: String,
    pub quests: Vec<Quest>,
    /// Granted once every quest in the chapter is resolved.
    #[serde(default)]
    pub completion_reward: Option<VisionCard>,
    /// When false the story ends after this chapter even if more follow.
    #[serde(default = "default_true")]
    pub unlocks_next: bool,
}

fn default_true() -> bool {
    true
}

/// A pioneer type's complete chapter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub pioneer: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct StoryNoId {
    chapters: Vec<Chapter>,
}

impl Story {
    /// Empty story (useful for tests).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pioneer: String::new(),
            chapters: Vec::new(),
        }
    }

    /// Parse a single story body for one pioneer type.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid story data.
    pub fn from_json(pioneer: &str, json: &str) -> Result<Self, serde_json::Error> {
        let body: StoryNoId = serde_json::from_str(json)?;
        Ok(Self {
            pioneer: pioneer.to_string(),
            chapters: body.chapters,
        })
    }

    /// Total number of quests across all chapters.
    #[must_use]
    pub fn quest_count(&self) -> usize {
        self.chapters.iter().map(|ch| ch.quests.len()).sum()
    }

    #[must_use]
    pub fn find_quest(&self, id: &str) -> Option<&Quest> {
        self.chapters
            .iter()
            .flat_map(|ch| ch.quests.iter())
            .find(|quest| quest.id == id)
    }

    /// Check structural invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Content` on empty chapters, duplicate quest
    /// ids, negative energy costs, or one-off rewards shared between
    /// quests (which would guarantee a duplicate grant).
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.chapters.is_empty() {
            return Err(EngineError::Content(format!(
                "story '{}' has no chapters",
                self.pioneer
            )));
        }
        let mut quest_ids = HashSet::new();
        let mut one_off_rewards = HashSet::new();
        for chapter in &self.chapters {
            if chapter.quests.is_empty() {
                return Err(EngineError::Content(format!(
                    "chapter '{}' has no quests",
                    chapter.id
                )));
            }
            for quest in &chapter.quests {
                if !quest_ids.insert(quest.id.as_str()) {
                    return Err(EngineError::Content(format!(
                        "duplicate quest id '{}'",
                        quest.id
                    )));
                }
                if quest.energy_cost < 0 {
                    return Err(EngineError::Content(format!(
                        "quest '{}' has a negative energy cost",
                        quest.id
                    )));
                }
                if !quest.reward.fusable && !one_off_rewards.insert(quest.reward.id.as_str()) {
                    return Err(EngineError::Content(format!(
                        "one-off reward '{}' granted by more than one quest",
                        quest.reward.id
                    )));
                }
            }
            if let Some(reward) = &chapter.completion_reward
                && !reward.fusable
                && !one_off_rewards.insert(reward.id.as_str())
            {
                return Err(EngineError::Content(format!(
                    "one-off reward '{}' granted by more than one source",
                    reward.id
                )));
            }
        }
        Ok(())
    }
}

/// Container mapping pioneer types to their stories.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoryCatalog {
    stories: HashMap<String, Story>,
}

impl StoryCatalog {
    /// Parse a catalog keyed by pioneer type from one JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid stories.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: HashMap<String, StoryNoId> = serde_json::from_str(json)?;
        let stories = map
            .into_iter()
            .map(|(pioneer, body)| {
                let story = Story {
                    pioneer: pioneer.clone(),
                    chapters: body.chapters,
                };
                (pioneer, story)
            })
            .collect();
        Ok(Self { stories })
    }

    #[must_use]
    pub fn get(&self, pioneer: &str) -> Option<&Story> {
        self.stories.get(pioneer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Validate every story in the catalog.
    ///
    /// # Errors
    ///
    /// Propagates the first `EngineError::Content` found.
    pub fn validate(&self) -> Result<(), EngineError> {
        for story in self.stories.values() {
            story.validate()?;
        }
        Ok(())
    }
}

/// Built-in story content embedded from `assets/data/stories.json`.
///
/// # Panics
///
/// Panics if the embedded asset is malformed; the `data_shapes`
/// integration test keeps that from shipping.
pub fn builtin_stories() -> &'static StoryCatalog {
    static CATALOG: OnceLock<StoryCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let catalog = StoryCatalog::from_json(include_str!("../assets/data/stories.json"))
            .expect("valid embedded story catalog");
        catalog.validate().expect("consistent embedded story catalog");
        catalog
    })
}

/// Built-in story for one pioneer type, if the catalog carries one.
#[must_use]
pub fn builtin_story(pioneer: &str) -> Option<&'static Story> {
    builtin_stories().get(pioneer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rarity;

    const MINIMAL: &str = r#"{
        "chapters": [
            {
                "id": "ch1",
                "title": "Genesis",
                "quests": [
                    {
                        "id": "q1",
                        "title": "Mint your name",
                        "energy_cost": 10,
                        "check": { "kind": "identity_exists", "key": "pioneer:self" },
                        "reward": { "id": "spark", "name": "Spark", "rarity": "common" }
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn story_parses_with_defaults() {
        let story = Story::from_json("prospector", MINIMAL).unwrap();
        assert_eq!(story.pioneer, "prospector");
        assert_eq!(story.quest_count(), 1);
        let quest = story.find_quest("q1").unwrap();
        assert_eq!(quest.difficulty, Difficulty::Easy);
        assert!(!quest.catastrophic);
        assert!(!quest.skippable);
        assert_eq!(quest.reward.rarity, Rarity::Common);
        assert!(story.chapters[0].unlocks_next);
        assert!(story.chapters[0].completion_reward.is_none());
        story.validate().unwrap();
    }

    #[test]
    fn validate_rejects_duplicate_quest_ids() {
        let mut story = Story::from_json("prospector", MINIMAL).unwrap();
        let dup = story.chapters[0].quests[0].clone();
        story.chapters[0].quests.push(dup);
        let err = story.validate().unwrap_err();
        assert!(matches!(err, EngineError::Content(msg) if msg.contains("duplicate quest id")));
    }

    #[test]
    fn validate_rejects_shared_one_off_rewards() {
        let mut story = Story::from_json("prospector", MINIMAL).unwrap();
        let mut second = story.chapters[0].quests[0].clone();
        second.id = "q2".to_string();
        story.chapters[0].quests.push(second);
        let err = story.validate().unwrap_err();
        assert!(matches!(err, EngineError::Content(msg) if msg.contains("one-off reward")));
    }

    #[test]
    fn validate_rejects_empty_shapes() {
        assert!(Story::empty().validate().is_err());
        let mut story = Story::from_json("prospector", MINIMAL).unwrap();
        story.chapters[0].quests.clear();
        assert!(story.validate().is_err());
    }

    #[test]
    fn catalog_parses_pioneer_keyed_map() {
        let json = format!(r#"{{ "prospector": {MINIMAL} }}"#);
        let catalog = StoryCatalog::from_json(&json).unwrap();
        assert_eq!(catalog.len(), 1);
        let story = catalog.get("prospector").unwrap();
        assert_eq!(story.pioneer, "prospector");
        assert!(catalog.get("unknown").is_none());
        catalog.validate().unwrap();
    }
}
