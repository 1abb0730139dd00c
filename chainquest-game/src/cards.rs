//! Vision Card collectibles and the player's collection
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Rarity tiers, ordered common < rare < epic < legendary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Next rarity tier up, saturating at legendary.
    #[must_use]
    pub const fn next_tier(self) -> Self {
        match self {
            Self::Common => Self::Rare,
            Self::Rare => Self::Epic,
            Self::Epic | Self::Legendary => Self::Legendary,
        }
    }
}

/// A collectible reward item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub power: i32,
    /// Whether this card may be consumed as a fusion input.
    #[serde(default)]
    pub fusable: bool,
    /// Identity the fusion output takes when this card is an input.
    #[serde(default)]
    pub fusion_target: Option<String>,
}

/// The cards a player owns. Cards are only ever removed by fusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Collection {
    cards: Vec<VisionCard>,
}

impl Collection {
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    #[must_use]
    pub fn cards(&self) -> &[VisionCard] {
        &self.cards
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether any owned card carries this identity.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    /// Combined power of every owned card.
    #[must_use]
    pub fn total_power(&self) -> i32 {
        self.cards.iter().map(|card| card.power).sum()
    }

    /// Append a card to the collection.
    ///
    /// Fusable cards may stack; one-off badges may not.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReward` when a non-fusable card with the same
    /// identity is already owned.
    pub fn grant(&mut self, card: VisionCard) -> Result<(), EngineError> {
        if self
            .cards
            .iter()
            .any(|owned| owned.id == card.id && !owned.fusable)
        {
            return Err(EngineError::DuplicateReward { id: card.id });
        }
        self.cards.push(card);
        Ok(())
    }

    /// Fusable subset of the collection, for selection UIs.
    pub fn list_fusable(&self) -> impl Iterator<Item = &VisionCard> {
        self.cards.iter().filter(|card| card.fusable)
    }

    /// Merge two fusable cards into one higher-rarity, terminal card.
    ///
    /// Both inputs are removed; the output's rarity is one tier above the
    /// higher input (saturating at legendary), its power is the sum of the
    /// inputs, and it can never be fused again. The result is identical
    /// whichever order the two identities are given in.
    ///
    /// # Errors
    ///
    /// Returns `FusionIneligible` naming whichever input is missing from
    /// the collection or not flagged fusable.
    pub fn fuse(&mut self, id_a: &str, id_b: &str) -> Result<VisionCard, EngineError> {
        let idx_a = self
            .cards
            .iter()
            .position(|card| card.id == id_a)
            .ok_or_else(|| EngineError::FusionIneligible {
                id: id_a.to_string(),
            })?;
        // Two copies of a stacked fusable card are distinct inputs.
        let idx_b = self
            .cards
            .iter()
            .enumerate()
            .position(|(idx, card)| idx != idx_a && card.id == id_b)
            .ok_or_else(|| EngineError::FusionIneligible {
                id: id_b.to_string(),
            })?;

        for idx in [idx_a, idx_b] {
            if !self.cards[idx].fusable {
                return Err(EngineError::FusionIneligible {
                    id: self.cards[idx].id.clone(),
                });
            }
        }

        // Canonical input order keeps the output independent of argument order.
        let (first, second) = if self.cards[idx_a].id <= self.cards[idx_b].id {
            (idx_a, idx_b)
        } else {
            (idx_b, idx_a)
        };
        let fused = Self::synthesize(&self.cards[first], &self.cards[second]);

        let (hi, lo) = if idx_a > idx_b {
            (idx_a, idx_b)
        } else {
            (idx_b, idx_a)
        };
        self.cards.remove(hi);
        self.cards.remove(lo);
        self.cards.push(fused.clone());
        Ok(fused)
    }

    fn synthesize(first: &VisionCard, second: &VisionCard) -> VisionCard {
        let id = first
            .fusion_target
            .clone()
            .or_else(|| second.fusion_target.clone())
            .unwrap_or_else(|| format!("{}+{}", first.id, second.id));
        VisionCard {
            id,
            name: format!("{} \u{00d7} {}", first.name, second.name),
            desc: format!("Fused from {} and {}.", first.name, second.name),
            rarity: first.rarity.max(second.rarity).next_tier(),
            power: first.power.saturating_add(second.power),
            fusable: false,
            fusion_target: None,
        }
    }
}
