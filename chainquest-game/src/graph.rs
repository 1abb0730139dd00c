//! Quest graph navigation
//!
//! Chapters are a line; quests within a chapter are a line. A position
//! with `chapter == story.chapters.len()` is the single terminal "story
//! complete" state. Navigation never errors at the boundaries: `advance`
//! is a no-op at the terminal state and `retreat` a no-op at the first
//! quest; only a catastrophic-failure reset moves the position backwards.
use serde::{Deserialize, Serialize};

use crate::story::{Chapter, Quest, Story};

/// Graph coordinates, ordered lexicographically by (chapter, quest).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    pub chapter: usize,
    pub quest: usize,
}

impl Position {
    /// First quest of the first chapter.
    pub const START: Self = Self {
        chapter: 0,
        quest: 0,
    };

    #[must_use]
    pub const fn new(chapter: usize, quest: usize) -> Self {
        Self { chapter, quest }
    }
}

/// Read-only navigation over one story's chapter/quest structure.
#[derive(Debug, Clone, Copy)]
pub struct StoryGraph<'a> {
    story: &'a Story,
}

impl<'a> StoryGraph<'a> {
    #[must_use]
    pub const fn new(story: &'a Story) -> Self {
        Self { story }
    }

    /// True once the position has passed the last quest of the last
    /// unlocked chapter.
    #[must_use]
    pub fn is_complete(&self, pos: Position) -> bool {
        pos.chapter >= self.story.chapters.len()
    }

    #[must_use]
    pub fn chapter(&self, pos: Position) -> Option<&'a Chapter> {
        self.story.chapters.get(pos.chapter)
    }

    /// Quest at the given position; `None` once the story is complete.
    #[must_use]
    pub fn current_quest(&self, pos: Position) -> Option<&'a Quest> {
        self.chapter(pos).and_then(|ch| ch.quests.get(pos.quest))
    }

    /// Move to the next quest, the next chapter's first quest, or the
    /// terminal state. Idempotent once complete; never decreases the
    /// position.
    #[must_use]
    pub fn advance(&self, pos: Position) -> Position {
        let Some(chapter) = self.chapter(pos) else {
            return self.terminal();
        };
        if pos.quest + 1 < chapter.quests.len() {
            return Position::new(pos.chapter, pos.quest + 1);
        }
        // A chapter that does not unlock its successor ends the story here.
        if chapter.unlocks_next && pos.chapter + 1 < self.story.chapters.len() {
            Position::new(pos.chapter + 1, 0)
        } else {
            self.terminal()
        }
    }

    /// Move to the previous quest or the last quest of the previous
    /// chapter. No-op at the start and after completion.
    #[must_use]
    pub fn retreat(&self, pos: Position) -> Position {
        if self.is_complete(pos) || pos == Position::START {
            return pos;
        }
        if pos.quest > 0 {
            return Position::new(pos.chapter, pos.quest - 1);
        }
        let prev = pos.chapter - 1;
        let last = self.story.chapters[prev].quests.len().saturating_sub(1);
        Position::new(prev, last)
    }

    /// Catastrophic-failure transition: back to the very first quest.
    #[must_use]
    pub const fn reset(&self) -> Position {
        Position::START
    }

    const fn terminal(&self) -> Position {
        Position::new(self.story.chapters.len(), 0)
    }
}
