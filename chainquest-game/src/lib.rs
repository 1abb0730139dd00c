//! Chainquest Game Engine
//!
//! Platform-agnostic core game logic for the Chainquest narrative
//! collectible game. This crate provides the quest progression engine —
//! resource economy, validation, rewards, fusion — without UI, wallet,
//! or platform-specific dependencies.

pub mod cards;
pub mod constants;
pub mod controller;
pub mod error;
pub mod graph;
pub mod ledger;
pub mod oracle;
pub mod pioneer;
pub mod progress;
pub mod story;

// Re-export commonly used types
pub use cards::{Collection, Rarity, VisionCard};
pub use controller::{ActionOutcome, GrantedCards, attempt_quest, fuse_cards, skip_quest};
pub use error::EngineError;
pub use graph::{Position, StoryGraph};
pub use ledger::ResourceLedger;
pub use oracle::{
    AttemptContext, ExternalProbe, ProbeError, ProbeSnapshot, ProbeValue, ValidationCheck,
    evaluate,
};
pub use pioneer::{Pioneer, PioneerStart, PioneersList, builtin_pioneers};
pub use progress::PlayerProgress;
pub use story::{
    Chapter, Difficulty, Quest, QuestConstraints, Story, StoryCatalog, builtin_stories,
    builtin_story,
};

/// Trait for abstracting story content loading.
/// Platform-specific implementations should provide this.
pub trait StoryLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the story table for a pioneer type.
    ///
    /// # Errors
    ///
    /// Returns an error if no story exists for the pioneer or the content
    /// cannot be loaded.
    fn load_story(&self, pioneer: &str) -> Result<Story, Self::Error>;

    /// Load the mintable pioneer types.
    ///
    /// # Errors
    ///
    /// Returns an error if the pioneer data cannot be loaded.
    fn load_pioneers(&self) -> Result<PioneersList, Self::Error>;
}

/// Trait for abstracting progress persistence.
/// Platform-specific implementations should provide this; the player id
/// comes from the host's identity provider.
pub trait ProgressStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a progress snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    fn save(&self, player_id: &str, progress: &PlayerProgress) -> Result<(), Self::Error>;

    /// Load the stored snapshot, `None` for a fresh start.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    fn load(&self, player_id: &str) -> Result<Option<PlayerProgress>, Self::Error>;

    /// Delete the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be deleted.
    fn delete(&self, player_id: &str) -> Result<(), Self::Error>;
}

/// Loader serving the content embedded in this crate's assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

impl StoryLoader for BuiltinLoader {
    type Error = EngineError;

    fn load_story(&self, pioneer: &str) -> Result<Story, Self::Error> {
        let key = builtin_pioneers()
            .get_by_id(pioneer)
            .map_or(pioneer, Pioneer::story_key);
        story::builtin_story(key)
            .cloned()
            .ok_or_else(|| EngineError::Content(format!("no story for pioneer '{pioneer}'")))
    }

    fn load_pioneers(&self) -> Result<PioneersList, Self::Error> {
        Ok(builtin_pioneers().clone())
    }
}

/// Main engine binding content loading and persistence to the
/// progression controller. Each mutating call persists the new snapshot
/// after the transaction commits; when a call returns `Err`, nothing was
/// mutated and nothing was saved.
///
/// Store failures surface as [`EngineError::StoreUnavailable`] inside
/// the returned `anyhow::Error`, so callers can downcast and retry.
pub struct GameEngine<L, S>
where
    L: StoryLoader,
    S: ProgressStore,
{
    loader: L,
    store: S,
}

impl<L, S> GameEngine<L, S>
where
    L: StoryLoader,
    S: ProgressStore,
    L::Error: Into<anyhow::Error>,
    S::Error: Into<anyhow::Error>,
{
    /// Create a new engine with the provided loader and store.
    pub const fn new(loader: L, store: S) -> Self {
        Self { loader, store }
    }

    fn store_unavailable(err: S::Error) -> EngineError {
        let err: anyhow::Error = err.into();
        EngineError::StoreUnavailable {
            reason: err.to_string(),
        }
    }

    /// Resume a player's saved progress, or mint fresh progress for the
    /// given pioneer type and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error when the store or loader fails.
    pub fn start_or_resume(
        &self,
        player_id: &str,
        pioneer: &str,
    ) -> Result<PlayerProgress, anyhow::Error> {
        if let Some(saved) = self.store.load(player_id).map_err(Self::store_unavailable)? {
            log::info!("resumed player '{player_id}' at {:?}", saved.position);
            return Ok(saved);
        }
        let pioneers = self.loader.load_pioneers().map_err(Into::into)?;
        let fresh = pioneers.get_by_id(pioneer).map_or_else(
            || PlayerProgress::new(pioneer),
            |p| PlayerProgress::with_start(pioneer, &p.start),
        );
        self.store
            .save(player_id, &fresh)
            .map_err(Self::store_unavailable)?;
        log::info!("minted fresh progress for player '{player_id}' as '{pioneer}'");
        Ok(fresh)
    }

    /// Run one quest attempt and persist the result.
    ///
    /// The progress is committed in memory before the save; a save
    /// failure surfaces as `StoreUnavailable` and the caller may retry
    /// with [`ProgressStore::save`] directly.
    ///
    /// # Errors
    ///
    /// Propagates `EngineError` kinds from the controller and loader or
    /// store failures.
    pub fn attempt_quest<P: ExternalProbe>(
        &self,
        player_id: &str,
        progress: &mut PlayerProgress,
        ctx: &AttemptContext,
        probe: &P,
    ) -> Result<ActionOutcome, anyhow::Error> {
        let story = self.loader.load_story(&progress.pioneer).map_err(Into::into)?;
        let outcome = controller::attempt_quest(&story, progress, ctx, probe)?;
        self.store
            .save(player_id, progress)
            .map_err(Self::store_unavailable)?;
        Ok(outcome)
    }

    /// Skip the current quest and persist the result.
    ///
    /// # Errors
    ///
    /// Propagates `EngineError` kinds and loader or store failures.
    pub fn skip_quest(
        &self,
        player_id: &str,
        progress: &mut PlayerProgress,
    ) -> Result<ActionOutcome, anyhow::Error> {
        let story = self.loader.load_story(&progress.pioneer).map_err(Into::into)?;
        let outcome = controller::skip_quest(&story, progress)?;
        self.store
            .save(player_id, progress)
            .map_err(Self::store_unavailable)?;
        Ok(outcome)
    }

    /// Fuse two owned cards and persist the result.
    ///
    /// # Errors
    ///
    /// Propagates `EngineError` kinds and loader or store failures.
    pub fn fuse_cards(
        &self,
        player_id: &str,
        progress: &mut PlayerProgress,
        id_a: &str,
        id_b: &str,
    ) -> Result<ActionOutcome, anyhow::Error> {
        let story = self.loader.load_story(&progress.pioneer).map_err(Into::into)?;
        let outcome = controller::fuse_cards(&story, progress, id_a, id_b)?;
        self.store
            .save(player_id, progress)
            .map_err(Self::store_unavailable)?;
        Ok(outcome)
    }
}
