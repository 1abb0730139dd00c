//! Engine error kinds callers branch on.
use thiserror::Error;

/// Closed set of failures a progression action can produce.
///
/// Every variant leaves the supplied `PlayerProgress` exactly as it was
/// before the attempt; partial cost deduction or reward grants never
/// survive an `Err`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Action attempted without enough energy to cover the quest cost.
    #[error("not enough energy: need {required}, have {available}")]
    InsufficientResource { required: i32, available: i32 },
    /// Action attempted after the story reached its terminal state.
    #[error("story already complete; no active quest")]
    NoActiveQuest,
    /// A one-off collectible with the same identity is already owned.
    #[error("collectible '{id}' already granted")]
    DuplicateReward { id: String },
    /// Fusion attempted on a missing or non-fusable collectible.
    #[error("collectible '{id}' is missing or not eligible for fusion")]
    FusionIneligible { id: String },
    /// The external probe did not answer within the caller's deadline.
    #[error("external probe timed out")]
    ValidationTimeout,
    /// The external probe failed for a reason other than a timeout.
    #[error("external probe unavailable: {reason}")]
    ProbeUnavailable { reason: String },
    /// The persistence provider rejected a save or load.
    #[error("progress store unavailable: {reason}")]
    StoreUnavailable { reason: String },
    /// Skip requested for a quest that does not allow it.
    #[error("quest '{id}' cannot be skipped")]
    QuestNotSkippable { id: String },
    /// Story content violated a structural invariant at load time.
    #[error("invalid story content: {0}")]
    Content(String),
}
