//! Validation oracle adapter
//!
//! Decides whether a quest's external condition is currently satisfied.
//! [`evaluate`] is a pure function of the quest, the player's submitted
//! inputs, and a read-only probe snapshot the caller fetched beforehand;
//! it performs no I/O and mutates nothing, so it is testable without real
//! oracles or wallets. Unknown validation kinds fail closed.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::story::Quest;

/// Declarative description of what proves a quest complete.
///
/// A closed tag set: content using a kind this engine does not know
/// deserializes to `Unknown` and always evaluates false rather than
/// silently auto-passing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationCheck {
    /// The probed identity exists (e.g. a registered pioneer name).
    IdentityExists { key: String },
    /// The probed record equals an expected string exactly.
    RecordEquals { key: String, expected: String },
    /// The player's submitted answer matches the expected one.
    ChoiceAnswer { expected: String },
    /// The probed number falls in `[min, max]` inclusive.
    NumberInRange { key: String, min: f64, max: f64 },
    /// The player's computed result matches the expected value within a
    /// tolerance.
    FormulaResult {
        expected: f64,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    /// Every required step appears in the player's completed set.
    SequenceComplete { required: Vec<String> },
    #[serde(other)]
    Unknown,
}

fn default_tolerance() -> f64 {
    1e-6
}

impl ValidationCheck {
    /// The probe key this check reads, if it consults external truth at all.
    ///
    /// Player-submission kinds (choice, formula, sequence) compare against
    /// the quest's own expected value and need no probe read.
    #[must_use]
    pub fn probe_key(&self) -> Option<&str> {
        match self {
            Self::IdentityExists { key }
            | Self::RecordEquals { key, .. }
            | Self::NumberInRange { key, .. } => Some(key),
            Self::ChoiceAnswer { .. }
            | Self::FormulaResult { .. }
            | Self::SequenceComplete { .. }
            | Self::Unknown => None,
        }
    }
}

/// One opaque datum read from an external truth source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Missing,
}

/// Read-only key-value snapshot supplied by the caller for one evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbeSnapshot {
    values: BTreeMap<String, ProbeValue>,
}

impl ProbeSnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ProbeValue) {
        self.values.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProbeValue> {
        self.values.get(key)
    }
}

/// Player-side inputs for a single attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttemptContext {
    /// Submitted answer for choice and formula quests.
    pub answer: Option<String>,
    /// Steps the player claims to have finished, for sequence quests.
    pub completed_steps: Vec<String>,
    /// Seconds elapsed since the quest was presented, for timed quests.
    pub elapsed_secs: Option<u64>,
}

impl AttemptContext {
    #[must_use]
    pub fn with_answer(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_steps<I: IntoIterator<Item = S>, S: Into<String>>(steps: I) -> Self {
        Self {
            completed_steps: steps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn elapsed(mut self, secs: u64) -> Self {
        self.elapsed_secs = Some(secs);
        self
    }
}

/// Errors an [`ExternalProbe`] implementation may report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The read did not finish within the caller-supplied deadline.
    #[error("probe read timed out")]
    Timeout,
    /// Any other provider failure; the engine treats the reason as opaque.
    #[error("probe unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup against an external truth source.
///
/// Implementations own any network or storage I/O, including deadline
/// enforcement; the engine performs exactly one read per attempt, before
/// any state mutation.
pub trait ExternalProbe {
    /// Fetch the current reference value for a key.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Timeout` when the deadline elapsed, otherwise
    /// `ProbeError::Unavailable`.
    fn read(&self, key: &str) -> Result<ProbeValue, ProbeError>;
}

/// Decide whether the quest's condition holds. Pure; fails closed.
#[must_use]
pub fn evaluate(quest: &Quest, ctx: &AttemptContext, snapshot: &ProbeSnapshot) -> bool {
    if let Some(limit) = quest.constraints.time_limit_secs
        && ctx.elapsed_secs.unwrap_or(0) > limit
    {
        return false;
    }
    if !quest.constraints.options.is_empty() {
        let Some(answer) = ctx.answer.as_deref() else {
            return false;
        };
        if !quest.constraints.options.iter().any(|opt| opt == answer) {
            return false;
        }
    }

    match &quest.check {
        ValidationCheck::IdentityExists { key } => matches!(
            snapshot.get(key),
            Some(ProbeValue::Flag(true) | ProbeValue::Text(_) | ProbeValue::Number(_))
        ),
        ValidationCheck::RecordEquals { key, expected } => {
            matches!(snapshot.get(key), Some(ProbeValue::Text(actual)) if actual == expected)
        }
        ValidationCheck::ChoiceAnswer { expected } => {
            ctx.answer.as_deref() == Some(expected.as_str())
        }
        ValidationCheck::NumberInRange { key, min, max } => match snapshot.get(key) {
            Some(ProbeValue::Number(actual)) => (*min..=*max).contains(actual),
            _ => false,
        },
        ValidationCheck::FormulaResult {
            expected,
            tolerance,
        } => ctx
            .answer
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .is_some_and(|actual| (actual - expected).abs() <= tolerance.abs()),
        ValidationCheck::SequenceComplete { required } => required
            .iter()
            .all(|step| ctx.completed_steps.iter().any(|done| done == step)),
        ValidationCheck::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::VisionCard;
    use crate::story::{Difficulty, Quest, QuestConstraints};

    fn quest(check: ValidationCheck) -> Quest {
        Quest {
            id: "q".to_string(),
            title: "Quest".to_string(),
            narrative: String::new(),
            difficulty: Difficulty::Easy,
            energy_cost: 10,
            check,
            constraints: QuestConstraints::default(),
            reward: VisionCard {
                id: "card".to_string(),
                name: "Card".to_string(),
                desc: String::new(),
                rarity: crate::cards::Rarity::Common,
                power: 1,
                fusable: false,
                fusion_target: None,
            },
            catastrophic: false,
            skippable: false,
        }
    }

    #[test]
    fn identity_exists_requires_non_missing_value() {
        let q = quest(ValidationCheck::IdentityExists {
            key: "pioneer:alice".to_string(),
        });
        let ctx = AttemptContext::default();

        let mut snapshot = ProbeSnapshot::new();
        assert!(!evaluate(&q, &ctx, &snapshot), "absent key fails closed");

        snapshot.insert("pioneer:alice", ProbeValue::Flag(true));
        assert!(evaluate(&q, &ctx, &snapshot));

        snapshot.insert("pioneer:alice", ProbeValue::Flag(false));
        assert!(!evaluate(&q, &ctx, &snapshot));

        snapshot.insert("pioneer:alice", ProbeValue::Missing);
        assert!(!evaluate(&q, &ctx, &snapshot));
    }

    #[test]
    fn record_equals_is_exact_match() {
        let q = quest(ValidationCheck::RecordEquals {
            key: "guild:motto".to_string(),
            expected: "onward".to_string(),
        });
        let mut snapshot = ProbeSnapshot::new();
        snapshot.insert("guild:motto", ProbeValue::Text("onward".to_string()));
        assert!(evaluate(&q, &AttemptContext::default(), &snapshot));

        snapshot.insert("guild:motto", ProbeValue::Text("Onward".to_string()));
        assert!(!evaluate(&q, &AttemptContext::default(), &snapshot));
    }

    #[test]
    fn number_in_range_is_inclusive() {
        let q = quest(ValidationCheck::NumberInRange {
            key: "oracle:price".to_string(),
            min: 10.0,
            max: 20.0,
        });
        let mut snapshot = ProbeSnapshot::new();
        for (value, ok) in [(10.0, true), (20.0, true), (20.01, false)] {
            snapshot.insert("oracle:price", ProbeValue::Number(value));
            assert_eq!(evaluate(&q, &AttemptContext::default(), &snapshot), ok);
        }
        snapshot.insert("oracle:price", ProbeValue::Text("15".to_string()));
        assert!(
            !evaluate(&q, &AttemptContext::default(), &snapshot),
            "wrong-typed probe value fails closed"
        );
    }

    #[test]
    fn choice_answer_matches_submission() {
        let q = quest(ValidationCheck::ChoiceAnswer {
            expected: "proof-of-stake".to_string(),
        });
        let snapshot = ProbeSnapshot::new();
        assert!(evaluate(
            &q,
            &AttemptContext::with_answer("proof-of-stake"),
            &snapshot
        ));
        assert!(!evaluate(
            &q,
            &AttemptContext::with_answer("proof-of-work"),
            &snapshot
        ));
        assert!(!evaluate(&q, &AttemptContext::default(), &snapshot));
    }

    #[test]
    fn option_constraint_rejects_answers_off_the_list() {
        let mut q = quest(ValidationCheck::ChoiceAnswer {
            expected: "b".to_string(),
        });
        q.constraints.options = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let snapshot = ProbeSnapshot::new();
        assert!(evaluate(&q, &AttemptContext::with_answer("b"), &snapshot));
        assert!(!evaluate(&q, &AttemptContext::with_answer("z"), &snapshot));
    }

    #[test]
    fn formula_result_parses_and_compares_with_tolerance() {
        let q = quest(ValidationCheck::FormulaResult {
            expected: 42.0,
            tolerance: 0.5,
        });
        let snapshot = ProbeSnapshot::new();
        assert!(evaluate(&q, &AttemptContext::with_answer("42.3"), &snapshot));
        assert!(!evaluate(&q, &AttemptContext::with_answer("43"), &snapshot));
        assert!(!evaluate(
            &q,
            &AttemptContext::with_answer("not a number"),
            &snapshot
        ));
    }

    #[test]
    fn sequence_complete_requires_every_step() {
        let q = quest(ValidationCheck::SequenceComplete {
            required: vec!["mint".to_string(), "sign".to_string()],
        });
        let snapshot = ProbeSnapshot::new();
        assert!(evaluate(
            &q,
            &AttemptContext::with_steps(["sign", "mint", "extra"]),
            &snapshot
        ));
        assert!(!evaluate(
            &q,
            &AttemptContext::with_steps(["mint"]),
            &snapshot
        ));
    }

    #[test]
    fn time_limit_exceeded_fails_any_kind() {
        let mut q = quest(ValidationCheck::ChoiceAnswer {
            expected: "b".to_string(),
        });
        q.constraints.time_limit_secs = Some(30);
        let snapshot = ProbeSnapshot::new();
        assert!(evaluate(
            &q,
            &AttemptContext::with_answer("b").elapsed(30),
            &snapshot
        ));
        assert!(!evaluate(
            &q,
            &AttemptContext::with_answer("b").elapsed(31),
            &snapshot
        ));
    }

    #[test]
    fn unknown_kind_fails_closed() {
        let parsed: ValidationCheck =
            serde_json::from_str(r#"{"kind": "astral_projection"}"#).unwrap();
        assert_eq!(parsed, ValidationCheck::Unknown);
        let q = quest(parsed);
        assert!(!evaluate(&q, &AttemptContext::default(), &ProbeSnapshot::new()));
    }
}
