//! Pioneer identity types
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Starting resources a pioneer type mints with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PioneerStart {
    #[serde(default = "PioneerStart::default_energy")]
    pub energy: i32,
    #[serde(default = "PioneerStart::default_energy")]
    pub max_energy: i32,
    #[serde(default)]
    pub reputation: i32,
}

impl PioneerStart {
    const fn default_energy() -> i32 {
        crate::constants::START_ENERGY
    }
}

impl Default for PioneerStart {
    fn default() -> Self {
        Self {
            energy: Self::default_energy(),
            max_energy: Self::default_energy(),
            reputation: 0,
        }
    }
}

/// A mintable pioneer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pioneer {
    pub id: String,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub start: PioneerStart,
    /// Story table key; defaults to the pioneer's own id.
    #[serde(default)]
    pub story: Option<String>,
}

impl Pioneer {
    /// Key into the story catalog for this pioneer.
    #[must_use]
    pub fn story_key(&self) -> &str {
        self.story.as_deref().unwrap_or(&self.id)
    }

    #[must_use]
    fn with_id(id: String, p: PioneerNoId) -> Self {
        Self {
            id,
            name: p.name,
            desc: p.desc,
            start: p.start,
            story: p.story,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
struct PioneerNoId {
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub start: PioneerStart,
    #[serde(default)]
    pub story: Option<String>,
}

/// Ordered list of the pioneer types players can mint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PioneersList(pub Vec<Pioneer>);

impl PioneersList {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load pioneer types from a JSON map keyed by id.
    ///
    /// Entries outside the known display order are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid pioneer data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: std::collections::HashMap<String, PioneerNoId> = serde_json::from_str(json)?;
        let order = ["prospector", "cartographer", "archivist", "envoy"];
        let mut v = Vec::with_capacity(order.len());
        for id in order {
            if let Some(p) = map.get(id) {
                v.push(Pioneer::with_id(id.to_string(), p.clone()));
            }
        }
        Ok(Self(v))
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Pioneer> {
        self.0.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pioneer> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a PioneersList {
    type Item = &'a Pioneer;
    type IntoIter = std::slice::Iter<'a, Pioneer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Built-in pioneer types embedded from `assets/data/pioneers.json`.
///
/// # Panics
///
/// Panics if the embedded asset is malformed; covered by `data_shapes`.
pub fn builtin_pioneers() -> &'static PioneersList {
    static PIONEERS: OnceLock<PioneersList> = OnceLock::new();
    PIONEERS.get_or_init(|| {
        PioneersList::from_json(include_str!("../assets/data/pioneers.json"))
            .expect("valid embedded pioneer data")
    })
}
