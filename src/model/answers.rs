//! Answers: what the visitor has told the bot so far.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one step of the dialogue and the answer field it fills.
///
/// Variants are declared in step order, so the derived `Ord` is the
/// dialogue order and `Answers` iterates in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKey {
    Intent,
    Name,
    Email,
    Phone,
    Subject,
    Description,
}

impl StepKey {
    /// Position of this key's step in the dialogue.
    pub fn index(self) -> usize {
        match self {
            Self::Intent => 0,
            Self::Name => 1,
            Self::Email => 2,
            Self::Phone => 3,
            Self::Subject => 4,
            Self::Description => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intent => "intent",
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Subject => "subject",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step key to answer value.
///
/// A key is present only once its step has been completed.
/// Serialized as a plain JSON object of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<StepKey, String>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: StepKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// The answer for `key`, treating an empty answer as missing.
    pub fn filled(&self, key: StepKey) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, key: StepKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    pub fn remove(&mut self, key: StepKey) -> Option<String> {
        self.0.remove(&key)
    }

    /// Drops every answer whose step sits at or after `step_index`.
    pub fn truncate(&mut self, step_index: usize) {
        self.0.retain(|key, _| key.index() < step_index);
    }
}

#[cfg(test)]
impl StepKey {
    /// Every key, in step order.
    pub const ALL: [StepKey; 6] = [
        StepKey::Intent,
        StepKey::Name,
        StepKey::Email,
        StepKey::Phone,
        StepKey::Subject,
        StepKey::Description,
    ];
}

#[cfg(test)]
impl Answers {
    pub fn contains(&self, key: StepKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Keys in step order.
    pub fn keys(&self) -> impl Iterator<Item = StepKey> + '_ {
        self.0.keys().copied()
    }
}
