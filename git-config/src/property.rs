use serde::Deserialize;
use serde::Serialize;

/// A single `key = value` entry of git configuration.
///
/// The key keeps the casing it was declared with because that is what gets
/// written; git itself treats section and variable names case-insensitively,
/// so lookups against a [`crate::LiveConfigSnapshot`] go through
/// [`GitProperty::lookup_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitProperty {
    key: String,
    value: String,
}

impl GitProperty {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The key as it appears in `git config -l` output.
    pub fn lookup_key(&self) -> String {
        self.key.to_lowercase()
    }
}

