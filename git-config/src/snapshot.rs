use std::collections::BTreeMap;

use crate::GitProperty;

/// One point-in-time read of `git config --global -l`.
///
/// Keys are stored lower-cased. A key listed without `=` maps to `None`,
/// which is different from the key being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveConfigSnapshot {
    entries: BTreeMap<String, Option<String>>,
}

impl LiveConfigSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the `key=value` listing printed by `git config -l`.
    ///
    /// Only the first `=` separates key from value, so values containing `=`
    /// survive intact. Both LF and CRLF line endings are accepted.
    pub fn parse(listing: &str) -> Self {
        let entries = listing
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once('=') {
                Some((key, value)) => (key.to_lowercase(), Some(value.to_string())),
                None => (line.to_lowercase(), None),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    /// `None` when the key is absent, `Some(None)` when it is listed without a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .get(&key.to_lowercase())
            .map(|value| value.as_deref())
    }

    /// True when the property's key is present with exactly the property's value.
    pub fn contains_property(&self, property: &GitProperty) -> bool {
        matches!(self.get(property.key()), Some(Some(value)) if value == property.value())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for LiveConfigSnapshot
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_lowercase(), value.map(Into::into)))
            .collect();
        Self { entries }
    }
}
