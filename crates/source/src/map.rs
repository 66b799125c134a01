use crate::{DataSource, DataSourceError, lookup};
use serde_json::{Map, Value};

/// In-memory key/value pairs.
///
/// A key that is present with a `null` value still counts as a member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapDataSource {
    source: Map<String, Value>,
}

impl MapDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.source.insert(key.into(), value.into());
    }

    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapDataSource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            source: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl DataSource for MapDataSource {
    fn has(&self, member: &str) -> bool {
        lookup(&self.source, member).is_some()
    }

    fn get(&self, member: &str) -> Result<Value, DataSourceError> {
        lookup(&self.source, member)
            .cloned()
            .ok_or_else(|| DataSourceError::MemberNotFound(member.to_string()))
    }

    fn members(&self) -> Vec<String> {
        self.source.keys().cloned().collect()
    }

    fn name(&self) -> &'static str {
        "map"
    }
}
