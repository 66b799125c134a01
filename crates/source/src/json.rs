use crate::{DataSource, DataSourceError, lookup};
use serde_json::{Map, Value};
use std::str::FromStr;

/// A data source over a parsed JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDataSource {
    source: Map<String, Value>,
}

impl JsonDataSource {
    /// Wraps a JSON value. Only objects have members.
    pub fn new(value: Value) -> Result<Self, DataSourceError> {
        match value {
            Value::Object(source) => Ok(Self { source }),
            other => Err(DataSourceError::Unsupported(other.to_string())),
        }
    }

    pub fn from_object(source: Map<String, Value>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }
}

impl FromStr for JsonDataSource {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(serde_json::from_str(s)?)
    }
}

impl DataSource for JsonDataSource {
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
        "json"
    }

    fn to_value(&self) -> Value {
        Value::Object(self.source.clone())
    }
}
