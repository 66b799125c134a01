use crate::{DataSource, DataSourceError, lookup};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A named zero-argument computation over a serialized record.
pub type Accessor = Box<dyn Fn(&Map<String, Value>) -> Value + Send + Sync>;

/// A data source over any serializable record.
///
/// Fields are members by name. Accessors registered with
/// [`with_accessor`](RecordDataSource::with_accessor) are reached as
/// `@name` in basic placeholders and as `record.name()` in scripts.
pub struct RecordDataSource {
    record: Map<String, Value>,
    accessors: BTreeMap<String, Accessor>,
}

impl RecordDataSource {
    pub fn new<T: Serialize>(record: &T) -> Result<Self, DataSourceError> {
        match serde_json::to_value(record)? {
            Value::Object(record) => Ok(Self {
                record,
                accessors: BTreeMap::new(),
            }),
            other => Err(DataSourceError::Unsupported(other.to_string())),
        }
    }

    pub fn with_accessor<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Value + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Box::new(accessor));
        self
    }

    fn call(&self, name: &str) -> Option<Value> {
        self.accessors.get(name).map(|accessor| accessor(&self.record))
    }
}

impl fmt::Debug for RecordDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDataSource")
            .field("record", &self.record)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DataSource for RecordDataSource {
    fn has(&self, member: &str) -> bool {
        match member.strip_prefix('@') {
            Some(name) => self.accessors.contains_key(name),
            None => lookup(&self.record, member).is_some(),
        }
    }

    fn get(&self, member: &str) -> Result<Value, DataSourceError> {
        let value = match member.strip_prefix('@') {
            Some(name) => self.call(name),
            None => lookup(&self.record, member).cloned(),
        };
        value.ok_or_else(|| DataSourceError::MemberNotFound(member.to_string()))
    }

    fn members(&self) -> Vec<String> {
        self.record.keys().cloned().collect()
    }

    fn name(&self) -> &'static str {
        "record"
    }

    /// Fields plus one `@name` entry per accessor.
    fn to_value(&self) -> Value {
        let mut object = self.record.clone();
        for name in self.accessors.keys() {
            if let Some(value) = self.call(name) {
                object.insert(format!("@{}", name), value);
            }
        }
        Value::Object(object)
    }
}
