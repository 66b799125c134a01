//! Data source abstractions for report fills.
//!
//! A fill job reads placeholder values from one or more [`DataSource`]s,
//! tried in registration order. Every source answers the same three
//! questions: does it have a member, what is the member's value, and which
//! members does it expose.
//!
//! ## Available Sources
//!
//! - `MapDataSource`: in-memory key/value pairs
//! - `JsonDataSource`: a parsed JSON object
//! - `RecordDataSource`: any `serde::Serialize` value plus named accessors
//! - `EmptyDataSource`: a source with no members
//!
//! ## Example
//!
//! ```ignore
//! use platen_source::{DataSource, MapDataSource};
//!
//! let source = MapDataSource::new().with("name", "Ada").with("score", 80);
//! assert!(source.has("name"));
//! assert_eq!(source.get("score")?, serde_json::json!(80));
//! ```

mod json;
mod map;
mod record;

pub use json::JsonDataSource;
pub use map::MapDataSource;
pub use record::{Accessor, RecordDataSource};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Can't find [{0}] in data source.")]
    MemberNotFound(String),

    #[error("No data source available for [{0}]")]
    Unsupported(String),

    #[error("Invalid data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A uniform view over the data a report is filled with.
///
/// Member names may be dotted paths (`address.city`) that walk into nested
/// objects. Names starting with `@` call a zero-argument accessor where the
/// source supports them.
pub trait DataSource: Send + Sync {
    /// Check if this source can resolve `member`.
    fn has(&self, member: &str) -> bool;

    /// Resolve `member`. Fails with [`DataSourceError::MemberNotFound`] when
    /// [`has`](DataSource::has) would return `false`.
    fn get(&self, member: &str) -> Result<Value, DataSourceError>;

    /// The top-level member names.
    fn members(&self) -> Vec<String>;

    /// The stable name this source is exposed under in script contexts.
    fn name(&self) -> &'static str;

    /// Every member as one JSON object, used as a script context.
    fn to_value(&self) -> Value {
        let mut object = Map::new();
        for member in self.members() {
            if let Ok(value) = self.get(&member) {
                object.insert(member, value);
            }
        }
        Value::Object(object)
    }
}

impl DataSource for Box<dyn DataSource> {
    fn has(&self, member: &str) -> bool {
        (**self).has(member)
    }

    fn get(&self, member: &str) -> Result<Value, DataSourceError> {
        (**self).get(member)
    }

    fn members(&self) -> Vec<String> {
        (**self).members()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

/// A source with no members. `get` returns `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDataSource;

impl DataSource for EmptyDataSource {
    fn has(&self, _member: &str) -> bool {
        false
    }

    fn get(&self, _member: &str) -> Result<Value, DataSourceError> {
        Ok(Value::Null)
    }

    fn members(&self) -> Vec<String> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "empty"
    }
}

/// Builds sources from loosely typed values.
pub struct DataSources;

impl DataSources {
    /// `null` becomes an [`EmptyDataSource`], an object a [`JsonDataSource`].
    pub fn from_value(value: Value) -> Result<Box<dyn DataSource>, DataSourceError> {
        match value {
            Value::Null => Ok(Box::new(EmptyDataSource)),
            Value::Object(object) => Ok(Box::new(JsonDataSource::from_object(object))),
            other => {
                log::error!("Can't create data source for [{}]", other);
                Err(DataSourceError::Unsupported(other.to_string()))
            }
        }
    }

    /// Builds one source per value, keeping their order.
    pub fn from_values(
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Vec<Box<dyn DataSource>>, DataSourceError> {
        values.into_iter().map(Self::from_value).collect()
    }
}

/// Walks a dotted path through nested objects. An exact key match wins over
/// splitting, so keys that contain dots stay reachable.
pub(crate) fn lookup<'a>(object: &'a Map<String, Value>, member: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(member) {
        return Some(value);
    }
    let (head, rest) = member.split_once('.')?;
    match object.get(head)? {
        Value::Object(inner) => lookup(inner, rest),
        _ => None,
    }
}
