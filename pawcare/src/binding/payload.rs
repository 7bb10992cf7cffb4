use std::collections::BTreeMap;
use std::collections::btree_map;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use super::{BindingSource, DeserializationError, adapter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

/// Flat key/value view of a query string.
///
/// `key[]=v` pairs accumulate into [`QueryValue::Many`]; a plain key that
/// appears more than once keeps its last value. A key given both ways is
/// rejected rather than letting one form overwrite the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery(BTreeMap<String, QueryValue>);

impl RawQuery {
    pub fn parse(query: &str) -> Result<Self, DeserializationError> {
        let mut entries = BTreeMap::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            let (name, list) = match key.strip_suffix("[]") {
                Some(name) => (name.to_string(), true),
                None => (key.into_owned(), false),
            };

            match (entries.entry(name), list) {
                (btree_map::Entry::Vacant(e), true) => {
                    e.insert(QueryValue::Many(vec![value]));
                }
                (btree_map::Entry::Vacant(e), false) => {
                    e.insert(QueryValue::Single(value));
                }
                (btree_map::Entry::Occupied(mut e), true) => match e.get_mut() {
                    QueryValue::Many(values) => values.push(value),
                    QueryValue::Single(_) => return Err(mixed_forms(e.key())),
                },
                (btree_map::Entry::Occupied(mut e), false) => match e.get_mut() {
                    QueryValue::Single(current) => *current = value,
                    QueryValue::Many(_) => return Err(mixed_forms(e.key())),
                },
            }
        }

        Ok(Self(entries))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn mixed_forms(key: &str) -> DeserializationError {
    DeserializationError::Query(format!(
        "key `{key}` is given both as a list and as a single value"
    ))
}

/// Untyped input of one request, read from exactly one source.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Body(Bytes),
    Query(RawQuery),
}

impl RawPayload {
    /// Reads the payload from `source` only; the other channel is never looked at.
    pub async fn extract<S>(
        source: BindingSource,
        req: Request,
        state: &S,
    ) -> Result<Self, DeserializationError>
    where
        S: Send + Sync,
    {
        match source {
            BindingSource::Body => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| DeserializationError::Body(e.body_text()))?;
                Ok(Self::Body(bytes))
            }
            BindingSource::Query => Ok(Self::Query(RawQuery::parse(
                req.uri().query().unwrap_or_default(),
            )?)),
        }
    }

    #[must_use]
    pub const fn source(&self) -> BindingSource {
        match self {
            Self::Body(_) => BindingSource::Body,
            Self::Query(_) => BindingSource::Query,
        }
    }

    /// Deserializes the payload into a candidate of type `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DeserializationError> {
        match self {
            Self::Body(bytes) => Ok(serde_json::from_slice(bytes)?),
            Self::Query(query) => adapter::from_query(query),
        }
    }
}
