use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::csv::encode_rows;
use crate::errors::RouteError;

pub use crate::types::{AttributeName, AttributeValue, SourceId};

/// One time-stamped stop of a structured route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Free-form time label (e.g. `09:00`).
    pub time: String,
    /// Stop name.
    pub title: String,
    /// What to do there.
    pub description: String,
}

/// Structured recommendation: a titled, summarized schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Plan title.
    pub title: String,
    /// One-line summary shown under the title.
    pub summary: String,
    /// Stops in presentation order.
    pub schedule: Vec<ScheduleItem>,
}

/// Recommendation content carried by a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// Raw text cell; split into items or lines at render time.
    Text(String),
    /// Pre-split recommendation items.
    Items(Vec<String>),
    /// Structured schedule.
    Plan(RoutePlan),
}

impl Payload {
    /// Text form used when the payload is written back to a CSV cell.
    pub fn to_cell(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Items(items) => items.join(crate::constants::render::ITEM_SEPARATOR),
            Payload::Plan(plan) => plan.title.clone(),
        }
    }
}

/// One attribute-tagged recommendation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Selector attribute values keyed by canonical attribute name, in page order.
    pub attributes: IndexMap<AttributeName, AttributeValue>,
    /// Recommendation content.
    pub payload: Payload,
}

impl Record {
    /// Create a record from selector pairs and a payload.
    pub fn new<K, V, I>(attributes: I, payload: Payload) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<AttributeName>,
        V: Into<AttributeValue>,
    {
        Self {
            attributes: attributes
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            payload,
        }
    }

    /// Value of a selector attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Immutable, ordered collection of records loaded for one page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteDataset {
    /// Page/source identifier the dataset was loaded for.
    pub source: SourceId,
    /// When the dataset finished loading.
    pub loaded_at: DateTime<Utc>,
    /// Selector attribute names in page order.
    pub selectors: Vec<AttributeName>,
    records: Vec<Record>,
}

impl RouteDataset {
    /// Build a dataset stamped with the current time.
    pub fn new(
        source: impl Into<SourceId>,
        selectors: Vec<AttributeName>,
        records: Vec<Record>,
    ) -> Self {
        Self {
            source: source.into(),
            loaded_at: Utc::now(),
            selectors,
            records,
        }
    }

    /// Records in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no row survived decoding.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize as CSV with the selector columns followed by `payload_column`.
    pub fn to_csv(&self, payload_column: &str) -> String {
        let mut header: Vec<&str> = self.selectors.iter().map(String::as_str).collect();
        header.push(payload_column);
        let rows: Vec<Vec<String>> = self
            .records
            .iter()
            .map(|record| {
                let mut row: Vec<String> = self
                    .selectors
                    .iter()
                    .map(|name| record.attribute(name).unwrap_or_default().to_string())
                    .collect();
                row.push(record.payload.to_cell());
                row
            })
            .collect();
        encode_rows(&header, &rows)
    }
}

/// Load progress of a page's dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Fetch not finished yet.
    Pending,
    /// Dataset decoded and ready.
    Loaded,
    /// Terminal failure with a diagnostic reason.
    Failed(String),
}

impl LoadState {
    /// True once the load finished, successfully or not.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, LoadState::Pending)
    }
}

/// User choices keyed by selector attribute, built incrementally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTuple {
    values: IndexMap<AttributeName, AttributeValue>,
}

impl SelectionTuple {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`SelectionTuple::set`].
    pub fn with(mut self, attribute: impl Into<AttributeName>, value: impl Into<AttributeValue>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Record (or replace) the value chosen for `attribute`.
    pub fn set(&mut self, attribute: impl Into<AttributeName>, value: impl Into<AttributeValue>) {
        self.values.insert(attribute.into(), value.into());
    }

    /// Forget the value chosen for `attribute`.
    pub fn clear(&mut self, attribute: &str) {
        self.values.shift_remove(attribute);
    }

    /// Value chosen for `attribute`, if any.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).map(String::as_str)
    }

    /// Chosen values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Selector attributes in `selectors` that have no non-empty value.
    pub fn missing<'a>(&self, selectors: &'a [AttributeName]) -> Vec<&'a AttributeName> {
        selectors
            .iter()
            .filter(|name| self.get(name).is_none_or(|value| value.is_empty()))
            .collect()
    }

    /// Reject the tuple unless every selector attribute is non-empty.
    pub fn validate(&self, selectors: &[AttributeName]) -> Result<(), RouteError> {
        let missing = self.missing(selectors);
        if missing.is_empty() {
            return Ok(());
        }
        Err(RouteError::ValidationIncomplete {
            missing: missing.into_iter().cloned().collect(),
        })
    }
}

impl<K, V> FromIterator<(K, V)> for SelectionTuple
where
    K: Into<AttributeName>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tuple = Self::new();
        for (key, value) in iter {
            tuple.set(key, value);
        }
        tuple
    }
}
