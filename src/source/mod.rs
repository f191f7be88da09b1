//! Dataset decoding.
//!
//! Ownership model:
//! - A `Transport` fetches the raw body (see `crate::transport`).
//! - `decode` turns that body into `LoadedContent` according to the page's
//!   `DatasetFormat`, producing either a flat `RouteDataset` or a `FormSchema`.
//! - Nothing here performs IO; decoding is a pure function of the body.

use serde_json::Value;
use tracing::debug;

use crate::config::RecordLayout;
use crate::constants::source::{BYTE_ORDER_MARK, RECOMMENDATIONS_SUFFIX};
use crate::csv::CsvTable;
use crate::data::{Payload, RouteDataset, RoutePlan};
use crate::errors::RouteError;

/// Declarative form schema and dimension catalogs.
pub mod form;
/// Nested-mapping flattening.
pub mod nested;

pub use form::{FormAnswer, FormSchema, Question, QuestionOption};

/// How a fetched dataset body is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetFormat {
    /// Header row plus data rows; columns mapped through the page's `RecordLayout`.
    Csv,
    /// JSON objects nested by successive selector dimensions, payload at the leaves.
    NestedJson,
    /// `{questions: [...], advice: {...}}` form schema.
    FormSchema,
    /// Top-level dimensions mapping option → `{ "*_recommendations": [...] }`.
    DimensionCatalog,
}

impl DatasetFormat {
    /// True for formats whose records are shaped by a `RecordLayout`.
    pub fn uses_record_layout(&self) -> bool {
        matches!(self, DatasetFormat::Csv | DatasetFormat::NestedJson)
    }
}

/// Decoded dataset, ready for domain derivation and matching.
#[derive(Clone, Debug)]
pub enum LoadedContent {
    /// Flat attribute-tagged records.
    Records(RouteDataset),
    /// Question list plus advice table.
    Form(FormSchema),
}

impl LoadedContent {
    /// Number of records, or number of answerable (question, option) pairs for forms.
    pub fn len(&self) -> usize {
        match self {
            LoadedContent::Records(dataset) => dataset.len(),
            LoadedContent::Form(schema) => schema.advice_len(),
        }
    }

    /// True when nothing answerable was decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selector attribute (or question id) names in page order.
    pub fn selectors(&self) -> Vec<String> {
        match self {
            LoadedContent::Records(dataset) => dataset.selectors.clone(),
            LoadedContent::Form(schema) => schema.question_ids(),
        }
    }
}

/// Decode `body` as `format` for page `source_id`.
pub fn decode(
    source_id: &str,
    body: &str,
    format: DatasetFormat,
    layout: &RecordLayout,
) -> Result<LoadedContent, RouteError> {
    let body = body.strip_prefix(BYTE_ORDER_MARK).unwrap_or(body);
    match format {
        DatasetFormat::Csv => {
            let table = CsvTable::parse(body);
            let records = layout.records_from_table(&table);
            let skipped = table.len() - records.len();
            if skipped > 0 {
                debug!(
                    "[route_planner:source] source='{}' dropped {} csv rows missing required columns",
                    source_id, skipped
                );
            }
            Ok(LoadedContent::Records(RouteDataset::new(
                source_id,
                layout.selector_names(),
                records,
            )))
        }
        DatasetFormat::NestedJson => {
            let json = parse_json(source_id, body)?;
            let records = nested::flatten(source_id, &json, layout)?;
            Ok(LoadedContent::Records(RouteDataset::new(
                source_id,
                layout.selector_names(),
                records,
            )))
        }
        DatasetFormat::FormSchema => {
            let json = parse_json(source_id, body)?;
            FormSchema::from_json(source_id, json).map(LoadedContent::Form)
        }
        DatasetFormat::DimensionCatalog => {
            let json = parse_json(source_id, body)?;
            FormSchema::from_dimension_catalog(source_id, &json).map(LoadedContent::Form)
        }
    }
}

fn parse_json(source_id: &str, body: &str) -> Result<Value, RouteError> {
    serde_json::from_str(body).map_err(|err| RouteError::Parse {
        source_id: source_id.to_string(),
        details: format!("invalid JSON: {err}"),
    })
}

/// Interpret a JSON leaf as a recommendation payload.
///
/// Accepted shapes: a string, an array of strings, a `{title, summary, schedule}`
/// plan, or an object carrying a `*_recommendations` string array.
pub fn payload_from_json(value: &Value) -> Option<Payload> {
    match value {
        Value::String(text) => Some(Payload::Text(text.clone())),
        Value::Array(items) => string_items(items).map(Payload::Items),
        Value::Object(fields) => {
            if fields.contains_key("schedule") {
                return serde_json::from_value::<RoutePlan>(value.clone())
                    .ok()
                    .map(Payload::Plan);
            }
            fields
                .iter()
                .find(|(key, value)| key.ends_with(RECOMMENDATIONS_SUFFIX) && value.is_array())
                .and_then(|(_, value)| value.as_array())
                .and_then(|items| string_items(items))
                .map(Payload::Items)
        }
        _ => None,
    }
}

fn string_items(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
