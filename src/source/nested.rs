use serde_json::{Map, Value};
use tracing::warn;

use super::payload_from_json;
use crate::config::RecordLayout;
use crate::data::Record;
use crate::errors::RouteError;
use crate::types::AttributeName;

/// Flatten objects nested by successive selector dimensions into records.
///
/// Depth equals the number of selectors in `layout`; keys along each full path
/// become the selector values. Paths are visited depth-first in document order.
/// Branches that end early or carry an unrecognized leaf are skipped.
pub fn flatten(
    source_id: &str,
    json: &Value,
    layout: &RecordLayout,
) -> Result<Vec<Record>, RouteError> {
    let Value::Object(root) = json else {
        return Err(RouteError::Parse {
            source_id: source_id.to_string(),
            details: "nested dataset must be a JSON object at the top level".to_string(),
        });
    };
    let dimensions = layout.selector_names();
    if dimensions.is_empty() {
        return Err(RouteError::Configuration(format!(
            "page '{source_id}' uses nested JSON without selector dimensions"
        )));
    }

    let mut walker = Walker {
        source_id,
        dimensions: &dimensions,
        payload_key: &layout.payload.name,
        path: Vec::with_capacity(dimensions.len()),
        records: Vec::new(),
    };
    walker.visit(root);
    Ok(walker.records)
}

struct Walker<'a> {
    source_id: &'a str,
    dimensions: &'a [AttributeName],
    payload_key: &'a str,
    path: Vec<String>,
    records: Vec<Record>,
}

impl Walker<'_> {
    fn visit(&mut self, node: &Map<String, Value>) {
        for (key, child) in node {
            self.path.push(key.clone());
            if self.path.len() == self.dimensions.len() {
                self.push_leaf(child);
            } else if let Value::Object(inner) = child {
                self.visit(inner);
            } else {
                warn!(
                    "[route_planner:source] source='{}' branch '{}' ends before dimension '{}'",
                    self.source_id,
                    self.path.join(" > "),
                    self.dimensions[self.path.len()]
                );
            }
            self.path.pop();
        }
    }

    fn push_leaf(&mut self, leaf: &Value) {
        let leaf = leaf.get(self.payload_key).unwrap_or(leaf);
        match payload_from_json(leaf) {
            Some(payload) => self.records.push(Record::new(
                self.dimensions.iter().cloned().zip(self.path.iter().cloned()),
                payload,
            )),
            None => warn!(
                "[route_planner:source] source='{}' skipping unrecognized payload at '{}'",
                self.source_id,
                self.path.join(" > ")
            ),
        }
    }
}
