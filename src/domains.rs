//! Attribute domains: the distinct values offered by each selection control.

use indexmap::{IndexMap, IndexSet};

use crate::data::{Record, RouteDataset};
use crate::source::{FormSchema, LoadedContent};
use crate::types::{AttributeName, AttributeValue};

/// Distinct selectable values per selector attribute, in page order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeDomains {
    domains: IndexMap<AttributeName, Vec<AttributeValue>>,
}

impl AttributeDomains {
    /// Sorted distinct values of every selector of `dataset`.
    pub fn from_dataset(dataset: &RouteDataset) -> Self {
        Self::from_records(dataset.records(), &dataset.selectors)
    }

    /// Sorted (byte-wise, case-sensitive) distinct values of `selectors` across `records`.
    pub fn from_records(records: &[Record], selectors: &[AttributeName]) -> Self {
        let domains = selectors
            .iter()
            .map(|name| {
                let mut values: Vec<AttributeValue> = records
                    .iter()
                    .filter_map(|record| record.attribute(name))
                    .map(str::to_string)
                    .collect::<IndexSet<_>>()
                    .into_iter()
                    .collect();
                values.sort();
                (name.clone(), values)
            })
            .collect();
        Self { domains }
    }

    /// Option ids per question, in declaration order (no sorting).
    pub fn from_form(schema: &FormSchema) -> Self {
        let domains = schema
            .questions()
            .iter()
            .map(|question| {
                let values = question
                    .options
                    .iter()
                    .map(|option| option.id.clone())
                    .collect::<IndexSet<_>>()
                    .into_iter()
                    .collect();
                (question.id.clone(), values)
            })
            .collect();
        Self { domains }
    }

    /// Domains appropriate for whichever content was loaded.
    pub fn from_content(content: &LoadedContent) -> Self {
        match content {
            LoadedContent::Records(dataset) => Self::from_dataset(dataset),
            LoadedContent::Form(schema) => Self::from_form(schema),
        }
    }

    /// Values offered for `attribute`.
    pub fn values(&self, attribute: &str) -> Option<&[AttributeValue]> {
        self.domains.get(attribute).map(Vec::as_slice)
    }

    /// True when `value` is one of the values offered for `attribute`.
    pub fn contains(&self, attribute: &str, value: &str) -> bool {
        self.values(attribute)
            .is_some_and(|values| values.iter().any(|candidate| candidate == value))
    }

    /// Attributes and their values, in page order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AttributeValue])> {
        self.domains
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of attributes with a domain.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// True before any content was loaded.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
