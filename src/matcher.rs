//! Exact attribute matching.
//!
//! Callers validate the selection first (`SelectionTuple::validate`); the
//! matcher only compares values.

use crate::data::{Record, RouteDataset, SelectionTuple};
use crate::source::{FormAnswer, FormSchema};

/// Result of a lookup. `NotFound` is an ordinary outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome<T> {
    /// A match.
    Found(T),
    /// No record or advice for the selection.
    NotFound,
}

impl<T> MatchOutcome<T> {
    /// True for `Found`.
    pub fn is_found(&self) -> bool {
        matches!(self, MatchOutcome::Found(_))
    }

    /// Convert into an `Option`.
    pub fn found(self) -> Option<T> {
        match self {
            MatchOutcome::Found(value) => Some(value),
            MatchOutcome::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for MatchOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(MatchOutcome::NotFound, MatchOutcome::Found)
    }
}

/// First record (in dataset order) whose selector values all equal the tuple's.
///
/// Comparison is exact and case-sensitive.
pub fn find_match<'a>(dataset: &'a RouteDataset, tuple: &SelectionTuple) -> MatchOutcome<&'a Record> {
    dataset
        .records()
        .iter()
        .find(|record| {
            dataset
                .selectors
                .iter()
                .all(|name| record.attribute(name) == tuple.get(name))
        })
        .into()
}

/// Per-question advice for a fully answered form, in question order.
///
/// Any absent advice leaf makes the whole lookup `NotFound`.
pub fn match_form<'a>(
    schema: &'a FormSchema,
    tuple: &SelectionTuple,
) -> MatchOutcome<Vec<FormAnswer<'a>>> {
    schema.answers_for(tuple).into()
}
