use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

use super::payload_from_json;
use crate::data::{Payload, SelectionTuple};
use crate::errors::RouteError;
use crate::types::{OptionId, QuestionId};

/// One selectable answer of a question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Key used in the advice table.
    pub id: OptionId,
    /// Display label; falls back to `id` when the document leaves it blank.
    #[serde(default)]
    pub label: String,
}

/// A form question with its options in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Key used in selections and the advice table.
    pub id: QuestionId,
    #[serde(default)]
    /// Text shown to the visitor.
    pub label: String,
    /// Answers in declaration order.
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Declared option with `id`, if any.
    pub fn option(&self, id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.id == id)
    }
}

#[derive(Deserialize)]
struct RawFormSchema {
    questions: Vec<Question>,
    #[serde(default)]
    advice: IndexMap<QuestionId, IndexMap<OptionId, Value>>,
}

/// Per-question advice resolved for one answered option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormAnswer<'a> {
    /// Answered question.
    pub question: &'a Question,
    /// Chosen option.
    pub option: &'a QuestionOption,
    /// Advice for that option.
    pub payload: &'a Payload,
}

/// Declarative form: ordered questions plus an advice table keyed by
/// question id → option id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    questions: Vec<Question>,
    advice: IndexMap<QuestionId, IndexMap<OptionId, Payload>>,
}

impl FormSchema {
    /// Build a schema, filling blank labels from ids.
    pub fn new(
        questions: Vec<Question>,
        advice: IndexMap<QuestionId, IndexMap<OptionId, Payload>>,
    ) -> Self {
        let questions = questions
            .into_iter()
            .map(|mut question| {
                if question.label.trim().is_empty() {
                    question.label = question.id.clone();
                }
                for option in &mut question.options {
                    if option.label.trim().is_empty() {
                        option.label = option.id.clone();
                    }
                }
                question
            })
            .collect();
        Self { questions, advice }
    }

    /// Decode a `{questions: [...], advice: {...}}` document.
    pub fn from_json(source_id: &str, json: Value) -> Result<Self, RouteError> {
        let raw: RawFormSchema = serde_json::from_value(json).map_err(|err| RouteError::Parse {
            source_id: source_id.to_string(),
            details: format!("invalid form schema: {err}"),
        })?;
        if raw.questions.is_empty() {
            return Err(RouteError::Parse {
                source_id: source_id.to_string(),
                details: "form schema declares no questions".to_string(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = raw.questions.iter().find(|q| !seen.insert(q.id.as_str())) {
            return Err(RouteError::Parse {
                source_id: source_id.to_string(),
                details: format!("question '{}' is declared more than once", duplicate.id),
            });
        }

        let mut advice = IndexMap::new();
        for (question_id, options) in raw.advice {
            let mut decoded = IndexMap::new();
            for (option_id, leaf) in options {
                match payload_from_json(&leaf) {
                    Some(payload) => {
                        decoded.insert(option_id, payload);
                    }
                    None => warn!(
                        "[route_planner:source] source='{}' skipping unrecognized advice {}/{}",
                        source_id, question_id, option_id
                    ),
                }
            }
            advice.insert(question_id, decoded);
        }
        Ok(Self::new(raw.questions, advice))
    }

    /// Decode a catalog whose top-level keys are dimensions and whose nested keys
    /// are options carrying a `*_recommendations` list. Each dimension becomes a
    /// question; options keep document order.
    pub fn from_dimension_catalog(source_id: &str, json: &Value) -> Result<Self, RouteError> {
        let Value::Object(dimensions) = json else {
            return Err(RouteError::Parse {
                source_id: source_id.to_string(),
                details: "dimension catalog must be a JSON object".to_string(),
            });
        };

        let mut questions = Vec::new();
        let mut advice = IndexMap::new();
        for (dimension, entries) in dimensions {
            let Value::Object(entries) = entries else {
                warn!(
                    "[route_planner:source] source='{}' dimension '{}' is not an object; skipping",
                    source_id, dimension
                );
                continue;
            };
            let mut options = Vec::new();
            let mut answers = IndexMap::new();
            for (option_id, leaf) in entries {
                let Some(payload) = payload_from_json(leaf) else {
                    warn!(
                        "[route_planner:source] source='{}' skipping unrecognized advice {}/{}",
                        source_id, dimension, option_id
                    );
                    continue;
                };
                options.push(QuestionOption {
                    id: option_id.clone(),
                    label: option_id.clone(),
                });
                answers.insert(option_id.clone(), payload);
            }
            questions.push(Question {
                id: dimension.clone(),
                label: dimension.clone(),
                options,
            });
            advice.insert(dimension.clone(), answers);
        }

        if questions.is_empty() {
            return Err(RouteError::Parse {
                source_id: source_id.to_string(),
                details: "dimension catalog contains no dimensions".to_string(),
            });
        }
        Ok(Self::new(questions, advice))
    }

    /// Questions in declaration order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Question ids in declaration order.
    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }

    /// Advice for one (question, option) pair.
    pub fn advice(&self, question: &str, option: &str) -> Option<&Payload> {
        self.advice.get(question)?.get(option)
    }

    /// Number of (question, option) pairs that carry advice.
    pub fn advice_len(&self) -> usize {
        self.advice.values().map(IndexMap::len).sum()
    }

    /// Resolve every question's advice for `tuple`, in question order.
    ///
    /// Returns `None` as soon as one question is unanswered, names an undeclared
    /// option, or has no advice leaf.
    pub fn answers_for(&self, tuple: &SelectionTuple) -> Option<Vec<FormAnswer<'_>>> {
        self.questions
            .iter()
            .map(|question| {
                let chosen = tuple.get(&question.id)?;
                let option = question.option(chosen)?;
                let payload = self.advice(&question.id, &option.id)?;
                Some(FormAnswer {
                    question,
                    option,
                    payload,
                })
            })
            .collect()
    }
}
