//! Field Validation Engine.
//!
//! Re-evaluated synchronously after every value change (validate-on-change).
//! Two layers produce the final `FieldErrors`:
//!
//! 1. Schema layer: every field that applies to the current role is checked
//!    against its rules; the first failing rule becomes the field's issue.
//!    `Validation::is_valid` reflects this layer only.
//! 2. Gate layer: [`uniqueness_prompt`] injects `FieldIssue::PendingUniquenessCheck`
//!    on the identifier while it sits at check length without a confirmed
//!    uniqueness check. It replaces any schema issue on that field for display
//!    and disappears as soon as the identifier gate confirms.
//!
//! The engine never talks to the network and never mutates gate state.

use std::collections::BTreeMap;

use serde::Serialize;

use super::field::FieldKey;
use super::schema::{FormSchema, IDENTIFIER_MAX_LEN};
use super::values::FormValues;
use crate::gate::char_len;
use crate::gate::identifier::{IdentifierGate, CHECK_THRESHOLD};

pub const UNIQUENESS_PROMPT: &str = "Please check whether this identifier is available.";

/// A single entry of `FieldErrors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldIssue {
    /// The value violates a schema rule.
    Schema { rule: &'static str, message: String },
    /// Synthetic: the identifier needs a uniqueness check before submission.
    PendingUniquenessCheck,
}

impl FieldIssue {
    pub fn message(&self) -> &str {
        match self {
            FieldIssue::Schema { message, .. } => message,
            FieldIssue::PendingUniquenessCheck => UNIQUENESS_PROMPT,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, FieldIssue::PendingUniquenessCheck)
    }
}

/// Field name -> current issue. Derived state; rebuilt on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldKey, FieldIssue>);

impl FieldErrors {
    pub fn get(&self, key: FieldKey) -> Option<&FieldIssue> {
        self.0.get(&key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldIssue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    fn insert(&mut self, key: FieldKey, issue: FieldIssue) {
        self.0.insert(key, issue);
    }
}

/// Output of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
    /// Schema-level validity, independent of the synthetic prompt.
    pub is_valid: bool,
}

/// Schema layer only.
pub fn schema_errors(schema: &FormSchema, values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for field in schema.fields_for(values.role()) {
        if let Some(check) = field.first_violation(values) {
            errors.insert(
                field.key,
                FieldIssue::Schema {
                    rule: check.rule.name(),
                    message: check.message.clone(),
                },
            );
        }
    }
    errors
}

/// Gate layer: the synthetic identifier prompt, if it applies.
///
/// An identifier over the maximum length keeps its schema error visible;
/// checking availability cannot fix it.
pub fn uniqueness_prompt(identifier: &str, gate: &IdentifierGate) -> Option<FieldIssue> {
    let len = char_len(identifier);
    (len >= CHECK_THRESHOLD && len <= IDENTIFIER_MAX_LEN && !gate.confirmed())
        .then_some(FieldIssue::PendingUniquenessCheck)
}

/// Full engine run: schema layer, then the gate layer on top.
pub fn validate(schema: &FormSchema, values: &FormValues, gate: &IdentifierGate) -> Validation {
    let mut errors = schema_errors(schema, values);
    let is_valid = errors.is_empty();
    if let Some(prompt) = uniqueness_prompt(&values.identifier, gate) {
        errors.insert(FieldKey::Identifier, prompt);
    }
    Validation { errors, is_valid }
}
