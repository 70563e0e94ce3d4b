//! Field keys, widget kinds and declarative validation rules.
//!
//! This module defines the declarative pieces of the sign-up form:
//! - `FieldKey`:  stable identifier of each input (also the FieldErrors key)
//! - `FieldKind`: the kind of widget that edits the field
//! - `Rule`:      one schema constraint, evaluated against the current values
//! - `FormField`: metadata + ordered list of `(Rule, message)` checks
//!
//! Everything here is pure data. Evaluation order and error derivation live
//! in `validation.rs`; the concrete sign-up rules are assembled in `schema.rs`.
//!
//! Usage:
//! ```ignore
//! use signup::form::{FieldKey, FieldKind, FormField, Rule};
//!
//! let field = FormField::new(FieldKey::DisplayName, "Name", FieldKind::Text)
//!     .rule(Rule::Required, "Please enter your name.")
//!     .rule(Rule::MaxLen(8), "Name must be at most 8 characters.");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::values::{FormValues, Role};
use crate::gate::char_len;

/// Stable key of a form input.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FieldKey {
    Identifier,
    Password,
    ConfirmPassword,
    DisplayName,
    Role,
    Code,
}

/// Widget used to edit a field.
///
/// - Text / Secret render as single-line editors (Secret is masked in snapshots)
/// - Choice is the radio group; `options` lists the accepted values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Choice { options: Vec<String> },
}

/// One schema constraint.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must not be empty.
    Required,
    MinLen(usize),
    MaxLen(usize),
    ExactLen(usize),
    /// Whole value must match the pattern (anchored by the pattern itself).
    Pattern(&'static Regex),
    /// Every pattern must match somewhere in the value.
    ContainsAll(Vec<&'static Regex>),
    /// Value must equal the value of another field.
    Matches(FieldKey),
    /// Value must be one of the listed strings.
    OneOf(&'static [&'static str]),
}

impl Rule {
    /// Short machine name, carried in `FieldIssue::Schema`.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MinLen(_) => "min",
            Rule::MaxLen(_) => "max",
            Rule::ExactLen(_) => "length",
            Rule::Pattern(_) => "matches",
            Rule::ContainsAll(_) => "complexity",
            Rule::Matches(_) => "equals",
            Rule::OneOf(_) => "oneOf",
        }
    }

    /// Check `value` against this rule. `values` supplies cross-field context.
    pub fn holds(&self, value: &str, values: &FormValues) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::MinLen(n) => char_len(value) >= *n,
            Rule::MaxLen(n) => char_len(value) <= *n,
            Rule::ExactLen(n) => char_len(value) == *n,
            Rule::Pattern(re) => re.is_match(value),
            Rule::ContainsAll(patterns) => patterns.iter().all(|re| re.is_match(value)),
            Rule::Matches(other) => values.value(*other) == Some(value),
            Rule::OneOf(options) => options.iter().any(|o| *o == value),
        }
    }
}

/// A rule plus the message shown when it fails.
#[derive(Debug, Clone)]
pub struct Check {
    pub rule: Rule,
    pub message: String,
}

/// Declarative description of a form field.
///
/// `checks` are evaluated in order; the first failing check produces the
/// field's error. `only_for` restricts the field to one role (the invitation
/// code exists for teachers only).
#[derive(Debug, Clone)]
pub struct FormField {
    pub key: FieldKey,
    pub label: String,
    pub kind: FieldKind,
    pub help: Option<String>,
    pub checks: Vec<Check>,
    pub only_for: Option<Role>,
}

impl FormField {
    pub fn new(key: FieldKey, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
            help: None,
            checks: Vec::new(),
            only_for: None,
        }
    }

    /// Attach optional help / hint text shown beneath the field.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Append a check; order matters.
    pub fn rule(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.checks.push(Check {
            rule,
            message: message.into(),
        });
        self
    }

    pub fn only_for(mut self, role: Role) -> Self {
        self.only_for = Some(role);
        self
    }

    /// True if the field takes part in validation for `role`.
    pub fn applies_to(&self, role: Role) -> bool {
        self.only_for.map_or(true, |r| r == role)
    }

    /// First failing check for the current values, if any.
    pub fn first_violation(&self, values: &FormValues) -> Option<&Check> {
        let value = values.value(self.key).unwrap_or("");
        self.checks.iter().find(|c| !c.rule.holds(value, values))
    }

    pub fn is_secret(&self) -> bool {
        matches!(self.kind, FieldKind::Secret)
    }
}
