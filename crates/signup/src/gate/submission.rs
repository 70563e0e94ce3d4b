//! Submission Gate.
//!
//! `can_submit = is_valid && errors.is_empty() && identifier confirmed &&
//! (student || code verified)`. Never stored; recomputed on every read.
//! [`blockers`] lists what stands in the way, which is what a rejected submit
//! reports back.

use std::fmt;

use serde::Serialize;

use super::identifier::IdentifierGate;
use crate::form::field::FieldKey;
use crate::form::validation::Validation;
use crate::form::values::Enrollment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "blocker", content = "fields", rename_all = "camelCase")]
pub enum Blocker {
    InvalidFields(Vec<FieldKey>),
    IdentifierUnconfirmed,
    CodeUnverified,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocker::InvalidFields(keys) => {
                let names: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
                write!(f, "invalid fields [{}]", names.join(", "))
            }
            Blocker::IdentifierUnconfirmed => write!(f, "identifier not confirmed"),
            Blocker::CodeUnverified => write!(f, "invitation code not verified"),
        }
    }
}

pub fn can_submit(validation: &Validation, identifier: &IdentifierGate, enrollment: &Enrollment) -> bool {
    validation.is_valid
        && validation.errors.is_empty()
        && identifier.confirmed()
        && enrollment.code_satisfied()
}

pub fn blockers(
    validation: &Validation,
    identifier: &IdentifierGate,
    enrollment: &Enrollment,
) -> Vec<Blocker> {
    let mut out = Vec::new();
    if !validation.errors.is_empty() {
        out.push(Blocker::InvalidFields(validation.errors.keys().collect()));
    }
    if !identifier.confirmed() {
        out.push(Blocker::IdentifierUnconfirmed);
    }
    if !enrollment.code_satisfied() {
        out.push(Blocker::CodeUnverified);
    }
    out
}
