use thiserror::Error;

use crate::form::values::Role;
use crate::gate::submission::Blocker;
use crate::gate::VerificationTarget;

/// Rejected events and boundary failures.
///
/// Schema violations and failed verifications are form state, not errors;
/// they show up in `FieldErrors` and the gate views instead.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("{target} check is not available right now")]
    CheckUnavailable { target: VerificationTarget },

    #[error("invitation code does not apply to role {role}")]
    NotApplicable { role: Role },

    #[error("submission blocked: {}", join_blockers(.0))]
    SubmitBlocked(Vec<Blocker>),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("script line {line}: {reason}")]
    Script { line: usize, reason: String },

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_blockers(blockers: &[Blocker]) -> String {
    blockers
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
