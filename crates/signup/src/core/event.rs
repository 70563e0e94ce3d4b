use serde::{Deserialize, Serialize};
use strum::Display;

use crate::form::values::Role;
use crate::gate::{RequestToken, VerificationOutcome};

/// Every input the form reacts to: keystrokes, clicks, role changes and
/// verification resolutions coming back from the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum FormEvent {
    IdentifierChanged(String),
    PasswordChanged(String),
    ConfirmPasswordChanged(String),
    DisplayNameChanged(String),
    RoleChanged(Role),
    CodeChanged(String),
    CheckIdentifier,
    CheckCode,
    VerificationResolved {
        token: RequestToken,
        outcome: VerificationOutcome,
    },
    Submit,
}

impl FormEvent {
    /// True for pure text edits (the high-frequency, keystroke-level events).
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            FormEvent::IdentifierChanged(_)
                | FormEvent::PasswordChanged(_)
                | FormEvent::ConfirmPasswordChanged(_)
                | FormEvent::DisplayNameChanged(_)
                | FormEvent::CodeChanged(_)
        )
    }
}
