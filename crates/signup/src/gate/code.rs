//! Invitation Code Gate (teachers only).
//!
//! Lives inside `Enrollment::Teacher`; a student enrollment has no code gate
//! at all, and the render boundary shows [`CodeGateState::not_applicable`]
//! instead.
//!
//! Unlike the identifier gate the button state is level-triggered: after
//! every code edit `check_enabled = len(code) == CODE_LENGTH && !verified`.
//! A verified code stays verified across later edits; only a role switch
//! resets it.

use serde::Serialize;
use tracing::debug;

use super::{char_len, RequestToken, TokenSeq, VerificationOutcome, VerificationTarget};
use crate::form::error::FormError;

/// Exact length of an invitation code.
pub const CODE_LENGTH: usize = 8;

pub const VERIFIED_MESSAGE: &str = "Verification complete.";
pub const INVALID_MESSAGE: &str = "This invitation code could not be verified.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeGate {
    code: String,
    verified: bool,
    check_enabled: bool,
    in_flight: Option<RequestToken>,
    message: String,
    error: Option<String>,
}

/// Error slot of the code gate render view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeError {
    pub present: bool,
    pub message: String,
}

/// Render view: `{ verified, message, checkEnabled, error }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGateState {
    pub applicable: bool,
    pub verified: bool,
    pub message: String,
    pub check_enabled: bool,
    pub checking: bool,
    pub error: CodeError,
}

impl CodeGateState {
    /// Neutral "already satisfied" shape shown for students.
    pub fn not_applicable() -> Self {
        Self {
            applicable: false,
            verified: true,
            message: String::new(),
            check_enabled: false,
            checking: false,
            error: CodeError::default(),
        }
    }
}

impl CodeGate {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn check_enabled(&self) -> bool {
        self.check_enabled
    }

    pub fn in_flight(&self) -> Option<&RequestToken> {
        self.in_flight.as_ref()
    }

    pub fn state(&self) -> CodeGateState {
        CodeGateState {
            applicable: true,
            verified: self.verified,
            message: self.message.clone(),
            check_enabled: self.check_enabled,
            checking: self.in_flight.is_some(),
            error: CodeError {
                present: self.error.is_some(),
                message: self.error.clone().unwrap_or_default(),
            },
        }
    }

    pub fn on_code_change(&mut self, value: impl Into<String>) {
        self.code = value.into();
        if let Some(token) = self.in_flight.take() {
            debug!(token = token.id, "invitation code edited while check in flight");
        }
        self.recompute();
    }

    /// Start a code check. Only valid while the button is enabled.
    pub fn begin_check(&mut self, tokens: &mut TokenSeq) -> Result<RequestToken, FormError> {
        if !self.check_enabled {
            return Err(FormError::CheckUnavailable {
                target: VerificationTarget::Code,
            });
        }
        let token = tokens.issue(VerificationTarget::Code, &self.code);
        self.in_flight = Some(token.clone());
        self.check_enabled = false;
        Ok(token)
    }

    /// Apply a resolution. Returns false when it was stale and got dropped.
    pub fn resolve(&mut self, token: &RequestToken, outcome: &VerificationOutcome) -> bool {
        if !token.matches(self.in_flight.as_ref(), &self.code) {
            debug!(token = token.id, "dropping stale invitation code resolution");
            return false;
        }
        self.in_flight = None;
        match outcome {
            VerificationOutcome::Accepted => {
                self.verified = true;
                self.message = VERIFIED_MESSAGE.to_string();
                self.error = None;
            }
            VerificationOutcome::Rejected(reason) => {
                self.verified = false;
                self.message.clear();
                self.error = Some(if reason.is_empty() {
                    INVALID_MESSAGE.to_string()
                } else {
                    reason.clone()
                });
            }
        }
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.check_enabled =
            self.in_flight.is_none() && !self.verified && char_len(&self.code) == CODE_LENGTH;
    }
}
