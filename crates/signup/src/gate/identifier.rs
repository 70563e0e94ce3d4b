//! Identifier Uniqueness Gate.
//!
//! ```text
//!            len >= 8             check ok
//!  Disabled ─────────▶ Enabled ──▶ Checking ──────▶ Confirmed
//!      ▲    ◀─────────    ▲           │                 │
//!      │      len < 8     └─ failed ──┘                 │
//!      └───────────── any edit (by new length) ─────────┘
//! ```
//!
//! The button state is edge-triggered: an edit only moves `Disabled ->
//! Enabled` when the length crosses up to the threshold and `Enabled ->
//! Disabled` when it drops below it. Edits that stay on one side of the
//! threshold leave the phase alone. Confirmation is bound to the exact string
//! that was checked; any edit after confirmation (or while a check is in
//! flight) falls back to whatever the new length implies.

use serde::Serialize;
use tracing::debug;

use super::{char_len, GateMessage, RequestToken, TokenSeq, VerificationOutcome, VerificationTarget};
use crate::form::error::FormError;

/// Identifier length at which the uniqueness check becomes available.
pub const CHECK_THRESHOLD: usize = 8;

pub const AVAILABLE_MESSAGE: &str = "This identifier is available.";
pub const TAKEN_MESSAGE: &str = "This identifier is already in use.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentifierPhase {
    #[default]
    Disabled,
    Enabled,
    Checking(RequestToken),
    Confirmed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierGate {
    phase: IdentifierPhase,
    message: GateMessage,
}

/// Render view: `{ confirmed, message, checkEnabled }` (+ in-flight flag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierGateState {
    pub confirmed: bool,
    pub message: GateMessage,
    pub check_enabled: bool,
    pub checking: bool,
}

impl IdentifierGate {
    pub fn phase(&self) -> &IdentifierPhase {
        &self.phase
    }

    pub fn confirmed(&self) -> bool {
        matches!(self.phase, IdentifierPhase::Confirmed)
    }

    pub fn check_enabled(&self) -> bool {
        matches!(self.phase, IdentifierPhase::Enabled)
    }

    pub fn in_flight(&self) -> Option<&RequestToken> {
        match &self.phase {
            IdentifierPhase::Checking(token) => Some(token),
            _ => None,
        }
    }

    pub fn message(&self) -> &GateMessage {
        &self.message
    }

    pub fn state(&self) -> IdentifierGateState {
        IdentifierGateState {
            confirmed: self.confirmed(),
            message: self.message.clone(),
            check_enabled: self.check_enabled(),
            checking: self.in_flight().is_some(),
        }
    }

    /// React to a new identifier value.
    pub fn on_identifier_change(&mut self, value: &str) {
        let long_enough = char_len(value) >= CHECK_THRESHOLD;
        if let Some(token) = self.in_flight() {
            debug!(token = token.id, "identifier edited while check in flight");
        }
        match self.phase {
            IdentifierPhase::Confirmed | IdentifierPhase::Checking(_) => {
                self.phase = Self::phase_for(long_enough);
                self.message = GateMessage::None;
            }
            IdentifierPhase::Disabled if long_enough => {
                self.phase = IdentifierPhase::Enabled;
            }
            IdentifierPhase::Enabled if !long_enough => {
                self.phase = IdentifierPhase::Disabled;
            }
            IdentifierPhase::Disabled | IdentifierPhase::Enabled => {}
        }
        // A failure message describes the previous candidate only.
        if self.message.is_failure() {
            self.message = GateMessage::None;
        }
    }

    /// Start a uniqueness check for `value`. Only valid while `Enabled`.
    pub fn begin_check(
        &mut self,
        value: &str,
        tokens: &mut TokenSeq,
    ) -> Result<RequestToken, FormError> {
        if !self.check_enabled() {
            return Err(FormError::CheckUnavailable {
                target: VerificationTarget::Identifier,
            });
        }
        let token = tokens.issue(VerificationTarget::Identifier, value);
        self.phase = IdentifierPhase::Checking(token.clone());
        self.message = GateMessage::None;
        Ok(token)
    }

    /// Apply a resolution. Returns false when it was stale and got dropped.
    pub fn resolve(
        &mut self,
        token: &RequestToken,
        outcome: &VerificationOutcome,
        live: &str,
    ) -> bool {
        if !token.matches(self.in_flight(), live) {
            debug!(token = token.id, "dropping stale identifier resolution");
            return false;
        }
        match outcome {
            VerificationOutcome::Accepted => {
                self.phase = IdentifierPhase::Confirmed;
                self.message = GateMessage::Success(AVAILABLE_MESSAGE.to_string());
            }
            VerificationOutcome::Rejected(reason) => {
                self.phase = Self::phase_for(char_len(live) >= CHECK_THRESHOLD);
                let text = if reason.is_empty() {
                    TAKEN_MESSAGE.to_string()
                } else {
                    reason.clone()
                };
                self.message = GateMessage::Failure(text);
            }
        }
        true
    }

    fn phase_for(long_enough: bool) -> IdentifierPhase {
        if long_enough {
            IdentifierPhase::Enabled
        } else {
            IdentifierPhase::Disabled
        }
    }
}
