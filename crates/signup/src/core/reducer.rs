//! Reducer: the single transition function of the sign-up form.
//!
//! `reduce(&mut FormState, FormEvent)` replaces the separate reactive
//! watchers of a component-style implementation with one explicit sequence
//! per event:
//!
//!   1. apply the value change
//!   2. identifier gate transition
//!   3. code gate transition
//!   4. recompute `FieldErrors` (validation engine)
//!
//! The submission decision is derived from the resulting state on read.
//!
//! Policy:
//!   - Side-effect free. Anything that has to happen outside the state record
//!     is returned as an `Effect`.
//!   - A rejected event (check while the button is disabled, code input for a
//!     student, blocked submit) returns `Err` and leaves the state untouched.
//!   - Verification resolutions whose token is stale are dropped silently.

use tracing::{debug, info};

use crate::core::effects::Effect;
use crate::core::event::FormEvent;
use crate::core::state::FormState;
use crate::form::error::FormError;
use crate::gate::VerificationTarget;

pub fn reduce(state: &mut FormState, event: FormEvent) -> Result<Vec<Effect>, FormError> {
    let effects = match event {
        FormEvent::IdentifierChanged(value) => {
            // Only a real change counts as an edit.
            if value == state.values.identifier {
                return Ok(Vec::new());
            }
            state.values.identifier = value;
            state.identifier.on_identifier_change(&state.values.identifier);
            Vec::new()
        }
        FormEvent::PasswordChanged(value) => {
            state.values.password = value;
            Vec::new()
        }
        FormEvent::ConfirmPasswordChanged(value) => {
            state.values.confirm_password = value;
            Vec::new()
        }
        FormEvent::DisplayNameChanged(value) => {
            state.values.display_name = value;
            Vec::new()
        }
        FormEvent::RoleChanged(role) => {
            if state.values.enrollment.switch_to(role) {
                debug!(%role, "role switched, code gate reset");
                vec![Effect::SelectRole(role)]
            } else {
                Vec::new()
            }
        }
        FormEvent::CodeChanged(value) => {
            let role = state.role();
            let gate = state
                .values
                .enrollment
                .code_gate_mut()
                .ok_or(FormError::NotApplicable { role })?;
            if value == gate.code() {
                return Ok(Vec::new());
            }
            gate.on_code_change(value);
            Vec::new()
        }
        FormEvent::CheckIdentifier => {
            let token = state
                .identifier
                .begin_check(&state.values.identifier, &mut state.tokens)?;
            vec![Effect::Verify(token)]
        }
        FormEvent::CheckCode => {
            let role = state.role();
            let gate = state
                .values
                .enrollment
                .code_gate_mut()
                .ok_or(FormError::NotApplicable { role })?;
            let token = gate.begin_check(&mut state.tokens)?;
            vec![Effect::Verify(token)]
        }
        FormEvent::VerificationResolved { token, outcome } => {
            let applied = match token.target {
                VerificationTarget::Identifier => {
                    state
                        .identifier
                        .resolve(&token, &outcome, &state.values.identifier)
                }
                VerificationTarget::Code => match state.values.enrollment.code_gate_mut() {
                    Some(gate) => gate.resolve(&token, &outcome),
                    None => {
                        debug!(token = token.id, "code resolution after switching to student");
                        false
                    }
                },
            };
            if applied {
                info!(
                    target_gate = %token.target,
                    accepted = outcome.is_accepted(),
                    "verification resolved"
                );
            }
            Vec::new()
        }
        FormEvent::Submit => {
            let blockers = state.blockers();
            if !blockers.is_empty() {
                return Err(FormError::SubmitBlocked(blockers));
            }
            vec![Effect::OpenConfirmModal { role: state.role() }]
        }
    };

    state.revalidate();
    Ok(effects)
}
