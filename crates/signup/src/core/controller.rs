//! `SignUpForm`: the form instance.
//!
//! Owns the form-state record, the verification executor and the receiving
//! end of the resolution channel, and applies the reducer's effects. One
//! instance per mounted form; dropping it is the form's teardown and resets
//! the shared modal state.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::effects::Effect;
use crate::core::event::FormEvent;
use crate::core::executor::VerificationExecutor;
use crate::core::modal::ModalSlot;
use crate::core::reducer::reduce;
use crate::core::snapshot::FormSnapshot;
use crate::core::state::FormState;
use crate::core::verifier::Verifiers;
use crate::form::error::FormError;

pub struct SignUpForm {
    state: FormState,
    executor: VerificationExecutor,
    resolutions: mpsc::UnboundedReceiver<FormEvent>,
    modal: ModalSlot,
}

impl SignUpForm {
    /// Mount a new form. Must be called inside a Tokio runtime.
    pub fn new(verifiers: Verifiers, modal: ModalSlot) -> Self {
        let (tx, resolutions) = mpsc::unbounded_channel();
        Self {
            state: FormState::default(),
            executor: VerificationExecutor::new(verifiers, tx),
            resolutions,
            modal,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn modal(&self) -> &ModalSlot {
        &self.modal
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot::capture(&self.state)
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    /// Feed one event through the reducer and apply its effects.
    pub fn dispatch(&mut self, event: FormEvent) -> Result<(), FormError> {
        if !event.is_edit() {
            debug!(event = %event, "dispatch");
        }
        let effects = reduce(&mut self.state, event).inspect_err(|e| {
            debug!("event rejected: {e}");
        })?;
        for effect in effects {
            self.apply(effect);
        }
        Ok(())
    }

    /// Wait for the next verification resolution and apply it.
    /// Returns false when the executor is gone.
    pub async fn next_resolution(&mut self) -> bool {
        match self.resolutions.recv().await {
            Some(event) => {
                // Resolutions are never rejected; stale ones are dropped inside.
                let _ = self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Apply resolutions until no check is in flight.
    pub async fn settle(&mut self) {
        while self.state.has_in_flight() {
            if !self.next_resolution().await {
                break;
            }
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Verify(token) => {
                info!(token = token.id, target_gate = %token.target, "verification requested");
                self.executor.spawn(token);
            }
            Effect::OpenConfirmModal { role } => {
                info!(%role, "sign-up submitted, opening confirmation");
                self.modal.open(role);
            }
            Effect::SelectRole(role) => self.modal.select(role),
        }
    }
}

impl Drop for SignUpForm {
    fn drop(&mut self) {
        self.modal.reset();
    }
}
