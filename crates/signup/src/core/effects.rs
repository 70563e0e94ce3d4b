/*!
Effect model.

The reducer stays pure: it only returns `Vec<Effect>`. The controller
(`core::controller::SignUpForm`) interprets them:

- `Verify(token)`            -> handed to the `VerificationExecutor`
- `OpenConfirmModal { role }`-> written into the shared `ModalSlot`
- `SelectRole(role)`         -> keeps the modal's selected role in sync

Resolutions re-enter the reducer as `FormEvent::VerificationResolved`.
*/

use std::fmt;

use crate::form::values::Role;
use crate::gate::RequestToken;

/// Declarative instruction emitted by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the verification capability for `token.target` on `token.candidate`.
    Verify(RequestToken),
    /// Successful submit intent: open the confirmation modal for `role`.
    OpenConfirmModal { role: Role },
    /// The role radio changed.
    SelectRole(Role),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Verify(token) => write!(f, "Verify({}#{})", token.target, token.id),
            Effect::OpenConfirmModal { role } => write!(f, "OpenConfirmModal(role={role})"),
            Effect::SelectRole(role) => write!(f, "SelectRole({role})"),
        }
    }
}
