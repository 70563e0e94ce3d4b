//! Core of the sign-up form: reducer / effect / executor pipeline.
//!
//!   - `event`      : `FormEvent`, every input the form reacts to
//!   - `state`      : `FormState`, the single form-state record
//!   - `reducer`    : `reduce(state, event) -> effects`
//!   - `effects`    : `Effect`
//!   - `verifier`   : `Verifier` capability + `StubVerifier`
//!   - `executor`   : runs verifications on Tokio, feeds results back as events
//!   - `modal`      : shared confirmation-modal state
//!   - `snapshot`   : read-only render view
//!   - `controller` : `SignUpForm`, ties everything together
pub mod controller;
pub mod effects;
pub mod event;
pub mod executor;
pub mod modal;
pub mod reducer;
pub mod snapshot;
pub mod state;
pub mod verifier;

pub use controller::SignUpForm;
pub use effects::Effect;
pub use event::FormEvent;
pub use modal::{ModalSlot, ModalState};
pub use snapshot::FormSnapshot;
pub use state::FormState;
pub use verifier::{StubBehavior, StubVerifier, Verifier, Verifiers};
