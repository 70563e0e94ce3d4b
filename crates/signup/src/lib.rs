//! Validation and gating state machine for the teacher/student sign-up form.
//!
//! - `form` : values, schema and the Field Validation Engine
//! - `gate` : identifier uniqueness gate, invitation code gate, submission gate
//! - `core` : reducer / effects / executor and the `SignUpForm` instance
//!
//! The remaining modules are the binary's plumbing (config, logging, panic
//! hooks, CLI and the script driver).

pub mod cli;
pub mod config;
pub mod core;
pub mod driver;
pub mod errors;
pub mod form;
pub mod gate;
pub mod logging;

pub use crate::core::{Effect, FormEvent, FormSnapshot, ModalSlot, SignUpForm, Verifiers};
pub use crate::form::{FieldKey, FormError, Role};
