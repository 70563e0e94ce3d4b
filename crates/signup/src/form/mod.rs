//! Form model: values, schema and the Field Validation Engine.
//!
//! - `values.rs`     : `FormValues`, `Role`, `Enrollment`
//! - `field.rs`      : `FieldKey`, `FieldKind`, `Rule`, `FormField`
//! - `schema.rs`     : `FormSchema` and the sign-up rule set
//! - `validation.rs` : schema layer + synthetic gate layer -> `FieldErrors`
//! - `error.rs`      : `FormError`

pub mod error;
pub mod field;
pub mod schema;
pub mod validation;
pub mod values;

pub use error::FormError;
pub use field::{FieldKey, FieldKind, FormField, Rule};
pub use schema::FormSchema;
pub use validation::{FieldErrors, FieldIssue, Validation};
pub use values::{Enrollment, FormValues, Role};
