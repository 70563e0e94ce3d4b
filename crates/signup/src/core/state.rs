//! Form-state record shared by the four logical units.
//!
//! Only the reducer mutates it. Validation is cached after every transition;
//! the submission decision is derived on read.

use crate::form::schema::FormSchema;
use crate::form::validation::{validate, Validation};
use crate::form::values::{FormValues, Role};
use crate::gate::identifier::IdentifierGate;
use crate::gate::submission::{self, Blocker};
use crate::gate::TokenSeq;

#[derive(Debug, Clone)]
pub struct FormState {
    pub(crate) schema: FormSchema,
    pub(crate) values: FormValues,
    pub(crate) identifier: IdentifierGate,
    pub(crate) tokens: TokenSeq,
    pub(crate) validation: Validation,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(FormSchema::sign_up())
    }
}

impl FormState {
    pub fn new(schema: FormSchema) -> Self {
        let mut state = Self {
            schema,
            values: FormValues::default(),
            identifier: IdentifierGate::default(),
            tokens: TokenSeq::default(),
            validation: Validation::default(),
        };
        state.revalidate();
        state
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn role(&self) -> Role {
        self.values.role()
    }

    pub fn identifier_gate(&self) -> &IdentifierGate {
        &self.identifier
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    pub fn can_submit(&self) -> bool {
        submission::can_submit(&self.validation, &self.identifier, &self.values.enrollment)
    }

    pub fn blockers(&self) -> Vec<Blocker> {
        submission::blockers(&self.validation, &self.identifier, &self.values.enrollment)
    }

    /// True while either gate waits for a resolution.
    pub fn has_in_flight(&self) -> bool {
        self.identifier.in_flight().is_some()
            || self
                .values
                .enrollment
                .code_gate()
                .is_some_and(|g| g.in_flight().is_some())
    }

    pub(crate) fn revalidate(&mut self) {
        self.validation = validate(&self.schema, &self.values, &self.identifier);
    }
}
