//! Captured form values.
//!
//! The role is not stored as a plain field next to an optional invitation
//! code. `Enrollment` is the tagged variant that owns the role: the code gate
//! (and the code text) only exists inside `Enrollment::Teacher`, so "student
//! needs no code" is a property of the type rather than of sentinel values.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use super::field::FieldKey;
use crate::gate::code::{CodeGate, CodeGateState};

/// Account role selected with the radio group.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Teacher,
    Student,
}

/// Role plus the role-specific gate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrollment {
    Teacher(CodeGate),
    Student,
}

impl Default for Enrollment {
    fn default() -> Self {
        Enrollment::Teacher(CodeGate::default())
    }
}

impl Enrollment {
    pub fn role(&self) -> Role {
        match self {
            Enrollment::Teacher(_) => Role::Teacher,
            Enrollment::Student => Role::Student,
        }
    }

    /// Switch to `role`. Returns false when the role did not change.
    ///
    /// Switching to student drops the code gate together with its code text.
    /// Switching to teacher always starts from an unverified gate.
    pub fn switch_to(&mut self, role: Role) -> bool {
        if self.role() == role {
            return false;
        }
        *self = match role {
            Role::Teacher => Enrollment::Teacher(CodeGate::default()),
            Role::Student => Enrollment::Student,
        };
        true
    }

    pub fn code_gate(&self) -> Option<&CodeGate> {
        match self {
            Enrollment::Teacher(gate) => Some(gate),
            Enrollment::Student => None,
        }
    }

    pub fn code_gate_mut(&mut self) -> Option<&mut CodeGate> {
        match self {
            Enrollment::Teacher(gate) => Some(gate),
            Enrollment::Student => None,
        }
    }

    /// Whether the code gate lets submission through.
    pub fn code_satisfied(&self) -> bool {
        match self {
            Enrollment::Teacher(gate) => gate.verified(),
            Enrollment::Student => true,
        }
    }

    /// Render view of the code gate; students get the neutral satisfied shape.
    pub fn code_view(&self) -> CodeGateState {
        match self {
            Enrollment::Teacher(gate) => gate.state(),
            Enrollment::Student => CodeGateState::not_applicable(),
        }
    }
}

/// Everything the user typed or selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub identifier: String,
    pub password: String,
    pub confirm_password: String,
    pub display_name: String,
    pub enrollment: Enrollment,
}

impl FormValues {
    pub fn role(&self) -> Role {
        self.enrollment.role()
    }

    /// Raw text for `key`; `None` for the code field when it does not exist.
    pub fn value(&self, key: FieldKey) -> Option<&str> {
        match key {
            FieldKey::Identifier => Some(self.identifier.as_str()),
            FieldKey::Password => Some(self.password.as_str()),
            FieldKey::ConfirmPassword => Some(self.confirm_password.as_str()),
            FieldKey::DisplayName => Some(self.display_name.as_str()),
            FieldKey::Role => Some(self.role().into()),
            FieldKey::Code => self.enrollment.code_gate().map(CodeGate::code),
        }
    }
}
