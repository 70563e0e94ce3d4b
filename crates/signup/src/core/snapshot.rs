//! Read-only render view of the form.
//!
//! This is everything the presentation layer needs: values (secrets masked),
//! per-field messages with the synthetic flag, both gate views and the
//! submission decision.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::state::FormState;
use crate::form::field::FieldKey;
use crate::form::values::Role;
use crate::gate::code::CodeGateState;
use crate::gate::identifier::IdentifierGateState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub message: String,
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesView {
    pub identifier: String,
    pub password: String,
    pub confirm_password: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub role: Role,
    pub values: ValuesView,
    pub errors: BTreeMap<FieldKey, ErrorView>,
    pub identifier_gate: IdentifierGateState,
    pub code_gate: CodeGateState,
    pub is_valid: bool,
    pub can_submit: bool,
}

impl FormSnapshot {
    pub fn capture(state: &FormState) -> Self {
        let values = state.values();
        let errors = state
            .validation()
            .errors
            .iter()
            .map(|(key, issue)| {
                (
                    key,
                    ErrorView {
                        message: issue.message().to_string(),
                        synthetic: issue.is_synthetic(),
                    },
                )
            })
            .collect();

        FormSnapshot {
            role: values.role(),
            values: ValuesView {
                identifier: values.identifier.clone(),
                password: mask(&values.password),
                confirm_password: mask(&values.confirm_password),
                display_name: values.display_name.clone(),
                code: values.enrollment.code_gate().map(|g| g.code().to_string()),
            },
            errors,
            identifier_gate: state.identifier_gate().state(),
            code_gate: values.enrollment.code_view(),
            is_valid: state.validation().is_valid,
            can_submit: state.can_submit(),
        }
    }

    pub fn error(&self, key: FieldKey) -> Option<&ErrorView> {
        self.errors.get(&key)
    }
}

fn mask(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::FormEvent;
    use crate::core::reducer::reduce;

    #[test]
    fn secrets_are_masked() {
        let mut state = FormState::default();
        reduce(&mut state, FormEvent::PasswordChanged("pass123!".into())).expect("edit");
        let snap = FormSnapshot::capture(&state);
        assert_eq!(snap.values.password, "••••••••");
        assert_eq!(snap.values.confirm_password, "");
    }

    #[test]
    fn student_snapshot_has_neutral_code_gate() {
        let mut state = FormState::default();
        reduce(&mut state, FormEvent::RoleChanged(Role::Student)).expect("role");
        let snap = FormSnapshot::capture(&state);
        assert_eq!(snap.role, Role::Student);
        assert_eq!(snap.values.code, None);
        assert!(!snap.code_gate.applicable);
        assert!(snap.code_gate.verified);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let snap = FormSnapshot::capture(&FormState::default());
        let json = serde_json::to_value(&snap).expect("serialize");
        assert_eq!(json["role"], "teacher");
        assert_eq!(json["canSubmit"], false);
        assert_eq!(json["identifierGate"]["checkEnabled"], false);
        assert!(json["errors"]["displayName"]["message"].is_string());
    }
}
