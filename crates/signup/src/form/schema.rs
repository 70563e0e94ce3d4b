//! Form schema definition.
//!
//! `FormSchema` groups the `FormField` definitions of a form together with
//! presentation metadata. The sign-up schema is built once by
//! [`FormSchema::sign_up`] and never changes afterwards; all rules that depend
//! on the role are expressed through `FormField::only_for`.
//!
//! Sign-up rules:
//! - identifier:      required, 8..=12 chars, lowercase ASCII letters and digits
//! - password:        required, 8..=16 chars, at least one letter, digit and symbol
//! - confirmPassword: required, equal to password
//! - displayName:     required, at most 8 chars
//! - role:            required, `teacher` or `student`
//! - code:            teachers only, required, exactly 8 chars
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use strum::VariantNames;

use super::error::FormError;
use super::field::{FieldKey, FieldKind, FormField, Rule};
use super::values::Role;
use crate::gate::code::CODE_LENGTH;

pub const IDENTIFIER_MIN_LEN: usize = 8;
pub const IDENTIFIER_MAX_LEN: usize = 12;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 16;
pub const DISPLAY_NAME_MAX_LEN: usize = 8;

lazy_static! {
    static ref IDENTIFIER_CHARS: Regex = Regex::new(r"^[a-z0-9]+$").expect("static regex");
    static ref HAS_LETTER: Regex = Regex::new(r"[A-Za-z]").expect("static regex");
    static ref HAS_DIGIT: Regex = Regex::new(r"[0-9]").expect("static regex");
    static ref HAS_SYMBOL: Regex = Regex::new(r"[^A-Za-z0-9\s]").expect("static regex");
}

/// Declarative schema for a multi-field form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Find a field by its key.
    pub fn field(&self, key: FieldKey) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Look a field up by its camelCase name (`confirmPassword`).
    pub fn field_named(&self, name: &str) -> Result<&FormField, FormError> {
        FieldKey::from_str(name)
            .ok()
            .and_then(|key| self.field(key))
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Fields taking part in validation for `role`, in declaration order.
    pub fn fields_for(&self, role: Role) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(move |f| f.applies_to(role))
    }

    /// The registration form schema.
    pub fn sign_up() -> Self {
        let fields = vec![
            FormField::new(FieldKey::Identifier, "Identifier", FieldKind::Text)
                .help("8 to 12 lowercase letters or digits")
                .rule(Rule::Required, "Please enter an identifier.")
                .rule(
                    Rule::MinLen(IDENTIFIER_MIN_LEN),
                    format!("Identifier must be at least {IDENTIFIER_MIN_LEN} characters."),
                )
                .rule(
                    Rule::MaxLen(IDENTIFIER_MAX_LEN),
                    format!("Identifier must be at most {IDENTIFIER_MAX_LEN} characters."),
                )
                .rule(
                    Rule::Pattern(&*IDENTIFIER_CHARS),
                    "Identifier may only contain lowercase letters and digits.",
                ),
            FormField::new(FieldKey::Password, "Password", FieldKind::Secret)
                .help("8 to 16 characters with a letter, a digit and a symbol")
                .rule(Rule::Required, "Please enter a password.")
                .rule(
                    Rule::MinLen(PASSWORD_MIN_LEN),
                    format!("Password must be at least {PASSWORD_MIN_LEN} characters."),
                )
                .rule(
                    Rule::MaxLen(PASSWORD_MAX_LEN),
                    format!("Password must be at most {PASSWORD_MAX_LEN} characters."),
                )
                .rule(
                    Rule::ContainsAll(vec![&*HAS_LETTER, &*HAS_DIGIT, &*HAS_SYMBOL]),
                    "Password must combine letters, digits and symbols.",
                ),
            FormField::new(FieldKey::ConfirmPassword, "Confirm password", FieldKind::Secret)
                .rule(Rule::Required, "Please confirm your password.")
                .rule(
                    Rule::Matches(FieldKey::Password),
                    "Passwords do not match.",
                ),
            FormField::new(FieldKey::DisplayName, "Name", FieldKind::Text)
                .rule(Rule::Required, "Please enter your name.")
                .rule(
                    Rule::MaxLen(DISPLAY_NAME_MAX_LEN),
                    format!("Name must be at most {DISPLAY_NAME_MAX_LEN} characters."),
                ),
            FormField::new(
                FieldKey::Role,
                "Role",
                FieldKind::Choice {
                    options: Role::VARIANTS.iter().map(|s| s.to_string()).collect(),
                },
            )
            .rule(Rule::Required, "Please choose a role.")
            .rule(Rule::OneOf(Role::VARIANTS), "Please choose a role."),
            FormField::new(FieldKey::Code, "Invitation code", FieldKind::Text)
                .help("Teachers need the invitation code of their school")
                .only_for(Role::Teacher)
                .rule(Rule::Required, "Please enter your invitation code.")
                .rule(
                    Rule::ExactLen(CODE_LENGTH),
                    format!("Invitation code must be exactly {CODE_LENGTH} characters."),
                ),
        ];

        FormSchema::new("Sign up", fields)
            .description("Create a teacher or student account")
    }
}
