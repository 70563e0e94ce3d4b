//! Line-oriented script driver for the `signup` binary.
//!
//! One command per line, lines starting with `#` are comments:
//!
//! ```text
//! id <text>          password <text>     confirm <text>
//! name <text>        role teacher|student
//! code <text>        check-id            check-code
//! wait               submit              close-modal
//! ```
//!
//! Text arguments are everything after the first space, so values may contain
//! inner spaces and `#`, and may be empty (`id` alone clears the identifier).

use std::io::Write;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::core::{FormEvent, FormSnapshot, ModalState, SignUpForm};
use crate::form::error::FormError;
use crate::form::field::{FieldKey, FieldKind, FormField};
use crate::form::schema::FormSchema;
use crate::form::values::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    Event(FormEvent),
    /// Apply verification resolutions until nothing is in flight.
    Wait,
    /// The modal's own close action.
    CloseModal,
}

/// Parse one script line. Blank lines and comments yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<DriverCommand>, FormError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, arg) = match line.split_once(' ') {
        Some((w, rest)) => (w, Some(rest)),
        None => (line, None),
    };
    let text = || arg.unwrap_or("").to_string();
    let no_arg = |cmd: DriverCommand| match arg.map(str::trim) {
        None | Some("") => Ok(Some(cmd)),
        Some(extra) => Err(FormError::Script {
            line: line_no,
            reason: format!("`{word}` takes no argument, got `{extra}`"),
        }),
    };

    match word {
        "id" => Ok(Some(DriverCommand::Event(FormEvent::IdentifierChanged(text())))),
        "password" => Ok(Some(DriverCommand::Event(FormEvent::PasswordChanged(text())))),
        "confirm" => Ok(Some(DriverCommand::Event(
            FormEvent::ConfirmPasswordChanged(text()),
        ))),
        "name" => Ok(Some(DriverCommand::Event(FormEvent::DisplayNameChanged(text())))),
        "code" => Ok(Some(DriverCommand::Event(FormEvent::CodeChanged(text())))),
        "role" => {
            let raw = arg.map(str::trim).unwrap_or("");
            let role = Role::from_str(raw).map_err(|_| FormError::UnknownRole(raw.to_string()))?;
            Ok(Some(DriverCommand::Event(FormEvent::RoleChanged(role))))
        }
        "check-id" => no_arg(DriverCommand::Event(FormEvent::CheckIdentifier)),
        "check-code" => no_arg(DriverCommand::Event(FormEvent::CheckCode)),
        "submit" => no_arg(DriverCommand::Event(FormEvent::Submit)),
        "wait" => no_arg(DriverCommand::Wait),
        "close-modal" => no_arg(DriverCommand::CloseModal),
        other => Err(FormError::Script {
            line: line_no,
            reason: format!("unknown command `{other}`"),
        }),
    }
}

/// Parse a whole script; line numbers start at 1.
pub fn parse_script(script: &str) -> Result<Vec<(usize, DriverCommand)>, FormError> {
    let mut commands = Vec::new();
    for (idx, line) in script.lines().enumerate() {
        if let Some(cmd) = parse_line(idx + 1, line)? {
            commands.push((idx + 1, cmd));
        }
    }
    Ok(commands)
}

/// Output record written after each command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
    pub form: FormSnapshot,
    pub modal: ModalState,
}

/// Run `commands` against `form`, writing one JSON line per step (or only
/// the last one when `quiet`). Rejected events are reported in the step and
/// do not stop the run.
pub async fn execute<W: Write>(
    form: &mut SignUpForm,
    commands: Vec<(usize, DriverCommand)>,
    out: &mut W,
    quiet: bool,
) -> Result<Vec<Step>, FormError> {
    let mut steps = Vec::with_capacity(commands.len());
    for (line, command) in commands {
        let rejected = match command {
            DriverCommand::Event(event) => form.dispatch(event).err().map(|e| e.to_string()),
            DriverCommand::Wait => {
                form.settle().await;
                None
            }
            DriverCommand::CloseModal => {
                form.modal().close();
                None
            }
        };
        if let Some(reason) = &rejected {
            debug!(line, "{reason}");
        }
        let step = Step {
            line,
            rejected,
            form: form.snapshot(),
            modal: form.modal().get(),
        };
        if !quiet {
            write_json(out, &step)?;
        }
        steps.push(step);
    }
    if quiet {
        if let Some(last) = steps.last() {
            write_json(out, last)?;
        }
    }
    Ok(steps)
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), FormError> {
    serde_json::to_writer(&mut *out, value).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckView {
    pub rule: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub key: FieldKey,
    pub label: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_for: Option<Role>,
    pub checks: Vec<CheckView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaView {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldView>,
}

impl From<&FormSchema> for SchemaView {
    fn from(schema: &FormSchema) -> Self {
        let fields = schema.fields.iter().map(FieldView::from).collect();
        SchemaView {
            title: schema.title.clone(),
            description: schema.description.clone(),
            fields,
        }
    }
}

impl From<&FormField> for FieldView {
    fn from(f: &FormField) -> Self {
        let (kind, options) = match &f.kind {
            FieldKind::Text => ("text", Vec::new()),
            FieldKind::Secret => ("secret", Vec::new()),
            FieldKind::Choice { options } => ("choice", options.clone()),
        };
        FieldView {
            key: f.key,
            label: f.label.clone(),
            kind,
            options,
            help: f.help.clone(),
            only_for: f.only_for,
            checks: f
                .checks
                .iter()
                .map(|c| CheckView {
                    rule: c.rule.name(),
                    message: c.message.clone(),
                })
                .collect(),
        }
    }
}

/// Pretty-print the whole schema, or a single field when `field` is given.
pub fn print_schema<W: Write>(
    schema: &FormSchema,
    field: Option<&str>,
    out: &mut W,
) -> Result<(), FormError> {
    let written = match field {
        Some(name) => {
            serde_json::to_writer_pretty(&mut *out, &FieldView::from(schema.field_named(name)?))
        }
        None => serde_json::to_writer_pretty(&mut *out, &SchemaView::from(schema)),
    };
    written.map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
