use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use pretty_assertions::assert_eq;
use tokio::sync::{oneshot, Notify};

use signup::core::{StubVerifier, Verifier};
use signup::form::validation::UNIQUENESS_PROMPT;
use signup::gate::VerificationOutcome;
use signup::{FieldKey, FormError, FormEvent, ModalSlot, Role, SignUpForm, Verifiers};

/// Verifier whose answers are handed out by the test, in request order.
#[derive(Default)]
struct ManualVerifier {
    pending: Mutex<VecDeque<(String, oneshot::Sender<VerificationOutcome>)>>,
    arrived: Notify,
}

impl ManualVerifier {
    async fn next_request(&self) -> (String, oneshot::Sender<VerificationOutcome>) {
        loop {
            if let Some(request) = self.pending.lock().unwrap().pop_front() {
                return request;
            }
            self.arrived.notified().await;
        }
    }
}

impl Verifier for ManualVerifier {
    fn verify(&self, candidate: &str) -> BoxFuture<'static, VerificationOutcome> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap()
            .push_back((candidate.to_string(), tx));
        self.arrived.notify_one();
        async move {
            rx.await
                .unwrap_or_else(|_| VerificationOutcome::Rejected("dropped".into()))
        }
        .boxed()
    }
}

fn stub_form() -> SignUpForm {
    SignUpForm::new(Verifiers::default(), ModalSlot::new())
}

fn fill_valid_fields(form: &mut SignUpForm) {
    form.dispatch(FormEvent::PasswordChanged("pass123!".into())).unwrap();
    form.dispatch(FormEvent::ConfirmPasswordChanged("pass123!".into())).unwrap();
    form.dispatch(FormEvent::DisplayNameChanged("Kim".into())).unwrap();
}

async fn confirm_identifier(form: &mut SignUpForm, identifier: &str) {
    form.dispatch(FormEvent::IdentifierChanged(identifier.into())).unwrap();
    form.dispatch(FormEvent::CheckIdentifier).unwrap();
    form.settle().await;
    assert!(form.snapshot().identifier_gate.confirmed);
}

/// canSubmit == errors empty && identifier confirmed && (student || code verified)
fn assert_submit_invariant(form: &SignUpForm) {
    let snap = form.snapshot();
    let expected = snap.errors.is_empty()
        && snap.identifier_gate.confirmed
        && (snap.role == Role::Student || snap.code_gate.verified);
    assert_eq!(snap.can_submit, expected, "snapshot: {snap:?}");
}

#[tokio::test]
async fn submit_invariant_holds_along_a_teacher_flow() {
    let mut form = stub_form();
    assert_submit_invariant(&form);

    form.dispatch(FormEvent::IdentifierChanged("teacher01".into())).unwrap();
    assert_submit_invariant(&form);
    fill_valid_fields(&mut form);
    assert_submit_invariant(&form);

    form.dispatch(FormEvent::CheckIdentifier).unwrap();
    form.settle().await;
    assert_submit_invariant(&form);
    assert!(!form.can_submit());

    form.dispatch(FormEvent::CodeChanged("ABCD1234".into())).unwrap();
    assert_submit_invariant(&form);
    form.dispatch(FormEvent::CheckCode).unwrap();
    form.settle().await;
    assert_submit_invariant(&form);
    assert!(form.can_submit());

    form.dispatch(FormEvent::DisplayNameChanged("Far too long".into())).unwrap();
    assert_submit_invariant(&form);
    assert!(!form.can_submit());
}

#[tokio::test]
async fn any_identifier_edit_revokes_confirmation() {
    let mut form = stub_form();
    confirm_identifier(&mut form, "abcdefgh").await;

    for next in ["abcdefghi", "abc", "abcdefgh", ""] {
        form.dispatch(FormEvent::IdentifierChanged(next.into())).unwrap();
        assert!(!form.snapshot().identifier_gate.confirmed, "after {next:?}");
        confirm_if_possible(&mut form).await;
    }
}

#[tokio::test]
async fn identical_identifier_text_is_not_an_edit() {
    let mut form = stub_form();
    confirm_identifier(&mut form, "abcdefgh").await;

    form.dispatch(FormEvent::IdentifierChanged("abcdefgh".into())).unwrap();
    let gate = form.snapshot().identifier_gate;
    assert!(gate.confirmed);
    assert!(!gate.check_enabled);
}

async fn confirm_if_possible(form: &mut SignUpForm) {
    if form.snapshot().identifier_gate.check_enabled {
        form.dispatch(FormEvent::CheckIdentifier).unwrap();
        form.settle().await;
    }
}

#[tokio::test]
async fn role_toggle_resets_the_code_gate() {
    let mut form = stub_form();
    form.dispatch(FormEvent::CodeChanged("ABCD1234".into())).unwrap();
    form.dispatch(FormEvent::CheckCode).unwrap();
    form.settle().await;
    assert!(form.snapshot().code_gate.verified);

    form.dispatch(FormEvent::RoleChanged(Role::Student)).unwrap();
    let snap = form.snapshot();
    assert_eq!(snap.values.code, None);
    assert!(!snap.code_gate.check_enabled);
    assert!(snap.error(FieldKey::Code).is_none());

    form.dispatch(FormEvent::RoleChanged(Role::Teacher)).unwrap();
    let snap = form.snapshot();
    assert_eq!(snap.values.code.as_deref(), Some(""));
    assert!(!snap.code_gate.verified);
    assert!(!snap.code_gate.check_enabled);
    assert!(snap.code_gate.message.is_empty());
}

#[tokio::test]
async fn student_needs_no_code_to_submit() {
    let mut form = stub_form();
    form.dispatch(FormEvent::RoleChanged(Role::Student)).unwrap();
    fill_valid_fields(&mut form);
    confirm_identifier(&mut form, "student1").await;
    assert!(form.can_submit());

    form.dispatch(FormEvent::Submit).unwrap();
    let modal = form.modal().get();
    assert!(modal.is_modal_open);
    assert_eq!(modal.selected_auth, Role::Student);
}

#[tokio::test]
async fn check_button_follows_identifier_length() {
    let mut form = stub_form();
    let mut trace = Vec::new();
    for value in ["abcdefg", "abcdefgh", "abcdefg", "abcdefgh", "abcdefghi", "abcdefgh"] {
        form.dispatch(FormEvent::IdentifierChanged(value.into())).unwrap();
        trace.push(form.snapshot().identifier_gate.check_enabled);
    }
    assert_eq!(trace, vec![false, true, false, true, true, true]);
}

#[tokio::test]
async fn unchecked_identifier_blocks_a_complete_student_form() {
    let mut form = stub_form();
    form.dispatch(FormEvent::RoleChanged(Role::Student)).unwrap();
    fill_valid_fields(&mut form);
    form.dispatch(FormEvent::IdentifierChanged("abcdefgh".into())).unwrap();

    let snap = form.snapshot();
    let issue = snap.error(FieldKey::Identifier).expect("prompt present");
    assert_eq!(issue.message, UNIQUENESS_PROMPT);
    assert!(issue.synthetic);
    assert!(snap.is_valid);
    assert!(!snap.can_submit);

    assert!(matches!(
        form.dispatch(FormEvent::Submit),
        Err(FormError::SubmitBlocked(_))
    ));
    assert!(!form.modal().get().is_modal_open);
}

#[tokio::test]
async fn code_button_needs_exactly_eight_characters() {
    let mut form = stub_form();
    assert!(!form.snapshot().code_gate.check_enabled);

    form.dispatch(FormEvent::CodeChanged("ABCD123".into())).unwrap();
    assert!(!form.snapshot().code_gate.check_enabled);
    form.dispatch(FormEvent::CodeChanged("ABCD1234".into())).unwrap();
    assert!(form.snapshot().code_gate.check_enabled);
    form.dispatch(FormEvent::CodeChanged("ABCD12345".into())).unwrap();
    assert!(!form.snapshot().code_gate.check_enabled);
    form.dispatch(FormEvent::CodeChanged("".into())).unwrap();
    assert!(!form.snapshot().code_gate.check_enabled);
}

#[tokio::test]
async fn password_mismatch_is_reported_on_confirmation() {
    let mut form = stub_form();
    form.dispatch(FormEvent::PasswordChanged("abc".into())).unwrap();
    form.dispatch(FormEvent::ConfirmPasswordChanged("abcd".into())).unwrap();
    let snap = form.snapshot();
    let issue = snap
        .error(FieldKey::ConfirmPassword)
        .expect("mismatch reported");
    assert_eq!(issue.message, "Passwords do not match.");
    assert!(!issue.synthetic);
    assert!(!snap.can_submit);
}

#[tokio::test]
async fn confirmed_identifier_never_has_an_enabled_button() {
    let mut form = stub_form();
    for value in ["abcdefgh", "abcdefghi", "abcdefgh"] {
        confirm_identifier(&mut form, value).await;
        let gate = form.snapshot().identifier_gate;
        assert!(gate.confirmed && !gate.check_enabled);
        assert!(matches!(
            form.dispatch(FormEvent::CheckIdentifier),
            Err(FormError::CheckUnavailable { .. })
        ));
        let gate = form.snapshot().identifier_gate;
        assert!(gate.confirmed && !gate.check_enabled);
    }
}

#[tokio::test]
async fn taken_identifier_shows_failure_and_stays_checkable() {
    let verifiers = Verifiers::new(
        Arc::new(StubVerifier::rejecting("")),
        Arc::new(StubVerifier::accepting()),
    );
    let mut form = SignUpForm::new(verifiers, ModalSlot::new());
    form.dispatch(FormEvent::IdentifierChanged("abcdefgh".into())).unwrap();
    form.dispatch(FormEvent::CheckIdentifier).unwrap();
    form.settle().await;

    let gate = form.snapshot().identifier_gate;
    assert!(!gate.confirmed);
    assert!(gate.check_enabled);
    assert!(gate.message.is_failure());
}

#[tokio::test]
async fn rejected_code_sets_error_and_blocks_submit() {
    let verifiers = Verifiers::new(
        Arc::new(StubVerifier::accepting()),
        Arc::new(StubVerifier::rejecting("")),
    );
    let mut form = SignUpForm::new(verifiers, ModalSlot::new());
    fill_valid_fields(&mut form);
    confirm_identifier(&mut form, "teacher01").await;
    form.dispatch(FormEvent::CodeChanged("WRONG123".into())).unwrap();
    form.dispatch(FormEvent::CheckCode).unwrap();
    form.settle().await;

    let snap = form.snapshot();
    assert!(!snap.code_gate.verified);
    assert!(snap.code_gate.error.present);
    assert!(!snap.can_submit);
}

#[tokio::test]
async fn late_resolution_of_an_abandoned_check_is_ignored() {
    let identifier = Arc::new(ManualVerifier::default());
    let verifiers = Verifiers::new(identifier.clone(), Arc::new(StubVerifier::accepting()));
    let mut form = SignUpForm::new(verifiers, ModalSlot::new());

    form.dispatch(FormEvent::IdentifierChanged("abcdefgh".into())).unwrap();
    form.dispatch(FormEvent::CheckIdentifier).unwrap();
    let (first_candidate, first) = identifier.next_request().await;
    assert_eq!(first_candidate, "abcdefgh");

    // edit while the first check is in flight, then check the new value
    form.dispatch(FormEvent::IdentifierChanged("abcdefgh9".into())).unwrap();
    assert!(form.snapshot().identifier_gate.check_enabled);
    form.dispatch(FormEvent::CheckIdentifier).unwrap();
    let (second_candidate, second) = identifier.next_request().await;
    assert_eq!(second_candidate, "abcdefgh9");

    // second resolves first: taken
    second
        .send(VerificationOutcome::Rejected(String::new())).unwrap();
    assert!(form.next_resolution().await);
    assert!(!form.snapshot().identifier_gate.confirmed);

    // first resolves late: accepted, but for a value no longer in the field
    first.send(VerificationOutcome::Accepted).unwrap();
    assert!(form.next_resolution().await);
    let snap = form.snapshot();
    assert!(!snap.identifier_gate.confirmed);
    assert!(snap.identifier_gate.message.is_failure());
    assert_eq!(snap.values.identifier, "abcdefgh9");
}

#[tokio::test]
async fn resolution_for_a_retyped_value_is_still_stale() {
    let identifier = Arc::new(ManualVerifier::default());
    let verifiers = Verifiers::new(identifier.clone(), Arc::new(StubVerifier::accepting()));
    let mut form = SignUpForm::new(verifiers, ModalSlot::new());

    form.dispatch(FormEvent::IdentifierChanged("abcdefgh".into())).unwrap();
    form.dispatch(FormEvent::CheckIdentifier).unwrap();
    let (_, first) = identifier.next_request().await;

    // retype the same value and check again: a new request, same candidate
    form.dispatch(FormEvent::IdentifierChanged("abcdefg".into())).unwrap();
    form.dispatch(FormEvent::IdentifierChanged("abcdefgh".into())).unwrap();
    form.dispatch(FormEvent::CheckIdentifier).unwrap();
    let (_, second) = identifier.next_request().await;

    first.send(VerificationOutcome::Accepted).unwrap();
    assert!(form.next_resolution().await);
    let gate = form.snapshot().identifier_gate;
    assert!(!gate.confirmed);
    assert!(gate.checking);

    second.send(VerificationOutcome::Accepted).unwrap();
    assert!(form.next_resolution().await);
    assert!(form.snapshot().identifier_gate.confirmed);
}

#[tokio::test]
async fn code_resolution_after_switching_to_student_is_dropped() {
    let code = Arc::new(ManualVerifier::default());
    let verifiers = Verifiers::new(Arc::new(StubVerifier::accepting()), code.clone());
    let mut form = SignUpForm::new(verifiers, ModalSlot::new());

    form.dispatch(FormEvent::CodeChanged("ABCD1234".into())).unwrap();
    form.dispatch(FormEvent::CheckCode).unwrap();
    let (_, pending) = code.next_request().await;

    form.dispatch(FormEvent::RoleChanged(Role::Student)).unwrap();
    form.dispatch(FormEvent::RoleChanged(Role::Teacher)).unwrap();
    pending.send(VerificationOutcome::Accepted).unwrap();
    assert!(form.next_resolution().await);

    let snap = form.snapshot();
    assert!(!snap.code_gate.verified);
    assert_eq!(snap.values.code.as_deref(), Some(""));
}

#[tokio::test]
async fn code_input_is_rejected_for_students() {
    let mut form = stub_form();
    form.dispatch(FormEvent::RoleChanged(Role::Student)).unwrap();
    assert!(matches!(
        form.dispatch(FormEvent::CodeChanged("ABCD1234".into())),
        Err(FormError::NotApplicable { role: Role::Student })
    ));
    assert!(matches!(
        form.dispatch(FormEvent::CheckCode),
        Err(FormError::NotApplicable { .. })
    ));
}

#[tokio::test]
async fn dropping_the_form_resets_the_modal() {
    let modal = ModalSlot::new();
    {
        let mut form = SignUpForm::new(Verifiers::default(), modal.clone());
        form.dispatch(FormEvent::RoleChanged(Role::Student)).unwrap();
        fill_valid_fields(&mut form);
        confirm_identifier(&mut form, "student1").await;
        form.dispatch(FormEvent::Submit).unwrap();
        assert!(modal.get().is_modal_open);
    }
    assert!(!modal.get().is_modal_open);
    assert_eq!(modal.get().selected_auth, Role::Teacher);
}
