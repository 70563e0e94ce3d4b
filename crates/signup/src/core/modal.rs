//! Shared state of the confirmation modal.
//!
//! The modal itself is an external collaborator. The form writes
//! `selected_auth` + `is_modal_open = true` on a successful submit, keeps
//! `selected_auth` in sync with the role radio, and resets everything to the
//! default on teardown. Closing (cancel, confirm, click outside) belongs to
//! the modal and goes through [`ModalSlot::close`].

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::form::values::Role;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalState {
    pub selected_auth: Role,
    pub is_modal_open: bool,
}

/// Cloneable handle; every clone sees the same state.
#[derive(Debug, Clone, Default)]
pub struct ModalSlot {
    inner: Arc<Mutex<ModalState>>,
}

impl ModalSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ModalState {
        *self.lock()
    }

    pub fn open(&self, role: Role) {
        let mut s = self.lock();
        s.selected_auth = role;
        s.is_modal_open = true;
    }

    pub fn select(&self, role: Role) {
        self.lock().selected_auth = role;
    }

    pub fn close(&self) {
        self.lock().is_modal_open = false;
    }

    pub fn reset(&self) {
        *self.lock() = ModalState::default();
    }

    fn lock(&self) -> MutexGuard<'_, ModalState> {
        // The state is plain data; a poisoned lock still holds a usable value.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
