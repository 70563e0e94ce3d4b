//! Verification capability.
//!
//! The form only needs "take a candidate string, resolve exactly once with
//! accepted / rejected". The backend calls are not wired up yet, so the
//! shipped implementation is `StubVerifier`, which accepts everything unless
//! configured otherwise.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::config::VerificationConfig;
use crate::gate::code::INVALID_MESSAGE;
use crate::gate::identifier::TAKEN_MESSAGE;
use crate::gate::{VerificationOutcome, VerificationTarget};

/// Async verification capability for one gate.
pub trait Verifier: Send + Sync {
    fn verify(&self, candidate: &str) -> BoxFuture<'static, VerificationOutcome>;
}

/// What a stub verifier answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StubBehavior {
    #[default]
    Accept,
    Reject,
}

#[derive(Debug, Clone)]
pub struct StubVerifier {
    behavior: StubBehavior,
    latency: Duration,
    rejection: String,
}

impl StubVerifier {
    pub fn new(behavior: StubBehavior, latency: Duration, rejection: impl Into<String>) -> Self {
        Self {
            behavior,
            latency,
            rejection: rejection.into(),
        }
    }

    pub fn accepting() -> Self {
        Self::new(StubBehavior::Accept, Duration::ZERO, "")
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self::new(StubBehavior::Reject, Duration::ZERO, reason)
    }
}

impl Verifier for StubVerifier {
    fn verify(&self, _candidate: &str) -> BoxFuture<'static, VerificationOutcome> {
        let behavior = self.behavior;
        let latency = self.latency;
        let rejection = self.rejection.clone();
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            match behavior {
                StubBehavior::Accept => VerificationOutcome::Accepted,
                StubBehavior::Reject => VerificationOutcome::Rejected(rejection),
            }
        }
        .boxed()
    }
}

/// One verifier per gate.
#[derive(Clone)]
pub struct Verifiers {
    pub identifier: Arc<dyn Verifier>,
    pub code: Arc<dyn Verifier>,
}

impl Verifiers {
    pub fn new(identifier: Arc<dyn Verifier>, code: Arc<dyn Verifier>) -> Self {
        Self { identifier, code }
    }

    /// Stub verifiers as described by the configuration.
    pub fn from_config(cfg: &VerificationConfig) -> Self {
        let latency = Duration::from_millis(cfg.latency_ms);
        Self {
            identifier: Arc::new(StubVerifier::new(cfg.identifier, latency, TAKEN_MESSAGE)),
            code: Arc::new(StubVerifier::new(cfg.code, latency, INVALID_MESSAGE)),
        }
    }

    pub fn for_target(&self, target: VerificationTarget) -> Arc<dyn Verifier> {
        match target {
            VerificationTarget::Identifier => Arc::clone(&self.identifier),
            VerificationTarget::Code => Arc::clone(&self.code),
        }
    }
}

impl Default for Verifiers {
    fn default() -> Self {
        Self::from_config(&VerificationConfig::default())
    }
}
