/*!
Verification executor.

Decouples the reducer's declarative `Effect::Verify(token)` from the async
verification capabilities:

- Requests are queued on an unbounded channel via `spawn(token)`.
- A single worker loop pulls them and spawns each verification as its own
  Tokio task, so an identifier check never waits behind a code check.
- Each finished verification is sent back as
  `FormEvent::VerificationResolved { token, outcome }` on the event channel
  handed to `new`. The reducer decides whether the result is still current.

There is no cancellation. An abandoned request still resolves; the token
check in the gates discards it.
*/

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::event::FormEvent;
use crate::core::verifier::Verifiers;
use crate::gate::RequestToken;

/// Cloneable handle for scheduling verifications.
#[derive(Clone)]
pub struct VerificationExecutor {
    tx: mpsc::UnboundedSender<RequestToken>,
}

impl VerificationExecutor {
    /// Create the executor and spawn its worker loop. Requires a Tokio runtime.
    pub fn new(verifiers: Verifiers, events: mpsc::UnboundedSender<FormEvent>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<RequestToken>();
        Worker {
            rx,
            verifiers,
            events,
        }
        .spawn();
        Self { tx }
    }

    /// Schedule a verification. Returns false if the worker is gone.
    pub fn spawn(&self, token: RequestToken) -> bool {
        let id = token.id;
        if let Err(e) = self.tx.send(token) {
            warn!(token = id, "verification executor channel closed: {e}");
            return false;
        }
        true
    }
}

struct Worker {
    rx: mpsc::UnboundedReceiver<RequestToken>,
    verifiers: Verifiers,
    events: mpsc::UnboundedSender<FormEvent>,
}

impl Worker {
    fn spawn(mut self) {
        tokio::spawn(async move {
            while let Some(token) = self.rx.recv().await {
                let verifier = self.verifiers.for_target(token.target);
                let events = self.events.clone();
                debug!(token = token.id, target_gate = %token.target, "verification started");
                tokio::spawn(async move {
                    let outcome = verifier.verify(&token.candidate).await;
                    let id = token.id;
                    if events
                        .send(FormEvent::VerificationResolved { token, outcome })
                        .is_err()
                    {
                        debug!(token = id, "form gone before verification resolved");
                    }
                });
            }
            info!("verification executor stopped (channel closed)");
        });
    }
}
