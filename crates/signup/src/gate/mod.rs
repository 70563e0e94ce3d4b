//! Verification gates.
//!
//! A gate is a stateful guard that has to reach a "satisfied" condition via an
//! asynchronous verification before the form may be submitted. Two gates exist:
//!
//! - `identifier` : account identifier uniqueness (edge-triggered button state,
//!                  confirmation goes stale on any edit)
//! - `code`       : teacher invitation code (level-triggered button state,
//!                  lives inside `Enrollment::Teacher`)
//!
//! `submission` is not a gate in the stateful sense; it is the pure derivation
//! that combines both gates with the validation engine.
//!
//! Every verification request carries a `RequestToken`. A resolution is only
//! applied when its token is still the gate's in-flight token and the live
//! field value still equals the checked candidate.

pub mod code;
pub mod identifier;
pub mod submission;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Which gate a verification request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VerificationTarget {
    Identifier,
    Code,
}

/// Correlates an in-flight verification with its eventual resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub id: u64,
    pub target: VerificationTarget,
    /// The exact string that was sent for verification.
    pub candidate: String,
}

impl RequestToken {
    /// True if this token still describes `live` (same id in flight, same text).
    pub fn matches(&self, in_flight: Option<&RequestToken>, live: &str) -> bool {
        in_flight.is_some_and(|t| t.id == self.id) && self.candidate == live
    }
}

/// Result yielded exactly once by a verification capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum VerificationOutcome {
    Accepted,
    Rejected(String),
}

impl VerificationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, VerificationOutcome::Accepted)
    }
}

/// User-facing text attached to a gate after a check ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum GateMessage {
    #[default]
    None,
    Success(String),
    Failure(String),
}

impl GateMessage {
    pub fn text(&self) -> &str {
        match self {
            GateMessage::None => "",
            GateMessage::Success(t) | GateMessage::Failure(t) => t,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, GateMessage::Failure(_))
    }
}

/// Monotonic token allocator, one per form instance.
#[derive(Debug, Default, Clone)]
pub struct TokenSeq {
    next: u64,
}

impl TokenSeq {
    pub fn issue(&mut self, target: VerificationTarget, candidate: &str) -> RequestToken {
        self.next += 1;
        RequestToken {
            id: self.next,
            target,
            candidate: candidate.to_string(),
        }
    }
}

/// Character count used for every length rule (not byte length).
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_monotonic() {
        let mut seq = TokenSeq::default();
        let a = seq.issue(VerificationTarget::Identifier, "abcdefgh");
        let b = seq.issue(VerificationTarget::Code, "ABCD1234");
        assert!(b.id > a.id);
        assert_eq!(a.candidate, "abcdefgh");
    }

    #[test]
    fn token_match_requires_same_id_and_text() {
        let mut seq = TokenSeq::default();
        let t = seq.issue(VerificationTarget::Identifier, "abcdefgh");
        assert!(t.matches(Some(&t), "abcdefgh"));
        assert!(!t.matches(Some(&t), "abcdefghi"));
        assert!(!t.matches(None, "abcdefgh"));

        let newer = seq.issue(VerificationTarget::Identifier, "abcdefgh");
        assert!(!t.matches(Some(&newer), "abcdefgh"));
    }

    #[test]
    fn char_len_counts_scalars() {
        assert_eq!(char_len("선생님"), 3);
        assert_eq!(char_len(""), 0);
    }
}
