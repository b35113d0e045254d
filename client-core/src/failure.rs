//! Failure classification for authenticated HTTP calls.
//!
//! Every response from an authenticated call passes through [`classify`]
//! before reaching application code. The classifier itself is a pure
//! mapping; performing the prescribed action is the session manager's job.

use http::StatusCode;

/// Session-level action prescribed for a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Credential is no longer valid. The session must be terminated.
    Terminate,
    /// Access to the current workspace was revoked. The session survives;
    /// the user is routed to the revocation notice.
    AccessRevoked,
    /// Rate limited. Advisory only, no session mutation.
    RateLimited,
    /// Not a session-level failure. Propagated to the caller unmodified.
    Passthrough,
}

pub fn classify(status: StatusCode) -> FailureClass {
    if status == StatusCode::UNAUTHORIZED {
        FailureClass::Terminate
    } else if status == StatusCode::FORBIDDEN {
        FailureClass::AccessRevoked
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        FailureClass::RateLimited
    } else {
        FailureClass::Passthrough
    }
}
