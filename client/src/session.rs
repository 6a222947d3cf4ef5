//! Client half of the session lifecycle.
//!
//! The server owns the authoritative session (a TTL'd marker in the remote
//! store); the client only tracks which phase of the lifecycle it believes it
//! is in, so the UI can decide between "prompt for the code" and "operate
//! synchronized". The one-way door: nothing but a successful `verify_code`
//! reaches `Authenticated`, and an observed 401 always lands in `Expired`.

/// Lifecycle phase of the shared-code session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Never verified (or verification abandoned).
    Unauthenticated,
    /// A code has been requested and awaits submission.
    Pending,
    /// The remote accepted the code; the cookie is live.
    Authenticated,
    /// A privileged call came back 401; re-verification required.
    Expired,
}

/// Pure state machine; transitions are driven by [`crate::DataManager`].
#[derive(Clone, Copy, Debug)]
pub struct SessionGate {
    state: SessionState,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self {
            state: SessionState::Unauthenticated,
        }
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// A verification code was issued. No effect on a live session.
    pub fn code_requested(&mut self) {
        if self.state != SessionState::Authenticated {
            self.state = SessionState::Pending;
        }
    }

    /// The remote accepted a verification code.
    pub fn verified(&mut self) {
        self.state = SessionState::Authenticated;
    }

    /// A privileged operation observed 401: the store-side marker is gone.
    pub fn expired(&mut self) {
        self.state = SessionState::Expired;
    }
}
