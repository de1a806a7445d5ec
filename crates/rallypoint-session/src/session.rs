//! The signed-in user's identity and credentials.

use std::fmt;

use crate::SessionError;

/// Who the local player is and how they prove it.
///
/// Built once after login and passed into the client at construction. The
/// client reads `username` when wrapping outgoing chat and `token` when
/// opening a connection. Both are validated non-blank up front so those
/// paths never have to handle a half-initialised session.
///
/// `Debug` redacts the token so sessions can be logged.
///
/// ```rust
/// use rallypoint_session::Session;
///
/// let session = Session::new("alice", "eyJhbGciOi...").unwrap();
/// assert_eq!(session.username(), "alice");
/// assert!(Session::new("", "token").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    token: String,
}

impl Session {
    /// Creates a session, rejecting a blank username or token.
    pub fn new(
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let username = username.into();
        let token = token.into();

        if username.trim().is_empty() {
            return Err(SessionError::EmptyUsername);
        }
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        tracing::debug!(%username, "session created");
        Ok(Self { username, token })
    }

    /// The display name attached to outgoing chat.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The bearer token presented during the handshake.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns `true` if `sender_name` is this session's user.
    pub fn is_self(&self, sender_name: &str) -> bool {
        self.username == sender_name
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}
