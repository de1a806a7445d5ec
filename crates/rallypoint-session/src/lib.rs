//! Player identity for the Rallypoint client.
//!
//! Signing in is not this crate's job: a login flow elsewhere (HTTP, a
//! launcher, a test harness) produces a username and a bearer token. This
//! crate packages them as a [`Session`] value that is handed to the client
//! when it is built, so the transport never reaches into global state to
//! find out who the user is.
//!
//! ```text
//! Login flow (external) → Session → ChatClient (handshake header, chat sender)
//! ```

mod error;
mod session;

pub use error::SessionError;
pub use session::Session;
