//! Browser-engine collaborator: a thin wrapper over a WebDriver session.
//!
//! One [`BrowserSession`] maps to one exclusive browser session. Callers
//! launch, navigate, read the rendered document, and must close the session
//! on every exit path; nothing here is shared across calls.

pub mod auth;
mod session;

pub use auth::AuthState;
pub use session::BrowserSession;
