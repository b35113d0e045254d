//! Seams to the application shell.
//!
//! Navigation and user notification belong to the surrounding
//! application; the session subsystem only ever talks to these traits.

/// Routing actions the session subsystem may request.
pub trait Navigator: Send + Sync {
    /// Route to the unauthenticated entry point.
    fn to_sign_in(&self);
    /// Route to the workspace-access-revoked notice.
    fn to_access_revoked(&self);
    /// Restart the application shell so every downstream cache is
    /// rebuilt under the current tenant scope.
    fn reload(&self);
}

/// User-visible notices.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Console-backed shell used by the binary.
pub struct ConsoleShell;

impl Navigator for ConsoleShell {
    fn to_sign_in(&self) {
        tracing::info!("navigating to sign-in");
    }

    fn to_access_revoked(&self) {
        tracing::warn!("navigating to the access-revoked notice");
    }

    fn reload(&self) {
        tracing::info!("reloading the application shell");
    }
}

impl Notifier for ConsoleShell {
    fn success(&self, message: &str) {
        tracing::info!(%message, "notice");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(%message, "notice");
    }

    fn error(&self, message: &str) {
        tracing::error!(%message, "notice");
    }
}
