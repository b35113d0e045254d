//! Password sign-in and sign-out flows.

use client_core::error::ClientError;
use client_core::token::decode_claims;
use secrecy::Secret;

use crate::models::tenant::TenantContext;
use crate::models::user::UserIdentity;
use crate::session::SessionManager;

impl SessionManager {
    /// Exchange an email/password pair for a bearer credential and
    /// establish the session. Identity comes from the token's own
    /// claims. Sign-in failures are the caller's to surface; a 401 here
    /// means bad credentials, not a dead session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let bundle = self.api.sign_in(email, password).await?;

        let claims = decode_claims(&bundle.access_token)
            .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
        let identity = UserIdentity::from_claims(&claims);
        let tenant = TenantContext::hint_from_claims(&claims);

        tracing::info!(user_id = %identity.id, email = %identity.email, "user signed in");

        self.establish(Secret::new(bundle.access_token), identity, tenant)
            .await;

        Ok(())
    }

    /// Revoke the credential best-effort, then tear the session down.
    /// Revocation failures never block the sign-out.
    pub async fn sign_out(&self) {
        if let Some(ctx) = self.request_context() {
            if let Err(err) = self.api.sign_out(&ctx).await {
                tracing::warn!(error = %err, "token revocation failed during sign-out");
            }
        }

        self.terminate();
    }
}
