//! OAuth completion.
//!
//! The callback hands over an opaque bearer credential in a one-time URL
//! fragment. User and tenant hints embedded in the token seed the
//! session without a verifying round-trip; they are provisional
//! defaults, and the hierarchy refresh triggered by `establish` is
//! authoritative.

use client_core::error::ClientError;
use client_core::token::decode_claims;
use secrecy::Secret;

use crate::models::tenant::TenantContext;
use crate::models::user::UserIdentity;
use crate::session::SessionManager;

impl SessionManager {
    /// Complete an OAuth sign-in from the credential delivered in the
    /// callback fragment. Proceeds exactly like a password sign-in once
    /// the session is established.
    pub async fn complete_oauth_sign_in(&self, fragment_credential: &str) -> Result<(), ClientError> {
        let claims = decode_claims(fragment_credential)
            .map_err(|e| ClientError::InvalidToken(e.to_string()))?;

        if claims.is_expired() {
            return Err(ClientError::InvalidToken("token already expired".to_string()));
        }

        let identity = UserIdentity::from_claims(&claims);
        let tenant = TenantContext::hint_from_claims(&claims);

        tracing::info!(
            user_id = %identity.id,
            provisional_tenant = tenant.is_some(),
            "completing OAuth sign-in"
        );

        self.establish(
            Secret::new(fragment_credential.to_string()),
            identity,
            tenant,
        )
        .await;

        Ok(())
    }
}
