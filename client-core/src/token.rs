use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    pub exp: i64,
    pub iat: i64,
    /// Tenant hints minted into externally issued tokens. Provisional
    /// until the context listing confirms them.
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.exp
    }
}

/// Decode bearer-token claims without validation
///
/// The client receives tokens straight from the auth service (login
/// response, OAuth callback fragment) and only needs the embedded user
/// and tenant hints to seed the session.
///
/// Note: This does NOT validate the signature. The authoritative check
/// is the context-listing call made with the token attached.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(anyhow::anyhow!("Invalid token format"));
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| anyhow::anyhow!("Failed to decode token payload: {}", e))?;

    let claims: TokenClaims = serde_json::from_slice(&payload)
        .map_err(|e| anyhow::anyhow!("Failed to parse token claims: {}", e))?;

    Ok(claims)
}
