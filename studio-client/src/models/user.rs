use client_core::token::TokenClaims;
use serde::{Deserialize, Serialize};

/// Identity of the signed-in user.
///
/// Immutable for the lifetime of a session; replaced wholesale on
/// re-authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserIdentity {
    /// Build an identity from the claims embedded in a bearer token.
    pub fn from_claims(claims: &TokenClaims) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            first_name: claims.given_name.clone(),
            last_name: claims.family_name.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.email.split('@').next().unwrap_or("User").to_string(),
        }
    }
}
