//! HTTP client for the auth and context endpoints.
//!
//! Every authenticated request carries the bearer credential and, once a
//! tenant is selected, the organization/workspace scoping headers.

use async_trait::async_trait;
use client_core::error::ClientError;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::tenant::Role;

/// Scoping header carrying the current organization id.
pub const ORG_HEADER: &str = "X-Org-ID";
/// Scoping header carrying the current workspace id.
pub const WORKSPACE_HEADER: &str = "X-Workspace-ID";

/// Credential plus scoping identifiers attached to authenticated calls.
#[derive(Clone)]
pub struct RequestContext {
    pub credential: Secret<String>,
    pub organization_id: Option<String>,
    pub workspace_id: Option<String>,
}

/// One entry of the flat workspace-context listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceContext {
    pub id: String,
    pub name: String,
    pub organization_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub id: String,
    pub name: String,
}

/// Response of the context-listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextListing {
    pub available_contexts: Vec<WorkspaceContext>,
    pub organizations: Vec<OrganizationSummary>,
}

/// Refreshed credential bundle returned by sign-in and workspace switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBundle {
    pub access_token: String,
}

#[async_trait]
pub trait ContextApi: Send + Sync {
    async fn list_contexts(&self, ctx: &RequestContext) -> Result<ContextListing, ClientError>;

    async fn switch_workspace(
        &self,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> Result<CredentialBundle, ClientError>;

    async fn sign_in(&self, email: &str, password: &str)
        -> Result<CredentialBundle, ClientError>;

    async fn sign_out(&self, ctx: &RequestContext) -> Result<(), ClientError>;
}

pub struct HttpContextClient {
    client: Client,
    base_url: String,
}

impl HttpContextClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_context(builder: RequestBuilder, ctx: &RequestContext) -> RequestBuilder {
        let mut builder = builder.bearer_auth(ctx.credential.expose_secret());
        if let Some(org_id) = &ctx.organization_id {
            builder = builder.header(ORG_HEADER, org_id);
        }
        if let Some(workspace_id) = &ctx.workspace_id {
            builder = builder.header(WORKSPACE_HEADER, workspace_id);
        }
        builder
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContextApi for HttpContextClient {
    async fn list_contexts(&self, ctx: &RequestContext) -> Result<ContextListing, ClientError> {
        let url = self.url("/auth/contexts");

        let response = Self::with_context(self.client.get(&url), ctx)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send GET request to {}: {}", url, e);
                ClientError::from(e)
            })?;

        Self::read_json(response).await
    }

    async fn switch_workspace(
        &self,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> Result<CredentialBundle, ClientError> {
        let url = self.url("/auth/context/switch");

        let response = Self::with_context(self.client.post(&url), ctx)
            .json(&serde_json::json!({ "workspaceId": workspace_id }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                ClientError::from(e)
            })?;

        Self::read_json(response).await
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CredentialBundle, ClientError> {
        let url = self.url("/auth/login");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                ClientError::from(e)
            })?;

        Self::read_json(response).await
    }

    async fn sign_out(&self, ctx: &RequestContext) -> Result<(), ClientError> {
        let url = self.url("/auth/logout");

        let response = Self::with_context(self.client.post(&url), ctx)
            .json(&serde_json::json!({ "token": ctx.credential.expose_secret() }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                ClientError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(())
    }
}
