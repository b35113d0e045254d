//! Tenant context and the accessible organization/workspace hierarchy.

use client_core::token::TokenClaims;
use serde::{Deserialize, Serialize};

/// Role granted to the user within a single workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    WorkspaceAdmin,
    Editor,
    Viewer,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WORKSPACE_ADMIN" => Some(Self::WorkspaceAdmin),
            "EDITOR" => Some(Self::Editor),
            "VIEWER" => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkspaceAdmin => "WORKSPACE_ADMIN",
            Self::Editor => "EDITOR",
            Self::Viewer => "VIEWER",
        }
    }
}

/// The organization, workspace and role currently active for the user.
///
/// Exactly one tenant context is current at any time. The serde names
/// below are the durable-storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    #[serde(rename = "orgId")]
    pub organization_id: String,
    #[serde(rename = "wsId")]
    pub workspace_id: String,
    #[serde(rename = "wsName")]
    pub workspace_name: String,
    pub role: Role,
}

impl TenantContext {
    /// Provisional tenant context from the hints embedded in an
    /// externally issued token. The context listing fetched right after
    /// establishing the session is authoritative; a missing role hint
    /// reads as viewer until then.
    pub fn hint_from_claims(claims: &TokenClaims) -> Option<Self> {
        let organization_id = claims.org_id.clone()?;
        let workspace_id = claims.workspace_id.clone()?;
        Some(Self {
            organization_id,
            workspace_name: claims
                .workspace_name
                .clone()
                .unwrap_or_else(|| workspace_id.clone()),
            workspace_id,
            role: claims
                .role
                .as_deref()
                .and_then(Role::parse)
                .unwrap_or(Role::Viewer),
        })
    }
}

/// One workspace the user may switch into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// An organization and the workspaces reachable under it.
///
/// `name` is `None` for entries synthesized from a workspace whose
/// organization was absent from the organization listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationGroup {
    pub id: String,
    pub name: Option<String>,
    pub workspaces: Vec<WorkspaceEntry>,
}

/// Every organization and workspace the user may switch into.
///
/// Rebuilt in full on every context refresh; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessibleHierarchy {
    pub organizations: Vec<OrganizationGroup>,
}

impl AccessibleHierarchy {
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }

    pub fn workspace_count(&self) -> usize {
        self.organizations.iter().map(|o| o.workspaces.len()).sum()
    }

    /// Find a workspace and its parent organization.
    pub fn find_workspace(
        &self,
        workspace_id: &str,
    ) -> Option<(&OrganizationGroup, &WorkspaceEntry)> {
        self.organizations.iter().find_map(|org| {
            org.workspaces
                .iter()
                .find(|ws| ws.id == workspace_id)
                .map(|ws| (org, ws))
        })
    }

    pub fn contains_workspace(&self, workspace_id: &str) -> bool {
        self.find_workspace(workspace_id).is_some()
    }
}
