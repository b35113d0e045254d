//! Workspace switch protocol.
//!
//! At most one switch is in flight at a time. A successful switch
//! applies the refreshed credential, adopts the target tenant context,
//! then schedules a full application reload so every downstream cache
//! is rebuilt under the new scope instead of being invalidated
//! piecemeal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use client_core::error::ClientError;
use secrecy::Secret;

use crate::models::tenant::TenantContext;
use crate::services::context_client::{ContextApi, RequestContext};
use crate::session::SessionManager;
use crate::shell::{Navigator, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The selected workspace is already current; nothing to do, no
    /// network call. The selection UI just closes.
    AlreadyCurrent,
    /// The switch succeeded and a reload is scheduled.
    Switched(TenantContext),
}

pub struct WorkspaceSwitcher {
    session: Arc<SessionManager>,
    api: Arc<dyn ContextApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    reload_delay: Duration,
    switching: AtomicBool,
}

impl WorkspaceSwitcher {
    pub fn new(
        session: Arc<SessionManager>,
        api: Arc<dyn ContextApi>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        reload_delay: Duration,
    ) -> Self {
        Self {
            session,
            api,
            navigator,
            notifier,
            reload_delay,
            switching: AtomicBool::new(false),
        }
    }

    pub fn is_switching(&self) -> bool {
        self.switching.load(Ordering::SeqCst)
    }

    /// Exchange the active workspace for `workspace_id`.
    ///
    /// A second call while a switch is in flight is rejected, not
    /// queued. On failure the tenant context is untouched and the
    /// protocol returns to idle.
    pub async fn switch_to(&self, workspace_id: &str) -> Result<SwitchOutcome, ClientError> {
        if self
            .session
            .tenant()
            .is_some_and(|t| t.workspace_id == workspace_id)
        {
            return Ok(SwitchOutcome::AlreadyCurrent);
        }

        let Some(ctx) = self.session.request_context() else {
            return Err(ClientError::NotAuthenticated);
        };

        if self
            .switching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ClientError::SwitchInProgress);
        }

        let result = self.perform_switch(&ctx, workspace_id).await;
        self.switching.store(false, Ordering::SeqCst);

        if let Err(err) = &result {
            tracing::warn!(workspace_id, error = %err, "workspace switch failed");
            self.notifier
                .error(&format!("Could not switch workspace: {err}"));
        }

        result
    }

    async fn perform_switch(
        &self,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> Result<SwitchOutcome, ClientError> {
        let bundle = match self.api.switch_workspace(ctx, workspace_id).await {
            Ok(bundle) => bundle,
            Err(err) => {
                if let Some(status) = err.status() {
                    self.session.apply_failure(status);
                }
                return Err(err);
            }
        };

        // The target must come from the hierarchy we already hold; the
        // switch response is a credential refresh, not a state overwrite.
        let hierarchy = self.session.hierarchy();
        let Some((organization, workspace)) = hierarchy.find_workspace(workspace_id) else {
            return Err(ClientError::UnknownWorkspace(workspace_id.to_string()));
        };

        self.session
            .refresh_credential_only(Secret::new(bundle.access_token));

        let tenant = TenantContext {
            organization_id: organization.id.clone(),
            workspace_id: workspace.id.clone(),
            workspace_name: workspace.name.clone(),
            role: workspace.role,
        };
        self.session.update_tenant_context(tenant.clone());

        self.notifier
            .success(&format!("Switched to {}", tenant.workspace_name));
        self.schedule_reload();

        Ok(SwitchOutcome::Switched(tenant))
    }

    // The delay lets the success notice render before the shell goes
    // down. In-flight requests are not cancelled; the reload discards
    // their continuations.
    fn schedule_reload(&self) {
        let navigator = Arc::clone(&self.navigator);
        let delay = self.reload_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.reload();
        });
    }
}
