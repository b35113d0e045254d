//! Session state machine.
//!
//! Owns the in-memory credential, user identity, tenant context and the
//! accessible hierarchy; keeps the durable store in step with them; and
//! publishes the loading/authenticated signal the rest of the
//! application renders from.

pub mod auth_flows;
pub mod oauth;
pub mod switch;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use client_core::failure::{classify, FailureClass};
use http::StatusCode;
use secrecy::{ExposeSecret, Secret};
use tokio::sync::watch;

use crate::context;
use crate::models::tenant::{AccessibleHierarchy, TenantContext};
use crate::models::user::UserIdentity;
use crate::services::context_client::{ContextApi, RequestContext};
use crate::shell::{Navigator, Notifier};
use crate::store::{DurableStore, CREDENTIAL_KEY, IDENTITY_KEY, TENANT_KEY};

/// Observable slice of session state for the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSignal {
    pub is_loading: bool,
    pub is_authenticated: bool,
}

#[derive(Default)]
struct SessionState {
    credential: Option<Secret<String>>,
    identity: Option<UserIdentity>,
    tenant: Option<TenantContext>,
    hierarchy: AccessibleHierarchy,
    is_loading: bool,
}

pub struct SessionManager {
    store: Arc<dyn DurableStore>,
    api: Arc<dyn ContextApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SessionState>,
    signal: watch::Sender<SessionSignal>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn DurableStore>,
        api: Arc<dyn ContextApi>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        let (signal, _) = watch::channel(SessionSignal {
            is_loading: true,
            is_authenticated: false,
        });

        Arc::new(Self {
            store,
            api,
            navigator,
            notifier,
            state: RwLock::new(SessionState {
                is_loading: true,
                ..SessionState::default()
            }),
            signal,
        })
    }

    /// Subscribe to loading/authenticated changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSignal> {
        self.signal.subscribe()
    }

    pub fn signal(&self) -> SessionSignal {
        *self.signal.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().credential.is_some()
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.read().identity.clone()
    }

    pub fn tenant(&self) -> Option<TenantContext> {
        self.read().tenant.clone()
    }

    pub fn hierarchy(&self) -> AccessibleHierarchy {
        self.read().hierarchy.clone()
    }

    /// Credential and scoping ids attached to every authenticated
    /// request. `None` while unauthenticated; the scoping headers are
    /// omitted until a tenant is selected.
    pub fn request_context(&self) -> Option<RequestContext> {
        let state = self.read();
        let credential = state.credential.clone()?;
        Some(RequestContext {
            credential,
            organization_id: state.tenant.as_ref().map(|t| t.organization_id.clone()),
            workspace_id: state.tenant.as_ref().map(|t| t.workspace_id.clone()),
        })
    }

    /// Populate the session from durable storage, then refresh the
    /// hierarchy in the background when a credential was found.
    ///
    /// The synchronous portion always completes before the refresh
    /// settles, so the first paint renders last-known-good data instead
    /// of blocking on the network. Returns the refresh task when one was
    /// spawned.
    pub fn bootstrap(self: &Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        let credential: Option<String> = self.store.get_json(CREDENTIAL_KEY);
        let identity: Option<UserIdentity> = self.store.get_json(IDENTITY_KEY);
        let tenant: Option<TenantContext> = self.store.get_json(TENANT_KEY);

        let has_credential = credential.is_some();
        {
            let mut state = self.write();
            state.credential = credential.map(Secret::new);
            state.identity = identity;
            state.tenant = tenant;
            state.is_loading = false;
            self.publish(&state);
        }

        if !has_credential {
            return None;
        }

        let manager = Arc::clone(self);
        Some(tokio::spawn(async move {
            manager.refresh_hierarchy().await;
        }))
    }

    /// Seed a fresh session from a sign-in or OAuth completion, persist
    /// it, and fetch the authoritative hierarchy. Idempotent for
    /// identical arguments.
    pub async fn establish(
        &self,
        credential: Secret<String>,
        identity: UserIdentity,
        tenant: Option<TenantContext>,
    ) {
        {
            let mut state = self.write();
            state.credential = Some(credential.clone());
            state.identity = Some(identity.clone());
            state.tenant = tenant.clone();
            state.hierarchy = AccessibleHierarchy::default();
            state.is_loading = false;
            self.publish(&state);
        }

        self.store
            .put_json(CREDENTIAL_KEY, credential.expose_secret());
        self.store.put_json(IDENTITY_KEY, &identity);
        match &tenant {
            Some(tenant) => self.store.put_json(TENANT_KEY, tenant),
            None => self.store.remove(TENANT_KEY),
        }

        tracing::info!(user_id = %identity.id, "session established");

        self.refresh_hierarchy().await;
    }

    /// Adopt a new tenant context after a successful switch. Credential
    /// and identity are untouched.
    pub fn update_tenant_context(&self, tenant: TenantContext) {
        {
            let mut state = self.write();
            state.tenant = Some(tenant.clone());
            self.publish(&state);
        }
        self.store.put_json(TENANT_KEY, &tenant);

        tracing::info!(
            workspace_id = %tenant.workspace_id,
            role = tenant.role.as_str(),
            "tenant context updated"
        );
    }

    /// Replace only the bearer credential after a silent renewal. Tenant
    /// and identity must survive unchanged.
    pub fn refresh_credential_only(&self, credential: Secret<String>) {
        {
            let mut state = self.write();
            state.credential = Some(credential.clone());
            self.publish(&state);
        }
        self.store
            .put_json(CREDENTIAL_KEY, credential.expose_secret());
    }

    /// Clear the session in memory and storage and route to the
    /// unauthenticated entry point. Safe to call repeatedly; an empty
    /// session clears to empty.
    pub fn terminate(&self) {
        {
            let mut state = self.write();
            state.credential = None;
            state.identity = None;
            state.tenant = None;
            state.hierarchy = AccessibleHierarchy::default();
            state.is_loading = false;
            self.publish(&state);
        }
        self.clear_durable_state();
        self.navigator.to_sign_in();
    }

    /// Storage-clearing effect of the revocation notice page. Leaves the
    /// in-memory session alone and does not navigate.
    pub fn clear_durable_state(&self) {
        self.store.remove(CREDENTIAL_KEY);
        self.store.remove(IDENTITY_KEY);
        self.store.remove(TENANT_KEY);
    }

    /// Fetch and publish the accessible hierarchy.
    ///
    /// No-op without a credential. On failure the previous hierarchy is
    /// kept; stale data beats empty data. The call never clears the
    /// session on its own, though a 401 still goes through the failure
    /// classifier like every authenticated call.
    pub async fn refresh_hierarchy(&self) {
        let Some(ctx) = self.request_context() else {
            return;
        };

        match self.api.list_contexts(&ctx).await {
            Ok(listing) => {
                let hierarchy =
                    context::normalize(&listing.available_contexts, &listing.organizations);
                tracing::debug!(
                    organizations = hierarchy.organizations.len(),
                    workspaces = hierarchy.workspace_count(),
                    "hierarchy refreshed"
                );
                let mut state = self.write();
                state.hierarchy = hierarchy;
            }
            Err(err) => {
                let class = match err.status() {
                    Some(status) => self.apply_failure(status),
                    None => FailureClass::Passthrough,
                };
                if class == FailureClass::Passthrough {
                    tracing::warn!(error = %err, "context refresh failed; keeping previous hierarchy");
                }
            }
        }
    }

    /// Run the failure classifier over a response status and perform the
    /// session-level action it prescribes. Every authenticated call site
    /// routes its error statuses through here. Returns the class so the
    /// caller can decide whether the error still needs surfacing.
    pub fn apply_failure(&self, status: StatusCode) -> FailureClass {
        let class = classify(status);
        match class {
            FailureClass::Terminate => {
                tracing::warn!(%status, "credential rejected; terminating session");
                self.terminate();
            }
            FailureClass::AccessRevoked => {
                // Session fields stay populated; the revocation notice
                // clears storage as its own step.
                tracing::warn!(%status, "workspace access revoked");
                self.navigator.to_access_revoked();
            }
            FailureClass::RateLimited => {
                self.notifier
                    .warning("Too many requests right now. Please retry in a moment.");
            }
            FailureClass::Passthrough => {}
        }
        class
    }

    fn publish(&self, state: &SessionState) {
        let next = SessionSignal {
            is_loading: state.is_loading,
            is_authenticated: state.credential.is_some(),
        };
        self.signal.send_if_modified(|current| {
            if *current != next {
                *current = next;
                true
            } else {
                false
            }
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
