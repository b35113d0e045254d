#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use studio_client::models::tenant::{Role, TenantContext};
use studio_client::models::user::UserIdentity;
use studio_client::services::context_client::HttpContextClient;
use studio_client::session::switch::WorkspaceSwitcher;
use studio_client::session::SessionManager;
use studio_client::shell::{Navigator, Notifier};
use studio_client::store::{
    DurableStore, MemoryStore, CREDENTIAL_KEY, IDENTITY_KEY, TENANT_KEY,
};

pub const TEST_ORG_ID: &str = "org-123";
pub const TEST_WORKSPACE_ID: &str = "ws-123";
pub const TEST_CREDENTIAL: &str = "token-1";

/// Shell double recording every navigation and notice.
#[derive(Default)]
pub struct RecordingShell {
    routes: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl RecordingShell {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.routes().iter().filter(|r| *r == "reload").count()
    }
}

impl Navigator for RecordingShell {
    fn to_sign_in(&self) {
        self.routes.lock().unwrap().push("sign-in".to_string());
    }

    fn to_access_revoked(&self) {
        self.routes
            .lock()
            .unwrap()
            .push("access-revoked".to_string());
    }

    fn reload(&self) {
        self.routes.lock().unwrap().push("reload".to_string());
    }
}

impl Notifier for RecordingShell {
    fn success(&self, message: &str) {
        self.notices.lock().unwrap().push(format!("success: {message}"));
    }

    fn warning(&self, message: &str) {
        self.notices.lock().unwrap().push(format!("warning: {message}"));
    }

    fn error(&self, message: &str) {
        self.notices.lock().unwrap().push(format!("error: {message}"));
    }
}

pub struct TestHarness {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub shell: Arc<RecordingShell>,
    pub api: Arc<HttpContextClient>,
    pub session: Arc<SessionManager>,
}

impl TestHarness {
    pub async fn spawn() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::default());
        let shell = Arc::new(RecordingShell::default());
        let api = Arc::new(HttpContextClient::new(server.uri()));
        let session = SessionManager::new(
            store.clone(),
            api.clone(),
            shell.clone(),
            shell.clone(),
        );

        Self {
            server,
            store,
            shell,
            api,
            session,
        }
    }

    pub fn switcher(&self, reload_delay: Duration) -> WorkspaceSwitcher {
        WorkspaceSwitcher::new(
            self.session.clone(),
            self.api.clone(),
            self.shell.clone(),
            self.shell.clone(),
            reload_delay,
        )
    }

    /// Seed the durable store with the canonical signed-in triple.
    pub fn seed_store(&self) {
        let store = self.durable();
        store.put_json(CREDENTIAL_KEY, &TEST_CREDENTIAL.to_string());
        store.put_json(IDENTITY_KEY, &sample_identity());
        store.put_json(TENANT_KEY, &sample_tenant());
    }

    pub fn stored_credential(&self) -> Option<String> {
        self.durable().get_json(CREDENTIAL_KEY)
    }

    pub fn stored_identity(&self) -> Option<UserIdentity> {
        self.durable().get_json(IDENTITY_KEY)
    }

    pub fn stored_tenant(&self) -> Option<TenantContext> {
        self.durable().get_json(TENANT_KEY)
    }

    pub fn stored_tenant_raw(&self) -> Option<Value> {
        self.durable()
            .get_raw(TENANT_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    fn durable(&self) -> &dyn DurableStore {
        self.store.as_ref()
    }
}

pub fn sample_identity() -> UserIdentity {
    UserIdentity {
        id: "user-1".to_string(),
        email: "pat@example.com".to_string(),
        first_name: Some("Pat".to_string()),
        last_name: Some("Lee".to_string()),
    }
}

pub fn sample_tenant() -> TenantContext {
    TenantContext {
        organization_id: TEST_ORG_ID.to_string(),
        workspace_id: TEST_WORKSPACE_ID.to_string(),
        workspace_name: "Core Business".to_string(),
        role: Role::WorkspaceAdmin,
    }
}

/// Context listing with three workspaces under the canonical org.
pub fn listing_json() -> Value {
    json!({
        "availableContexts": [
            {"id": "ws-123", "name": "Core Business", "organizationId": "org-123", "role": "WORKSPACE_ADMIN"},
            {"id": "ws-2", "name": "Marketing", "organizationId": "org-123", "role": "EDITOR"},
            {"id": "ws-3", "name": "Support", "organizationId": "org-123", "role": "VIEWER"}
        ],
        "organizations": [
            {"id": "org-123", "name": "Acme Operations"}
        ]
    })
}

pub async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/contexts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json()))
        .mount(server)
        .await;
}

pub async fn mount_listing_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/auth/contexts"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Unsigned bearer token with the given claims payload, in the shape the
/// auth service mints.
pub fn bearer_token(claims: Value) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
