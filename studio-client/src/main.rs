use dotenvy::dotenv;
use std::sync::Arc;

use client_core::observability::init_tracing;
use studio_client::config::get_configuration;
use studio_client::services::context_client::HttpContextClient;
use studio_client::session::SessionManager;
use studio_client::shell::ConsoleShell;
use studio_client::store::FileStore;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration =
        get_configuration().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    init_tracing("studio-client", "info");

    let store = Arc::new(FileStore::new(configuration.storage.profile_dir.clone()));
    let api = Arc::new(HttpContextClient::new(configuration.api.base_url.clone()));
    let shell = Arc::new(ConsoleShell);

    let session = SessionManager::new(store, api, shell.clone(), shell);

    // Synchronous restore first; the hierarchy refresh settles after.
    let refresh = session.bootstrap();
    let signal = session.signal();
    info!(
        restored = refresh.is_some(),
        is_authenticated = signal.is_authenticated,
        "session bootstrapped"
    );

    if let Some(refresh) = refresh {
        refresh.await.ok();
        let hierarchy = session.hierarchy();
        info!(
            organizations = hierarchy.organizations.len(),
            workspaces = hierarchy.workspace_count(),
            tenant = ?session.tenant().map(|t| t.workspace_name),
            "session ready"
        );
    }

    Ok(())
}
