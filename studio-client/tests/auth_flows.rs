mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use client_core::error::ClientError;
use studio_client::models::tenant::Role;

fn signin_token() -> String {
    bearer_token(json!({
        "sub": "user-1",
        "email": "pat@example.com",
        "given_name": "Pat",
        "family_name": "Lee",
        "exp": 9999999999i64,
        "iat": 1736500000,
    }))
}

#[tokio::test]
async fn password_sign_in_establishes_the_session() {
    let harness = TestHarness::spawn().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "pat@example.com",
            "password": "hunter2",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "accessToken": signin_token() })),
        )
        .mount(&harness.server)
        .await;
    mount_listing(&harness.server).await;

    harness
        .session
        .sign_in("pat@example.com", "hunter2")
        .await
        .unwrap();

    assert!(harness.session.signal().is_authenticated);
    assert_eq!(harness.session.identity(), Some(sample_identity()));
    assert_eq!(harness.stored_credential(), Some(signin_token()));
    assert_eq!(harness.session.hierarchy().workspace_count(), 3);
}

/// Rejected credentials are the caller's problem; they never tear down
/// session state or trigger navigation.
#[tokio::test]
async fn rejected_credentials_do_not_terminate_anything() {
    let harness = TestHarness::spawn().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;

    let result = harness.session.sign_in("pat@example.com", "wrong").await;

    assert!(matches!(result, Err(ClientError::Status { .. })));
    assert!(!harness.session.is_authenticated());
    assert!(harness.shell.routes().is_empty());
}

#[tokio::test]
async fn oauth_completion_applies_provisional_tenant_hints() {
    let harness = TestHarness::spawn().await;
    mount_listing(&harness.server).await;
    let token = bearer_token(json!({
        "sub": "user-1",
        "email": "pat@example.com",
        "given_name": "Pat",
        "family_name": "Lee",
        "exp": 9999999999i64,
        "iat": 1736500000,
        "org_id": "org-123",
        "workspace_id": "ws-2",
        "workspace_name": "Marketing",
        "role": "EDITOR",
    }));

    harness.session.complete_oauth_sign_in(&token).await.unwrap();

    let tenant = harness.session.tenant().unwrap();
    assert_eq!(tenant.organization_id, "org-123");
    assert_eq!(tenant.workspace_id, "ws-2");
    assert_eq!(tenant.workspace_name, "Marketing");
    assert_eq!(tenant.role, Role::Editor);
    assert_eq!(harness.stored_credential(), Some(token));
    assert_eq!(harness.session.identity(), Some(sample_identity()));
    // The hierarchy fetched after establish is the authoritative view.
    assert!(harness.session.hierarchy().contains_workspace("ws-2"));
}

/// A token without tenant hints leaves the tenant unset until the
/// hierarchy lands; that window is expected, not an error.
#[tokio::test]
async fn oauth_completion_without_hints_leaves_tenant_unset() {
    let harness = TestHarness::spawn().await;
    mount_listing(&harness.server).await;
    let token = signin_token();

    harness.session.complete_oauth_sign_in(&token).await.unwrap();

    assert!(harness.session.is_authenticated());
    assert_eq!(harness.session.tenant(), None);
    assert!(harness.stored_tenant().is_none());
    assert_eq!(harness.session.hierarchy().workspace_count(), 3);
}

#[tokio::test]
async fn oauth_completion_rejects_malformed_tokens() {
    let harness = TestHarness::spawn().await;

    let result = harness.session.complete_oauth_sign_in("not-a-token").await;

    assert!(matches!(result, Err(ClientError::InvalidToken(_))));
    assert!(!harness.session.is_authenticated());
    assert!(harness.stored_credential().is_none());
    assert!(harness
        .server
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn oauth_completion_rejects_expired_tokens() {
    let harness = TestHarness::spawn().await;
    let token = bearer_token(json!({
        "sub": "user-1",
        "email": "pat@example.com",
        "exp": 1000000000,
        "iat": 999990000,
    }));

    let result = harness.session.complete_oauth_sign_in(&token).await;

    assert!(matches!(result, Err(ClientError::InvalidToken(_))));
    assert!(!harness.session.is_authenticated());
}

#[tokio::test]
async fn sign_out_revokes_then_clears() {
    let harness = TestHarness::spawn().await;
    harness.seed_store();
    if let Some(refresh) = harness.session.bootstrap() {
        refresh.await.unwrap();
    }
    harness.server.reset().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(body_json(json!({ "token": TEST_CREDENTIAL })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness.session.sign_out().await;

    assert!(harness.stored_credential().is_none());
    assert!(harness.stored_identity().is_none());
    assert!(harness.stored_tenant().is_none());
    assert!(!harness.session.is_authenticated());
    assert_eq!(harness.shell.routes(), vec!["sign-in"]);
    harness.server.verify().await;
}

/// Revocation is best-effort; a failing logout endpoint never blocks the
/// local teardown.
#[tokio::test]
async fn sign_out_survives_a_failing_revocation() {
    let harness = TestHarness::spawn().await;
    harness.seed_store();
    if let Some(refresh) = harness.session.bootstrap() {
        refresh.await.unwrap();
    }
    harness.server.reset().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.server)
        .await;

    harness.session.sign_out().await;

    assert!(harness.stored_credential().is_none());
    assert!(!harness.session.is_authenticated());
    assert_eq!(harness.shell.routes(), vec!["sign-in"]);
}
