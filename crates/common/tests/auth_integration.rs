//! Integration tests for auth module
//!
//! Exercises both credential strategies through `AuthContext` against a
//! scripted transport and a mock clock.

#![cfg(feature = "runtime")]

use std::sync::Arc;
use std::time::Duration;

use basalam_common::auth::{
    AuthContext, AuthError, AuthorizationCode, AuthorizationState, ClientCredentials,
    CredentialStrategy, OAuthConfig, Scope, TokenRecord, TokenStatus,
};
use basalam_common::testing::{Clock, MockClock, MockTransport};
use serde_json::json;

const TOKEN_URL: &str = "https://auth.test/oauth/token";
const AUTHORIZE_URL: &str = "https://auth.test/authorize";

fn client_credentials(transport: &MockTransport, clock: &MockClock) -> ClientCredentials {
    ClientCredentials::with_clock(
        OAuthConfig::new("c", "s").with_token_url(TOKEN_URL),
        Arc::new(transport.clone()),
        Arc::new(clock.clone()),
    )
    .expect("valid client credentials config")
}

fn authorization_code(transport: &MockTransport, clock: &MockClock) -> AuthorizationCode {
    let config = OAuthConfig::new("c", "s")
        .with_token_url(TOKEN_URL)
        .with_authorize_url(AUTHORIZE_URL)
        .with_redirect_uri("https://app.test/callback")
        .with_scopes([Scope::CustomerOrderRead, Scope::CustomerWalletRead]);
    AuthorizationCode::with_clock(config, Arc::new(transport.clone()), Arc::new(clock.clone()))
        .expect("valid authorization code config")
}

fn context<S: CredentialStrategy>(strategy: S, clock: &MockClock) -> AuthContext<S> {
    AuthContext::with_clock(strategy, Arc::new(clock.clone()))
        .with_refresh_margin(Duration::from_secs(5))
}

/// Validates the client credentials acquire scenario.
///
/// # Test Steps
/// 1. Script the endpoint with `{access_token: "tok1", expires_in: 10}`
/// 2. Acquire through the strategy
/// 3. Verify the token and that `expires_at == created_at + 10s`
#[tokio::test]
async fn test_client_credentials_acquire() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 10}));

    let record = client_credentials(&transport, &clock).acquire().await.expect("acquire");

    assert_eq!(record.access_token(), "tok1");
    assert_eq!(record.created_at(), clock.now());
    assert_eq!(record.expires_at(), record.created_at() + chrono::Duration::seconds(10));
    assert!(!record.is_expired(clock.now()));
}

/// Validates renewal once the token has expired.
///
/// # Test Steps
/// 1. Obtain `tok1` (10s lifetime) through the context
/// 2. Advance the clock by 11 seconds
/// 3. Verify a second network call yields a different token
#[tokio::test]
async fn test_client_credentials_renews_after_expiry() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 10}));
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok2", "expires_in": 10}));
    let context = context(client_credentials(&transport, &clock), &clock);

    assert_eq!(context.get_valid_token().await.expect("first token"), "tok1");

    clock.advance(Duration::from_secs(11));
    assert_eq!(context.status(), TokenStatus::Expired);

    let renewed = context.get_valid_token().await.expect("renewed token");
    assert_ne!(renewed, "tok1");
    assert_eq!(renewed, "tok2");
    assert_eq!(transport.request_count(TOKEN_URL), 2);
}

/// Validates that repeated calls inside the validity window hit the network
/// once.
///
/// # Test Steps
/// 1. Obtain a one-hour token
/// 2. Call `get_valid_token` repeatedly while advancing up to the margin
/// 3. Verify exactly one network call was made
#[tokio::test]
async fn test_repeated_calls_are_idempotent() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 3600}));
    let context = context(client_credentials(&transport, &clock), &clock);

    for _ in 0..20 {
        assert_eq!(context.get_valid_token().await.expect("token"), "tok1");
        clock.advance(Duration::from_secs(100));
    }
    clock.set_elapsed(Duration::from_secs(3594));
    assert_eq!(context.get_valid_token().await.expect("token"), "tok1");

    assert_eq!(transport.request_count(TOKEN_URL), 1);
}

/// Validates the full authorization code flow.
///
/// # Test Steps
/// 1. Build the authorization URL with state `xyz`
/// 2. Exchange `authcode1` with the matching state
/// 3. Replay the exchange with state `wrong`
/// 4. Verify the replay fails with `CsrfMismatch` and made no network call
#[tokio::test]
async fn test_authorization_code_flow() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(
        TOKEN_URL,
        200,
        json!({
            "access_token": "user-token",
            "refresh_token": "R1",
            "expires_in": 3600,
            "scope": "customer.order.read customer.wallet.read"
        }),
    );
    let context = context(authorization_code(&transport, &clock), &clock);

    let url = context.authorization_url("xyz");
    assert!(url.as_str().starts_with(AUTHORIZE_URL));
    assert!(url.as_str().contains("state=xyz"));
    assert!(url.as_str().contains("response_type=code"));

    let record = context.exchange_code("authcode1", "xyz").await.expect("exchange");
    assert_eq!(record.refresh_token(), Some("R1"));
    assert_eq!(context.authorization_state(), AuthorizationState::Authorized);
    assert_eq!(context.get_valid_token().await.expect("cached token"), "user-token");
    assert!(context.has_scope(Scope::CustomerWalletRead.as_str()));

    let err = context.exchange_code("authcode1", "wrong").await.expect_err("replay");
    assert_eq!(err, AuthError::CsrfMismatch);
    assert_eq!(transport.request_count(TOKEN_URL), 1);
}

/// Validates that a state mismatch after issuing a URL never reaches the
/// network.
#[tokio::test]
async fn test_state_mismatch_rejected() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    let context = context(authorization_code(&transport, &clock), &clock);

    let _ = context.authorization_url("expected");
    let err = context.exchange_code("code", "attacker").await.expect_err("mismatch");

    assert_eq!(err, AuthError::CsrfMismatch);
    assert_eq!(transport.total_requests(), 0);
    assert!(!context.is_authenticated());
}

/// Validates that a reused authorization code surfaces `InvalidGrant`.
///
/// # Test Steps
/// 1. Start a fresh authorization attempt
/// 2. Script the endpoint to reject the code as already used
/// 3. Verify `InvalidGrant` with the provider's description and no retry
#[tokio::test]
async fn test_reused_code_is_invalid_grant() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(
        TOKEN_URL,
        400,
        json!({"error": "invalid_grant", "error_description": "code already used"}),
    );
    let context = context(authorization_code(&transport, &clock), &clock);
    let (_, state) = context.begin_authorization();

    let err = context.exchange_code("authcode1", &state).await.expect_err("reused code");

    assert_eq!(err, AuthError::InvalidGrant("code already used".into()));
    assert_eq!(transport.request_count(TOKEN_URL), 1);
    assert_eq!(context.authorization_state(), AuthorizationState::AwaitingAuthorization);
}

/// Validates refresh token carryover through the context.
///
/// # Test Steps
/// 1. Seed a record holding refresh token `R1` that is about to expire
/// 2. Script a refresh response without `refresh_token`
/// 3. Verify the new record still carries `R1`
#[tokio::test]
async fn test_refresh_token_carryover() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "fresh", "expires_in": 3600}));
    let context = context(authorization_code(&transport, &clock), &clock);
    let seeded =
        TokenRecord::new("stale", 3, clock.now()).expect("record").with_refresh_token("R1");
    context.store_record(seeded);

    assert_eq!(context.get_valid_token().await.expect("refreshed"), "fresh");

    let current = context.current_record().expect("record cached");
    assert_eq!(current.refresh_token(), Some("R1"));
    let sent = transport.last_request().expect("refresh request");
    assert_eq!(sent.form_value("grant_type"), Some("refresh_token"));
    assert_eq!(sent.form_value("refresh_token"), Some("R1"));
}

/// Validates that the authorization code strategy never acquires implicitly.
#[tokio::test]
async fn test_authorization_code_requires_exchange() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    let context = context(authorization_code(&transport, &clock), &clock);

    let err = context.get_valid_token().await.expect_err("not authorized");

    assert_eq!(err, AuthError::NotAuthorized);
    assert_eq!(transport.total_requests(), 0);
}

/// Validates that a pending nonce survives an unauthorized token request.
///
/// # Test Steps
/// 1. Issue an authorization URL
/// 2. Ask for a token before exchanging (fails with `NotAuthorized`)
/// 3. Verify the exchange with the issued state still succeeds
#[tokio::test]
async fn test_pending_state_survives_not_authorized() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "t", "refresh_token": "r"}));
    let context = context(authorization_code(&transport, &clock), &clock);

    let _ = context.authorization_url("xyz");
    assert!(context.get_valid_token().await.is_err());

    context.exchange_code("code", "xyz").await.expect("exchange");
    assert!(context.is_authenticated());
}

/// Validates that a revoked refresh token logs the user out.
///
/// # Test Steps
/// 1. Exchange a code, then expire the token
/// 2. Script the refresh to fail with `invalid_grant`
/// 3. Verify the record is gone and the flow is back to awaiting
///    authorization
#[tokio::test]
async fn test_revoked_refresh_token_resets_flow() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(
        TOKEN_URL,
        200,
        json!({"access_token": "t", "refresh_token": "r", "expires_in": 60}),
    );
    transport.push_json(TOKEN_URL, 400, json!({"error": "invalid_grant"}));
    let context = context(authorization_code(&transport, &clock), &clock);
    let _ = context.authorization_url("xyz");
    context.exchange_code("code", "xyz").await.expect("exchange");

    clock.advance(Duration::from_secs(61));
    let err = context.get_valid_token().await.expect_err("revoked");

    assert!(matches!(err, AuthError::InvalidGrant(_)));
    assert!(!context.is_authenticated());
    assert_eq!(context.authorization_state(), AuthorizationState::AwaitingAuthorization);
    assert_eq!(context.get_valid_token().await.expect_err("logged out"), AuthError::NotAuthorized);
}

/// Validates that a network failure surfaces as `Network` without a stale
/// fallback.
#[tokio::test]
async fn test_network_failure_surfaces() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 10}));
    transport.push_network_error(TOKEN_URL, "connection reset");
    let context = context(client_credentials(&transport, &clock), &clock);

    context.get_valid_token().await.expect("first token");
    clock.advance(Duration::from_secs(30));

    let err = context.get_valid_token().await.expect_err("network failure");
    assert!(matches!(err, AuthError::Network(_)));
    assert_eq!(context.current_record().expect("kept").access_token(), "tok1");
}
