//! Token cache with single-flight refresh
//!
//! [`AuthContext`] owns zero or one [`TokenRecord`] for one strategy and hands
//! out bearer tokens, renewing them shortly before they expire.
//!
//! # Concurrency
//!
//! - The record slot sits behind a `parking_lot::Mutex` that is only held for
//!   short, synchronous sections and never across an `.await`.
//! - At most one acquire/refresh runs at a time. It is spawned as its own
//!   Tokio task and wrapped in a [`Shared`] future; concurrent callers clone
//!   and await the same future, so N callers cost one network call.
//! - The task writes its result into the slot itself. A caller that stops
//!   waiting (its future is dropped) does not cancel the refresh.
//! - Every external write ([`clear`](AuthContext::clear),
//!   [`store_record`](AuthContext::store_record)) bumps a generation counter;
//!   a task that finishes under an older generation leaves the slot alone.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use super::authorization_code::{AuthorizationCode, AuthorizationState};
use super::error::{AuthError, AuthResult};
use super::traits::CredentialStrategy;
use super::types::TokenRecord;
use crate::testing::time::{Clock, SystemClock};

/// Default safety window before expiry in which tokens are renewed
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

type Flight = Shared<BoxFuture<'static, AuthResult<Arc<TokenRecord>>>>;

/// Freshness of the cached token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token cached
    NotAuthenticated,
    /// Token usable and outside the refresh margin
    Valid,
    /// Token usable but inside the refresh margin
    Expiring,
    /// Token past its expiry
    Expired,
}

#[derive(Default)]
struct Slot {
    record: Option<Arc<TokenRecord>>,
    in_flight: Option<Flight>,
    generation: u64,
}

impl Slot {
    fn replace(&mut self, record: Option<Arc<TokenRecord>>) {
        self.record = record;
        self.in_flight = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Process-local holder of the current token for one credential strategy
///
/// Cloning is cheap and clones share the same cache.
///
/// Token operations spawn onto the ambient Tokio runtime and must be awaited
/// from within one. Blocking callers use
/// [`BlockingAuthContext`](super::BlockingAuthContext).
pub struct AuthContext<S: CredentialStrategy> {
    strategy: Arc<S>,
    clock: Arc<dyn Clock>,
    refresh_margin: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl<S: CredentialStrategy> Clone for AuthContext<S> {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            clock: Arc::clone(&self.clock),
            refresh_margin: self.refresh_margin,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<S: CredentialStrategy> fmt::Debug for AuthContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("AuthContext")
            .field("grant", &self.strategy.grant_kind())
            .field("refresh_margin", &self.refresh_margin)
            .field("has_record", &slot.record.is_some())
            .field("refreshing", &slot.in_flight.is_some())
            .finish()
    }
}

impl<S: CredentialStrategy> AuthContext<S> {
    /// Create an empty context using the system clock.
    pub fn new(strategy: S) -> Self {
        Self::with_clock(strategy, Arc::new(SystemClock))
    }

    /// Create an empty context using `clock` for expiry checks.
    pub fn with_clock(strategy: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            strategy: Arc::new(strategy),
            clock,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Set how long before expiry a token is renewed.
    #[must_use]
    pub const fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// The wrapped strategy
    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Configured refresh margin
    #[must_use]
    pub const fn refresh_margin(&self) -> Duration {
        self.refresh_margin
    }

    /// Return a bearer token that is valid for at least the refresh margin.
    ///
    /// - No record: the strategy acquires one.
    /// - Record outside the margin: returned without a network call.
    /// - Record inside the margin: the strategy refreshes it and the new
    ///   record replaces the old one.
    ///
    /// A failed refresh is returned as is; the stale token is never
    /// substituted. Terminal failures also discard the cached record.
    ///
    /// # Errors
    /// Whatever the strategy reports, e.g. [`AuthError::NotAuthorized`] before
    /// an authorization code has been exchanged.
    pub async fn get_valid_token(&self) -> AuthResult<String> {
        Ok(self.valid_record().await?.access_token().to_string())
    }

    /// Like [`get_valid_token`](Self::get_valid_token) but returns the whole
    /// record.
    ///
    /// # Errors
    /// See [`get_valid_token`](Self::get_valid_token).
    pub async fn valid_record(&self) -> AuthResult<Arc<TokenRecord>> {
        let flight = {
            let mut slot = self.slot.lock();
            if let Some(record) = &slot.record {
                if !record.should_refresh(self.clock.now(), self.refresh_margin) {
                    return Ok(Arc::clone(record));
                }
            }
            self.join_or_start(&mut slot)
        };
        flight.await
    }

    /// Renew the token regardless of its remaining lifetime.
    ///
    /// Joins a renewal that is already running instead of starting another.
    ///
    /// # Errors
    /// See [`get_valid_token`](Self::get_valid_token).
    pub async fn force_refresh(&self) -> AuthResult<String> {
        Ok(self.refreshed_record().await?.access_token().to_string())
    }

    /// Like [`force_refresh`](Self::force_refresh) but returns the whole
    /// record.
    ///
    /// # Errors
    /// See [`get_valid_token`](Self::get_valid_token).
    pub async fn refreshed_record(&self) -> AuthResult<Arc<TokenRecord>> {
        let flight = {
            let mut slot = self.slot.lock();
            self.join_or_start(&mut slot)
        };
        flight.await
    }

    /// Cached record, possibly stale, without any network call.
    #[must_use]
    pub fn current_record(&self) -> Option<Arc<TokenRecord>> {
        self.slot.lock().record.clone()
    }

    /// Whether a record is cached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.slot.lock().record.is_some()
    }

    /// Freshness of the cached record.
    #[must_use]
    pub fn status(&self) -> TokenStatus {
        let now = self.clock.now();
        match self.slot.lock().record.as_deref() {
            None => TokenStatus::NotAuthenticated,
            Some(record) if record.is_expired(now) => TokenStatus::Expired,
            Some(record) if record.should_refresh(now, self.refresh_margin) => {
                TokenStatus::Expiring
            }
            Some(_) => TokenStatus::Valid,
        }
    }

    /// Seed the cache with a previously obtained record.
    ///
    /// A renewal already in progress is detached and will not overwrite it.
    pub fn store_record(&self, record: TokenRecord) -> Arc<TokenRecord> {
        let record = Arc::new(record);
        self.slot.lock().replace(Some(Arc::clone(&record)));
        debug!(expires_in = record.expires_in(), "Token record stored");
        record
    }

    /// Discard the cached record and reset the strategy (logout).
    pub fn clear(&self) {
        self.slot.lock().replace(None);
        self.strategy.reset();
        info!("Token cleared");
    }

    /// Scopes granted to the cached token.
    #[must_use]
    pub fn granted_scopes(&self) -> BTreeSet<String> {
        self.current_record().map(|record| record.granted_scopes()).unwrap_or_default()
    }

    /// Whether the cached token was granted `scope`.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.current_record().is_some_and(|record| record.has_scope(scope))
    }

    /// Check that the cached token carries every scope in `required`.
    ///
    /// # Errors
    /// - [`AuthError::NotAuthorized`] if no token is cached
    /// - [`AuthError::MissingScopes`] listing the scopes not granted
    pub fn validate_scopes<I, T>(&self, required: I) -> AuthResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let record = self.current_record().ok_or(AuthError::NotAuthorized)?;
        let missing: Vec<String> = required
            .into_iter()
            .filter(|scope| !record.has_scope(scope.as_ref()))
            .map(|scope| scope.as_ref().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::MissingScopes(missing))
        }
    }

    fn join_or_start(&self, slot: &mut Slot) -> Flight {
        if let Some(flight) = &slot.in_flight {
            debug!("Joining in-flight token request");
            return flight.clone();
        }

        let current = slot.record.clone();
        let generation = slot.generation;
        let strategy = Arc::clone(&self.strategy);
        let shared_slot = Arc::clone(&self.slot);

        let task = tokio::spawn(async move {
            let result = match current.as_deref() {
                Some(record) => strategy.refresh(record).await,
                None => strategy.acquire().await,
            };

            let mut slot = shared_slot.lock();
            if slot.generation != generation {
                debug!("Discarding token result from a superseded request");
                return result.map(Arc::new);
            }
            slot.in_flight = None;
            match result {
                Ok(record) => {
                    let record = Arc::new(record);
                    slot.record = Some(Arc::clone(&record));
                    info!(
                        grant = strategy.grant_kind().as_str(),
                        expires_in = record.expires_in(),
                        "Token renewed"
                    );
                    Ok(record)
                }
                Err(error) => {
                    if error.is_terminal() && slot.record.is_some() {
                        slot.replace(None);
                        drop(slot);
                        strategy.reset();
                        warn!(error = %error, "Token discarded after terminal failure");
                    } else {
                        warn!(error = %error, "Token request failed");
                    }
                    Err(error)
                }
            }
        });

        let flight = async move {
            match task.await {
                Ok(result) => result,
                Err(join_error) => {
                    Err(AuthError::Internal(format!("token request task failed: {join_error}")))
                }
            }
        }
        .boxed()
        .shared();

        slot.in_flight = Some(flight.clone());
        flight
    }
}

impl AuthContext<AuthorizationCode> {
    /// Build the consent page URL; see [`AuthorizationCode::authorization_url`].
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> Url {
        self.strategy.authorization_url(state)
    }

    /// Authorization URL with a generated nonce; see
    /// [`AuthorizationCode::begin_authorization`].
    #[must_use]
    pub fn begin_authorization(&self) -> (Url, String) {
        self.strategy.begin_authorization()
    }

    /// Exchange an authorization code and cache the resulting record.
    ///
    /// # Errors
    /// See [`AuthorizationCode::exchange_code`].
    pub async fn exchange_code(
        &self,
        code: &str,
        returned_state: &str,
    ) -> AuthResult<Arc<TokenRecord>> {
        let record = self.strategy.exchange_code(code, returned_state).await?;
        Ok(self.store_record(record))
    }

    /// Current state of the authorization code flow
    #[must_use]
    pub fn authorization_state(&self) -> AuthorizationState {
        self.strategy.state()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::context.
    use serde_json::json;

    use super::*;
    use crate::auth::{ClientCredentials, OAuthConfig};
    use crate::testing::{MockClock, MockTransport};

    const TOKEN_URL: &str = "https://auth.test/oauth/token";

    fn client_credentials_context(
        transport: &MockTransport,
        clock: &MockClock,
    ) -> AuthContext<ClientCredentials> {
        let strategy = ClientCredentials::with_clock(
            OAuthConfig::new("c", "s").with_token_url(TOKEN_URL),
            Arc::new(transport.clone()),
            Arc::new(clock.clone()),
        )
        .unwrap();
        AuthContext::with_clock(strategy, Arc::new(clock.clone()))
            .with_refresh_margin(Duration::from_secs(5))
    }

    fn token(name: &str, expires_in: i64) -> serde_json::Value {
        json!({"access_token": name, "expires_in": expires_in})
    }

    /// Validates that a cached token is reused until the margin.
    ///
    /// Assertions:
    /// - Repeated calls make exactly one network call.
    #[tokio::test]
    async fn test_cached_token_reused() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        transport.push_json(TOKEN_URL, 200, token("tok1", 3600));
        let context = client_credentials_context(&transport, &clock);

        for _ in 0..5 {
            assert_eq!(context.get_valid_token().await.unwrap(), "tok1");
            clock.advance(Duration::from_secs(60));
        }

        assert_eq!(transport.request_count(TOKEN_URL), 1);
        assert_eq!(context.status(), TokenStatus::Valid);
    }

    /// Validates renewal inside the refresh margin.
    ///
    /// Assertions:
    /// - A token inside the margin, but not expired, is renewed.
    #[tokio::test]
    async fn test_refreshes_inside_margin() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        transport.push_json(TOKEN_URL, 200, token("tok1", 30));
        transport.push_json(TOKEN_URL, 200, token("tok2", 30));
        let context = client_credentials_context(&transport, &clock);

        assert_eq!(context.get_valid_token().await.unwrap(), "tok1");
        clock.advance(Duration::from_secs(26));
        assert_eq!(context.status(), TokenStatus::Expiring);

        assert_eq!(context.get_valid_token().await.unwrap(), "tok2");
        assert_eq!(transport.request_count(TOKEN_URL), 2);
    }

    /// Validates that a failed refresh is surfaced.
    ///
    /// Assertions:
    /// - A transient failure is returned and the stale record is kept.
    /// - The next call tries again.
    #[tokio::test]
    async fn test_transient_failure_keeps_record() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        transport.push_json(TOKEN_URL, 200, token("tok1", 10));
        transport.push_json(TOKEN_URL, 503, json!({"error": "temporarily_unavailable"}));
        transport.push_json(TOKEN_URL, 200, token("tok2", 10));
        let context = client_credentials_context(&transport, &clock);

        context.get_valid_token().await.unwrap();
        clock.advance(Duration::from_secs(11));

        let err = context.get_valid_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TemporarilyUnavailable(_)));
        assert_eq!(context.current_record().unwrap().access_token(), "tok1");

        assert_eq!(context.get_valid_token().await.unwrap(), "tok2");
    }

    #[tokio::test]
    async fn test_terminal_failure_clears_record() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        transport.push_json(TOKEN_URL, 200, token("tok1", 10));
        transport.push_json(TOKEN_URL, 401, json!({"error": "invalid_client"}));
        let context = client_credentials_context(&transport, &clock);

        context.get_valid_token().await.unwrap();
        clock.advance(Duration::from_secs(11));

        let err = context.get_valid_token().await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidClient(_)));
        assert!(!context.is_authenticated());
        assert_eq!(context.status(), TokenStatus::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_force_refresh_ignores_margin() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        transport.push_json(TOKEN_URL, 200, token("tok1", 3600));
        transport.push_json(TOKEN_URL, 200, token("tok2", 3600));
        let context = client_credentials_context(&transport, &clock);

        context.get_valid_token().await.unwrap();
        assert_eq!(context.force_refresh().await.unwrap(), "tok2");
        assert_eq!(context.get_valid_token().await.unwrap(), "tok2");
        assert_eq!(transport.request_count(TOKEN_URL), 2);
    }

    /// Validates `clear` while a request is in flight.
    ///
    /// Assertions:
    /// - The result of the superseded request is not cached.
    #[tokio::test]
    async fn test_clear_detaches_in_flight_request() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        transport.set_delay(Duration::from_millis(50));
        transport.push_json(TOKEN_URL, 200, token("tok1", 3600));
        let context = client_credentials_context(&transport, &clock);

        let waiter = {
            let context = context.clone();
            tokio::spawn(async move { context.get_valid_token().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        context.clear();

        assert_eq!(waiter.await.unwrap().unwrap(), "tok1");
        assert!(context.current_record().is_none());
    }

    #[test]
    fn test_store_record_and_scopes() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        let context = client_credentials_context(&transport, &clock);
        let record = TokenRecord::new("seeded", 3600, clock.now())
            .unwrap()
            .with_scope("customer.order.read customer.wallet.read");

        context.store_record(record);

        assert!(context.has_scope("customer.wallet.read"));
        assert_eq!(context.granted_scopes().len(), 2);
        assert!(context.validate_scopes(["customer.order.read"]).is_ok());
        assert_eq!(
            context.validate_scopes(["customer.order.read", "customer.chat.write"]),
            Err(AuthError::MissingScopes(vec!["customer.chat.write".into()]))
        );
    }

    #[test]
    fn test_validate_scopes_without_token() {
        let context = client_credentials_context(&MockTransport::new(), &MockClock::new());
        assert_eq!(context.validate_scopes(["a"]), Err(AuthError::NotAuthorized));
        assert_eq!(context.refresh_margin(), Duration::from_secs(5));
    }
}
