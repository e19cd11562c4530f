//! Blocking facade over [`AuthContext`]
//!
//! Drives the same async core on a small runtime owned by the facade, so
//! synchronous callers get identical caching and single-flight behaviour.
//! Do not call these methods from inside an async runtime; use
//! [`AuthContext`] there.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use url::Url;

use super::authorization_code::{AuthorizationCode, AuthorizationState};
use super::context::{AuthContext, TokenStatus};
use super::error::{AuthError, AuthResult};
use super::traits::CredentialStrategy;
use super::types::TokenRecord;

/// Blocking counterpart of [`AuthContext`]
///
/// Safe to share between threads; concurrent callers still trigger a single
/// token request.
pub struct BlockingAuthContext<S: CredentialStrategy> {
    inner: AuthContext<S>,
    runtime: Arc<Runtime>,
}

impl<S: CredentialStrategy> Clone for BlockingAuthContext<S> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), runtime: Arc::clone(&self.runtime) }
    }
}

impl<S: CredentialStrategy> fmt::Debug for BlockingAuthContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingAuthContext").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl<S: CredentialStrategy> BlockingAuthContext<S> {
    /// Wrap an async context, starting a dedicated single-worker runtime.
    ///
    /// # Errors
    /// Returns [`AuthError::Internal`] if the runtime cannot be started.
    pub fn new(inner: AuthContext<S>) -> AuthResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("basalam-auth")
            .enable_all()
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to start auth runtime: {e}")))?;
        Ok(Self::with_runtime(inner, Arc::new(runtime)))
    }

    /// Wrap an async context using an existing runtime.
    #[must_use]
    pub const fn with_runtime(inner: AuthContext<S>, runtime: Arc<Runtime>) -> Self {
        Self { inner, runtime }
    }

    /// The async context this facade drives
    #[must_use]
    pub const fn as_async(&self) -> &AuthContext<S> {
        &self.inner
    }

    /// Blocking [`AuthContext::get_valid_token`].
    ///
    /// # Errors
    /// See [`AuthContext::get_valid_token`].
    pub fn get_valid_token(&self) -> AuthResult<String> {
        self.block_on(self.inner.get_valid_token())
    }

    /// Blocking [`AuthContext::force_refresh`].
    ///
    /// # Errors
    /// See [`AuthContext::force_refresh`].
    pub fn force_refresh(&self) -> AuthResult<String> {
        self.block_on(self.inner.force_refresh())
    }

    /// See [`AuthContext::current_record`].
    #[must_use]
    pub fn current_record(&self) -> Option<Arc<TokenRecord>> {
        self.inner.current_record()
    }

    /// See [`AuthContext::is_authenticated`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated()
    }

    /// See [`AuthContext::status`].
    #[must_use]
    pub fn status(&self) -> TokenStatus {
        self.inner.status()
    }

    /// See [`AuthContext::store_record`].
    pub fn store_record(&self, record: TokenRecord) -> Arc<TokenRecord> {
        self.inner.store_record(record)
    }

    /// See [`AuthContext::clear`].
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// See [`AuthContext::granted_scopes`].
    #[must_use]
    pub fn granted_scopes(&self) -> BTreeSet<String> {
        self.inner.granted_scopes()
    }

    /// See [`AuthContext::has_scope`].
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.inner.has_scope(scope)
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl BlockingAuthContext<AuthorizationCode> {
    /// See [`AuthContext::authorization_url`].
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> Url {
        self.inner.authorization_url(state)
    }

    /// See [`AuthContext::begin_authorization`].
    #[must_use]
    pub fn begin_authorization(&self) -> (Url, String) {
        self.inner.begin_authorization()
    }

    /// Blocking [`AuthContext::exchange_code`].
    ///
    /// # Errors
    /// See [`AuthorizationCode::exchange_code`].
    pub fn exchange_code(&self, code: &str, returned_state: &str) -> AuthResult<Arc<TokenRecord>> {
        self.block_on(self.inner.exchange_code(code, returned_state))
    }

    /// See [`AuthContext::authorization_state`].
    #[must_use]
    pub fn authorization_state(&self) -> AuthorizationState {
        self.inner.authorization_state()
    }
}
