//! Provider pool: handle cache and custodial session ownership.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};

use crate::auth::CustodialAuth;
use crate::error::{WalletError, WalletResult};
use crate::observability::metrics;
use crate::providers::handle::{ReadOnlyHandle, SigningHandle};
use crate::providers::session::{SessionState, WalletSession};
use crate::registry::NetworkRegistry;

/// Owns every RPC handle and the custodial session.
///
/// Read-only handles are built lazily per chain and cached until the
/// session ends or the chain list changes, then dropped wholesale.
/// There is at most one signing handle, bound to the home chain and
/// the authenticated account.
pub struct ProviderPool {
    registry: ArcSwap<NetworkRegistry>,
    read_handles: DashMap<u64, ReadOnlyHandle>,
    signing: RwLock<Option<SigningHandle>>,
    auth: Arc<dyn CustodialAuth>,
    session: ArcSwap<WalletSession>,
    /// Serializes login/logout so concurrent signed operations cannot
    /// interleave re-authentication.
    auth_lock: Mutex<()>,
    rpc_timeout: Duration,
}

impl ProviderPool {
    pub fn new(
        registry: NetworkRegistry,
        auth: Arc<dyn CustodialAuth>,
        rpc_timeout: Duration,
    ) -> Self {
        let home_chain_id = registry.default_chain_id();
        Self {
            registry: ArcSwap::from_pointee(registry),
            read_handles: DashMap::new(),
            signing: RwLock::new(None),
            auth,
            session: ArcSwap::from_pointee(WalletSession::unauthenticated(home_chain_id)),
            auth_lock: Mutex::new(()),
            rpc_timeout,
        }
    }

    /// Current network table snapshot.
    pub fn registry(&self) -> Arc<NetworkRegistry> {
        self.registry.load_full()
    }

    pub fn home_chain_id(&self) -> u64 {
        self.registry.load().default_chain_id()
    }

    /// Read-consistent session snapshot. Callers take one per
    /// operation and never re-read mid-flight.
    pub fn session(&self) -> Arc<WalletSession> {
        self.session.load_full()
    }

    /// Lazy per-chain read-only handle. A malformed endpoint fails
    /// only this chain; other networks keep their handles.
    pub fn read_only(&self, chain_id: u64) -> WalletResult<ReadOnlyHandle> {
        if let Some(handle) = self.read_handles.get(&chain_id) {
            return Ok(handle.clone());
        }

        let registry = self.registry.load();
        let network = registry.get(chain_id)?;

        let handle = match ReadOnlyHandle::connect(network, self.rpc_timeout) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(chain_id, error = %e, "Failed to build read-only handle");
                return Err(e);
            }
        };

        self.read_handles.insert(chain_id, handle.clone());
        metrics::record_provider_handles(self.read_handles.len());
        tracing::debug!(chain_id, "Read-only handle created");
        Ok(handle)
    }

    /// The signing handle, or `Unauthenticated` when no session is
    /// live. Does not authenticate; callers run
    /// [`ensure_authenticated`](Self::ensure_authenticated) first.
    pub async fn signing(&self) -> WalletResult<SigningHandle> {
        self.signing.read().await.clone().ok_or_else(|| {
            WalletError::Unauthenticated("no signing session; authenticate first".to_string())
        })
    }

    /// Pre-flight for every signed operation.
    ///
    /// Reuses the live session when the collaborator still considers
    /// it logged in and it is bound to `identity_hint`. A stale or
    /// mismatched session is logged out before the single
    /// re-authentication attempt; there are no retry loops. On failure
    /// the session is left `Unauthenticated`.
    pub async fn ensure_authenticated(
        &self,
        identity_hint: &str,
    ) -> WalletResult<Arc<WalletSession>> {
        let _guard = self.auth_lock.lock().await;

        let home_chain_id = self.home_chain_id();
        let current = self.session.load_full();

        if current.is_authenticated() {
            if self.auth.is_logged_in().await && current.bound_to(identity_hint) {
                return Ok(current);
            }

            tracing::info!(
                bound = current.identity.as_deref().unwrap_or(""),
                requested = identity_hint,
                "Stale or mismatched custodial session, re-authenticating"
            );
            self.auth.logout().await;
            *self.signing.write().await = None;
            self.session
                .store(Arc::new(WalletSession::unauthenticated(home_chain_id)));
            metrics::record_login("refreshed");
        }

        self.session.store(Arc::new(WalletSession {
            state: SessionState::Authenticating,
            account: None,
            identity: Some(identity_hint.to_string()),
            home_chain_id,
        }));

        match self.auth.login(identity_hint).await {
            Ok(custodial) => {
                let registry = self.registry.load();
                // The home chain is always active; config validation
                // guarantees it.
                let network = registry.get(home_chain_id)?;
                let handle = SigningHandle::connect(
                    network,
                    custodial.wallet.clone(),
                    custodial.account,
                    self.rpc_timeout,
                )?;

                *self.signing.write().await = Some(handle);
                let session = Arc::new(WalletSession {
                    state: SessionState::Authenticated,
                    account: Some(custodial.account),
                    identity: Some(custodial.identity),
                    home_chain_id,
                });
                self.session.store(session.clone());
                metrics::record_login("ok");
                tracing::info!(account = %custodial.account, "Custodial session established");
                Ok(session)
            }
            Err(e) => {
                *self.signing.write().await = None;
                self.session
                    .store(Arc::new(WalletSession::unauthenticated(home_chain_id)));
                metrics::record_login("failed");
                tracing::warn!(error = %e, "Custodial login failed");
                let reason = match e {
                    WalletError::Unauthenticated(msg) => msg,
                    other => other.to_string(),
                };
                Err(WalletError::Unauthenticated(reason))
            }
        }
    }

    /// End the session and drop every cached handle.
    pub async fn logout(&self) {
        let _guard = self.auth_lock.lock().await;

        self.auth.logout().await;
        *self.signing.write().await = None;
        let home_chain_id = self.home_chain_id();
        self.session
            .store(Arc::new(WalletSession::unauthenticated(home_chain_id)));

        self.read_handles.clear();
        metrics::record_provider_handles(0);
        tracing::info!("Session ended, provider handles dropped");
    }

    /// Swap in a new network table (config reload). All cached handles
    /// are torn down; the session ends because the signing handle may
    /// point at a replaced endpoint.
    pub async fn reset(&self, registry: NetworkRegistry) {
        let _guard = self.auth_lock.lock().await;

        let home_chain_id = registry.default_chain_id();
        self.registry.store(Arc::new(registry));

        self.auth.logout().await;
        *self.signing.write().await = None;
        self.session
            .store(Arc::new(WalletSession::unauthenticated(home_chain_id)));

        self.read_handles.clear();
        metrics::record_provider_handles(0);
        tracing::info!(home_chain_id, "Provider pool reset for new network table");
    }

    /// Number of cached read-only handles (diagnostics).
    pub fn cached_handles(&self) -> usize {
        self.read_handles.len()
    }
}

impl std::fmt::Debug for ProviderPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderPool")
            .field("cached_handles", &self.read_handles.len())
            .field("home_chain_id", &self.home_chain_id())
            .finish()
    }
}
