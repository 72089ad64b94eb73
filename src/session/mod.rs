//! Unlocked-vault session with an idle auto-lock.
//!
//! `VaultSession` is the only holder of decrypted secrets and of the
//! passphrase.  It is either `Locked` (nothing held) or `Unlocked`.
//! Unlocking, creating, and every mutation re-arm a single idle timer;
//! once it expires the session drops back to `Locked`.
//!
//! Expiry is checked on every call that can observe state, and `tick`
//! lets a host event loop deliver the timer as an ordinary event.  All
//! state-changing methods take `&mut self`, so one session has exactly
//! one writer at a time.

mod clock;

pub use clock::{Clock, IdleTimer, ManualClock, SystemClock};

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};
use crate::storage::KeyValueStore;
use crate::vault::{NewSecret, Secret, SecretPatch, VaultStore};

/// Inactivity period after which an unlocked session locks itself.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Observable lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

/// Present only while unlocked, so the passphrase and secrets cannot
/// outlive the unlocked state.
struct Unlocked {
    password: Zeroizing<String>,
    secrets: Vec<Secret>,
}

pub struct VaultSession<S, C = SystemClock> {
    store: VaultStore<S>,
    clock: C,
    timer: IdleTimer,
    unlocked: Option<Unlocked>,
}

impl<S: KeyValueStore> VaultSession<S, SystemClock> {
    pub fn new(store: VaultStore<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> VaultSession<S, C> {
    /// Start a locked session over `store` using `clock` for the idle timer.
    pub fn with_clock(store: VaultStore<S>, clock: C) -> Self {
        Self {
            store,
            clock,
            timer: IdleTimer::new(),
            unlocked: None,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn has_vault(&self) -> Result<bool> {
        self.store.exists()
    }

    /// Try to open the vault with `password`.
    ///
    /// Any failure (wrong passphrase, tampering, missing vault) is logged
    /// and reported as `false`; the session stays locked.
    pub fn unlock_vault(&mut self, password: &str) -> bool {
        match self.try_unlock(password) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "vault unlock failed");
                false
            }
        }
    }

    /// Like `unlock_vault`, but returns the underlying error.
    pub fn try_unlock(&mut self, password: &str) -> Result<()> {
        let secrets = self.store.load(password)?;
        let count = secrets.len();
        self.enter_unlocked(password, secrets);
        info!(secrets = count, "vault unlocked");
        Ok(())
    }

    /// Create an empty vault and enter the unlocked state.
    pub fn create_vault(&mut self, password: &str) -> Result<()> {
        self.store.create(&[], password)?;
        self.enter_unlocked(password, Vec::new());
        Ok(())
    }

    /// Drop the passphrase and secrets and disarm the timer.
    ///
    /// Locking a locked session does nothing.
    pub fn lock_vault(&mut self) {
        self.timer.disarm();
        if self.unlocked.take().is_some() {
            info!("vault locked");
        }
    }

    /// Erase the persisted vault and lock the session.
    pub fn delete_vault(&mut self) -> Result<()> {
        self.lock_vault();
        self.store.delete()
    }

    /// Re-encrypt under a new passphrase.  Requires an unlocked session;
    /// the cached passphrase is replaced on success.
    pub fn change_password(&mut self, new_password: &str) -> Result<usize> {
        self.expire_if_idle();
        let unlocked = self.unlocked.as_mut().ok_or(VaultError::Locked)?;
        let count = self.store.change_password(&unlocked.password, new_password)?;
        unlocked.password = Zeroizing::new(new_password.to_string());
        self.timer.arm(self.clock.now(), IDLE_TIMEOUT);
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Activity and the idle timer
    // ------------------------------------------------------------------

    /// Deliver the timer event: lock if the idle deadline has passed.
    ///
    /// Returns `true` if this call locked the session.
    pub fn tick(&mut self) -> bool {
        self.expire_if_idle()
    }

    /// Record user activity without changing anything.
    pub fn touch(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        self.timer.arm(self.clock.now(), IDLE_TIMEOUT);
        Ok(())
    }

    /// Time left before the idle lock, or `None` while locked.
    pub fn time_until_lock(&mut self) -> Option<Duration> {
        self.expire_if_idle();
        self.timer.remaining(self.clock.now())
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Add a secret and persist the whole vault.  Returns the new id.
    pub fn add_secret(&mut self, data: NewSecret) -> Result<Uuid> {
        self.ensure_unlocked()?;
        let secret = data.into_secret(Utc::now())?;
        let id = secret.id;
        self.mutate(|secrets| {
            secrets.push(secret);
            Ok(())
        })?;
        Ok(id)
    }

    /// Apply `patch` to the secret with `id` and persist.
    pub fn update_secret(&mut self, id: Uuid, patch: SecretPatch) -> Result<()> {
        self.mutate(|secrets| {
            let secret = secrets
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| VaultError::SecretNotFound(id.to_string()))?;
            secret.apply(patch, Utc::now())
        })
    }

    /// Remove the secret with `id` and persist.
    pub fn remove_secret(&mut self, id: Uuid) -> Result<()> {
        self.mutate(|secrets| {
            let before = secrets.len();
            secrets.retain(|s| s.id != id);
            if secrets.len() == before {
                return Err(VaultError::SecretNotFound(id.to_string()));
            }
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn state(&mut self) -> SessionState {
        self.expire_if_idle();
        if self.unlocked.is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub fn is_unlocked(&mut self) -> bool {
        self.state() == SessionState::Unlocked
    }

    /// All secrets in vault order; empty while locked.
    pub fn secrets(&mut self) -> &[Secret] {
        self.expire_if_idle();
        match self.unlocked {
            Some(ref unlocked) => &unlocked.secrets,
            None => &[],
        }
    }

    /// Secrets whose name, category or notes contain `query`.
    pub fn filtered_secrets(&mut self, query: &str) -> Vec<&Secret> {
        self.secrets().iter().filter(|s| s.matches(query)).collect()
    }

    pub fn secret(&mut self, id: Uuid) -> Option<&Secret> {
        self.secrets().iter().find(|s| s.id == id)
    }

    pub fn store(&self) -> &VaultStore<S> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn enter_unlocked(&mut self, password: &str, secrets: Vec<Secret>) {
        self.unlocked = Some(Unlocked {
            password: Zeroizing::new(password.to_string()),
            secrets,
        });
        self.timer.arm(self.clock.now(), IDLE_TIMEOUT);
    }

    fn ensure_unlocked(&mut self) -> Result<()> {
        self.expire_if_idle();
        if self.unlocked.is_none() {
            return Err(VaultError::Locked);
        }
        Ok(())
    }

    fn expire_if_idle(&mut self) -> bool {
        if self.unlocked.is_some() && self.timer.is_expired(self.clock.now()) {
            self.timer.disarm();
            self.unlocked = None;
            info!("vault locked after {}s idle", IDLE_TIMEOUT.as_secs());
            return true;
        }
        false
    }

    /// Run `change` on a copy of the secrets, persist the copy, and only
    /// then replace the in-memory list.
    fn mutate<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Secret>) -> Result<()>,
    {
        self.expire_if_idle();
        let unlocked = self.unlocked.as_mut().ok_or(VaultError::Locked)?;
        self.timer.arm(self.clock.now(), IDLE_TIMEOUT);

        let mut updated = unlocked.secrets.clone();
        change(&mut updated)?;
        self.store.save(&updated, &unlocked.password)?;
        unlocked.secrets = updated;
        Ok(())
    }
}
