//! Serialised environment mutation for tests.
//!
//! Every mutation holds a global re-entrant mutex and returns an RAII guard
//! that restores the variable's prior value (or removes it) when dropped.
//! [`EnvScope`] keeps the lock for its whole lifetime, which is what tests
//! reading the process environment through a loader need: no other test can
//! change the environment between setting variables and reading them.
//!
//! # Examples
//!
//! ```
//! use stratum_config_test_helpers::env;
//!
//! let _scope = env::prefixed("DOC_APP_", &[("server_port", "80")]);
//! assert_eq!(std::env::var("DOC_APP_server_port").as_deref(), Ok("80"));
//! ```

use std::{
    env,
    ffi::{OsStr, OsString},
    fmt,
    sync::LazyLock,
};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Wrapper around `std::env::set_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// Wrapper around `std::env::remove_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env_set_var(&self.key, &value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env_remove_var(&self.key) },
        }
    }
}

/// Holds the global environment lock.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Set `key` to `value`.
    pub fn set_var<V: AsRef<OsStr>>(&self, key: impl Into<String>, value: V) -> EnvVarGuard {
        let key_string = key.into();
        let original = env::var_os(&key_string);
        // SAFETY: `self` holds `ENV_MUTEX`.
        unsafe { env_set_var(&key_string, value.as_ref()) };
        EnvVarGuard {
            key: key_string,
            original,
        }
    }

    /// Remove `key`.
    pub fn remove_var(&self, key: impl Into<String>) -> EnvVarGuard {
        let key_string = key.into();
        let original = env::var_os(&key_string);
        // SAFETY: `self` holds `ENV_MUTEX`.
        unsafe { env_remove_var(&key_string) };
        EnvVarGuard {
            key: key_string,
            original,
        }
    }

    /// Remove every variable whose name starts with `prefix`.
    #[must_use = "dropping the guards restores the variables"]
    pub fn clear_prefix(&self, prefix: &str) -> Vec<EnvVarGuard> {
        let names: Vec<String> = env::vars_os()
            .filter_map(|(name, _)| name.into_string().ok())
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.into_iter().map(|name| self.remove_var(name)).collect()
    }
}

/// Acquire the global environment lock.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _guard: ENV_MUTEX.lock(),
    }
}

/// Set `key` to `value` until the guard drops.
///
/// ```
/// use stratum_config_test_helpers::env;
///
/// let guard = env::set_var("DOC_SET_VAR", "on");
/// assert_eq!(std::env::var("DOC_SET_VAR").as_deref(), Ok("on"));
/// drop(guard);
/// assert!(std::env::var("DOC_SET_VAR").is_err());
/// ```
pub fn set_var<V: AsRef<OsStr>>(key: impl Into<String>, value: V) -> EnvVarGuard {
    lock().set_var(key, value)
}

/// Remove `key` until the guard drops.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    lock().remove_var(key)
}

/// Keeps the environment lock and a set of guards alive together.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: EnvVarLock,
}

impl EnvScope {
    /// Run `builder` under the lock and keep the guards it returns.
    pub fn new_with<F>(builder: F) -> Self
    where
        F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
    {
        let held = lock();
        let guards = builder(&held);
        Self {
            guards,
            _lock: held,
        }
    }

    /// Number of variables the scope will restore.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the scope restores nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Replace every variable starting with `prefix` by `vars`, each named
/// `prefix` followed by its key.
///
/// The returned scope holds the environment lock, so the environment stays
/// exactly as set until it drops.
pub fn prefixed(prefix: &str, vars: &[(&str, &str)]) -> EnvScope {
    EnvScope::new_with(|lock| {
        let mut guards = lock.clear_prefix(prefix);
        guards.extend(
            vars.iter()
                .map(|(key, value)| lock.set_var(format!("{prefix}{key}"), value)),
        );
        guards
    })
}
