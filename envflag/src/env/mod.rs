//! Sources consulted for environment values.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only lookup of environment values by key.
///
/// `Some("")` means the variable is present but empty, which differs from
/// `None`.
pub trait EnvSource {
    /// Returns the value stored under `key`, if any.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The real process environment.
///
/// Values that are not valid UTF-8 are converted lossily and left to the
/// flag's parser to accept or reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

/// Adapts a closure into an [`EnvSource`].
///
/// # Examples
///
/// ```
/// use envflag::{EnvSource, LookupFn};
///
/// let env = LookupFn(|key: &str| (key == "APP_PORT").then(|| "8080".to_owned()));
/// assert_eq!(env.lookup("APP_PORT").as_deref(), Some("8080"));
/// assert_eq!(env.lookup("APP_HOST"), None);
/// ```
#[derive(Clone, Copy)]
pub struct LookupFn<F>(pub F);

impl<F> EnvSource for LookupFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
