//! Applying environment values to flags left at their defaults.

use std::collections::{BTreeSet, HashMap};
use std::process;

use tracing::{debug, trace, warn};

use crate::env::{EnvSource, LookupFn, ProcessEnv};
use crate::error::EnvFlagError;
use crate::flag_set::{ErrorHandling, FlagSet};
use crate::rewrite::rewrite;

/// Exit status used when [`ErrorHandling::ExitOnError`] terminates the
/// process.
pub const EXIT_USAGE: i32 = 2;

/// Prefix and renames that determine the environment key of each flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct KeyScheme {
    pub(crate) prefix: String,
    pub(crate) renames: HashMap<String, String>,
}

impl KeyScheme {
    pub(crate) fn rename(&mut self, original: impl Into<String>, substitute: impl Into<String>) {
        self.renames.insert(original.into(), substitute.into());
    }

    /// Name used in place of `flag` when computing its key.
    fn renamed<'n>(&'n self, flag: &'n str) -> &'n str {
        match self.renames.get(flag) {
            Some(substitute) if !substitute.is_empty() => substitute.as_str(),
            _ => flag,
        }
    }

    pub(crate) fn key(&self, flag: &str) -> String {
        rewrite(&self.prefix, self.renamed(flag))
    }
}

/// Connects a [`FlagSet`] to the environment.
///
/// A flag that was not given on the command line takes its value from the
/// environment variable named after it, when that variable is set. Flags
/// given on the command line are never touched.
///
/// # Examples
///
/// ```
/// use clap::{Arg, Command};
/// use envflag::{ClapFlagSet, ErrorHandling, VarSet};
///
/// let command = Command::new("myapp")
///     .arg(Arg::new("listen-addr").long("listen-addr").default_value(":8080"));
/// let mut flags = ClapFlagSet::new(command, ErrorHandling::ContinueOnError);
/// flags.parse(["myapp"])?;
///
/// let mut vars = VarSet::new(&mut flags);
/// vars.set_prefix("myapp");
/// vars.set_lookup_env(|key| (key == "MYAPP_LISTEN_ADDR").then(|| ":7070".to_owned()));
/// vars.apply()?;
///
/// let addr = flags.matches().get_one::<String>("listen-addr").cloned();
/// assert_eq!(addr.as_deref(), Some(":7070"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct VarSet<'a, F: FlagSet + ?Sized> {
    flags: &'a mut F,
    scheme: KeyScheme,
    lookup_env: Option<Box<dyn EnvSource>>,
}

impl<'a, F: FlagSet + ?Sized> VarSet<'a, F> {
    /// Wraps `flags`. Keys have no prefix and values come from the process
    /// environment until configured otherwise.
    #[must_use]
    pub fn new(flags: &'a mut F) -> Self {
        Self {
            flags,
            scheme: KeyScheme::default(),
            lookup_env: None,
        }
    }

    pub(crate) fn with_scheme(flags: &'a mut F, scheme: KeyScheme) -> Self {
        Self {
            flags,
            scheme,
            lookup_env: None,
        }
    }

    /// Sets a string to prepend to every environment key. An underscore is
    /// inserted between the prefix and the rest of the key.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.scheme.prefix = prefix.into();
    }

    /// Prefix given to [`VarSet::set_prefix`].
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.scheme.prefix
    }

    /// Derives the environment key of `original` from `substitute` instead.
    ///
    /// The substitute is rewritten like any other flag name. The flag keeps
    /// its name on the command line.
    pub fn rename_flag(&mut self, original: impl Into<String>, substitute: impl Into<String>) {
        self.scheme.rename(original, substitute);
    }

    /// Replaces the process environment with `lookup`.
    pub fn set_lookup_env<L>(&mut self, lookup: L)
    where
        L: Fn(&str) -> Option<String> + 'static,
    {
        self.set_env_source(LookupFn(lookup));
    }

    /// Replaces the process environment with `source`.
    pub fn set_env_source(&mut self, source: impl EnvSource + 'static) {
        self.lookup_env = Some(Box::new(source));
    }

    /// Environment key consulted for `flag`.
    #[must_use]
    pub fn env_key(&self, flag: &str) -> String {
        self.scheme.key(flag)
    }

    /// Every registered flag paired with its environment key, sorted by flag
    /// name.
    #[must_use]
    pub fn env_keys(&self) -> Vec<(String, String)> {
        let mut names = BTreeSet::new();
        self.flags.visit_all(&mut |name| {
            names.insert(name.to_owned());
        });
        names
            .into_iter()
            .map(|name| {
                let key = self.scheme.key(&name);
                (name, key)
            })
            .collect()
    }

    /// Sets flags that were not given on the command line from the
    /// environment.
    ///
    /// Applying again re-reads the environment for every flag not set on the
    /// command line, including flags set by an earlier call.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFlagError::InvalidValue`] when the registry rejects an
    /// environment value and its policy is
    /// [`ErrorHandling::ContinueOnError`].
    ///
    /// # Panics
    ///
    /// Panics on a rejected value when the registry's policy is
    /// [`ErrorHandling::PanicOnError`]. Under
    /// [`ErrorHandling::ExitOnError`] the process exits with [`EXIT_USAGE`]
    /// instead.
    #[expect(
        clippy::panic_in_result_fn,
        reason = "the registry's panic policy asks for a panic instead of an error"
    )]
    pub fn apply(&mut self) -> Result<(), EnvFlagError> {
        let mut candidates = BTreeSet::new();
        self.flags.visit_all(&mut |name| {
            candidates.insert(name.to_owned());
        });
        self.flags.visit(&mut |name| {
            candidates.remove(name);
        });

        for flag in candidates {
            if let Err(err) = self.apply_one(&flag) {
                match self.flags.error_handling() {
                    ErrorHandling::ContinueOnError => return Err(err),
                    ErrorHandling::ExitOnError => process::exit(EXIT_USAGE),
                    ErrorHandling::PanicOnError => panic!("{err}"),
                }
            }
        }
        Ok(())
    }

    fn apply_one(&mut self, flag: &str) -> Result<(), EnvFlagError> {
        let key = self.scheme.key(flag);
        trace!(flag, key = %key, "looking up environment override");
        let Some(value) = self.lookup_env(&key) else {
            return Ok(());
        };
        match self.flags.set(flag, &value) {
            Ok(()) => {
                debug!(flag, key = %key, "flag set from environment");
                Ok(())
            }
            Err(source) => Err(self.fail(EnvFlagError::invalid_value(flag, key, value, source))),
        }
    }

    fn lookup_env(&self, key: &str) -> Option<String> {
        match &self.lookup_env {
            Some(source) => source.lookup(key),
            None => ProcessEnv.lookup(key),
        }
    }

    /// Reports `err` and the usage text on the registry's output.
    fn fail(&mut self, err: EnvFlagError) -> EnvFlagError {
        if let Err(io_err) = writeln!(self.flags.output(), "{err}") {
            warn!(error = %io_err, "failed to write diagnostic");
        }
        self.flags.usage();
        err
    }
}

impl<F: FlagSet + ?Sized> std::fmt::Debug for VarSet<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarSet")
            .field("prefix", &self.scheme.prefix)
            .field("renames", &self.scheme.renames)
            .field("custom_lookup", &self.lookup_env.is_some())
            .finish_non_exhaustive()
    }
}
