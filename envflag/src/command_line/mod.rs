//! The process-wide default instance.
//!
//! Programs with a single top-level command can configure the prefix and
//! renames once, through module-level functions, and apply them with
//! [`parse`] or [`parse_into`]. A command-line error exits the way `clap`
//! does. An invalid environment value prints a diagnostic and the usage line,
//! then exits with status 2.

use std::sync::LazyLock;

use clap::{ArgMatches, Command, Parser};
use parking_lot::Mutex;

use crate::clap_flags::ClapFlagSet;
use crate::error::EnvFlagError;
use crate::flag_set::{ErrorHandling, FlagSet};
use crate::var_set::{EXIT_USAGE, KeyScheme, VarSet};

static COMMAND_LINE: LazyLock<Mutex<KeyScheme>> = LazyLock::new(Mutex::default);

/// Sets the prefix used by the default instance.
///
/// See [`VarSet::set_prefix`].
pub fn set_prefix(prefix: impl Into<String>) {
    COMMAND_LINE.lock().prefix = prefix.into();
}

/// Renames a flag for the default instance.
///
/// See [`VarSet::rename_flag`].
pub fn rename_flag(original: impl Into<String>, substitute: impl Into<String>) {
    COMMAND_LINE.lock().rename(original, substitute);
}

/// Environment key the default instance consults for `flag`.
#[must_use]
pub fn env_key(flag: &str) -> String {
    COMMAND_LINE.lock().key(flag)
}

/// Applies the default instance's prefix and renames to `flags`, reading the
/// process environment.
///
/// # Errors
///
/// Returns [`EnvFlagError::InvalidValue`] when `flags` rejects an environment
/// value under [`ErrorHandling::ContinueOnError`].
///
/// # Panics
///
/// Panics on a rejected value when `flags` uses
/// [`ErrorHandling::PanicOnError`].
pub fn apply<F: FlagSet + ?Sized>(flags: &mut F) -> Result<(), EnvFlagError> {
    let scheme = COMMAND_LINE.lock().clone();
    VarSet::with_scheme(flags, scheme).apply()
}

/// Parses the process arguments with `command`, then fills unset flags from
/// the environment.
///
/// Parse errors and invalid environment values terminate the process. The
/// registry continues on error so that both exits happen here, after the
/// diagnostic and usage have been written to standard error.
///
/// ```no_run
/// use clap::{Arg, Command};
///
/// let command = Command::new("myapp")
///     .arg(Arg::new("listen-addr").long("listen-addr").default_value(":8080"));
/// envflag::set_prefix("myapp");
/// let matches = envflag::parse(command);
/// let addr = matches.get_one::<String>("listen-addr");
/// # let _ = addr;
/// ```
#[must_use]
pub fn parse(command: Command) -> ArgMatches {
    let mut flags = ClapFlagSet::new(command, ErrorHandling::ContinueOnError);
    if let Err(err) = flags.parse(std::env::args_os()) {
        err.exit();
    }
    if let Err(err) = apply(&mut flags) {
        tracing::debug!(
            flag = err.flag(),
            key = err.key(),
            "exiting on invalid environment value"
        );
        std::process::exit(EXIT_USAGE);
    }
    flags.into_matches()
}

/// Like [`parse`], then builds `P` from the final matches.
///
/// Conversion errors are reported by `clap` and terminate the process.
#[must_use]
pub fn parse_into<P: Parser>() -> P {
    let matches = parse(P::command());
    P::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}
