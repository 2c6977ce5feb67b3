//! [`FlagSet`] backed by a `clap` [`Command`].
//!
//! Every top-level argument with a long name that stores a value
//! ([`ArgAction::Set`], [`ArgAction::Append`]) or toggles a switch
//! ([`ArgAction::SetTrue`], [`ArgAction::SetFalse`]) is a flag, named by its
//! long name. Setting a flag injects `--name=value` ahead of the original
//! arguments and parses the command again, so each value goes through the
//! argument's own `value_parser`.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;
use tracing::warn;

use crate::flag_set::{ErrorHandling, FlagSet};

/// Errors reported by [`ClapFlagSet::set`](FlagSet::set).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClapFlagError {
    /// No settable flag has this long name.
    #[error("unknown flag `{0}`")]
    UnknownFlag(String),
    /// A switch was given something other than a boolean.
    #[error("invalid boolean value {0:?}")]
    InvalidBool(String),
    /// `clap` rejected the value.
    #[error("{}", summarise(.0))]
    Rejected(#[source] clap::Error),
}

/// First line of a `clap` error without its `error: ` prefix.
fn summarise(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_owned()
}

/// Parses the boolean spellings accepted by switches.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn is_settable(arg: &Arg) -> bool {
    arg.get_long().is_some()
        && matches!(
            arg.get_action(),
            ArgAction::Set | ArgAction::Append | ArgAction::SetTrue | ArgAction::SetFalse
        )
}

/// Command-line tokens equivalent to giving `flag` the value `value`.
///
/// A switch given a true value is passed as `--flag`. A false value leaves
/// the switch at its default.
fn tokens_for(arg: &Arg, flag: &str, value: &str) -> Result<Vec<OsString>, ClapFlagError> {
    if !matches!(arg.get_action(), ArgAction::SetTrue | ArgAction::SetFalse) {
        return Ok(vec![OsString::from(format!("--{flag}={value}"))]);
    }
    match parse_bool(value) {
        Some(true) => Ok(vec![OsString::from(format!("--{flag}"))]),
        Some(false) => Ok(Vec::new()),
        None => Err(ClapFlagError::InvalidBool(value.to_owned())),
    }
}

/// A `clap` [`Command`] together with the matches of its latest parse.
///
/// # Examples
///
/// ```
/// use clap::{Arg, Command, value_parser};
/// use envflag::{ClapFlagSet, ErrorHandling, FlagSet};
///
/// let command = Command::new("server").arg(
///     Arg::new("port")
///         .long("port")
///         .value_parser(value_parser!(u16))
///         .default_value("80"),
/// );
/// let mut flags = ClapFlagSet::new(command, ErrorHandling::ContinueOnError);
/// flags.parse(["server"])?;
/// flags.set("port", "8080")?;
/// assert_eq!(flags.matches().get_one::<u16>("port"), Some(&8080));
/// assert!(flags.set("port", "eighty").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ClapFlagSet {
    command: Command,
    args: Vec<OsString>,
    injected: Vec<(String, Vec<OsString>)>,
    explicit: BTreeSet<String>,
    matches: ArgMatches,
    error_handling: ErrorHandling,
    output: Box<dyn Write + Send>,
}

impl ClapFlagSet {
    /// Wraps `command`. Diagnostics go to standard error.
    #[must_use]
    pub fn new(mut command: Command, error_handling: ErrorHandling) -> Self {
        command.build();
        Self {
            command,
            args: Vec::new(),
            injected: Vec::new(),
            explicit: BTreeSet::new(),
            matches: ArgMatches::default(),
            error_handling,
            output: Box::new(io::stderr()),
        }
    }

    /// Sends diagnostics and usage text to `output`.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Parses `args`, binary name first, discarding any earlier environment
    /// values.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error when parsing fails and the policy is
    /// [`ErrorHandling::ContinueOnError`].
    ///
    /// # Panics
    ///
    /// Panics on a parse error under [`ErrorHandling::PanicOnError`]. Under
    /// [`ErrorHandling::ExitOnError`] `clap` prints the error and exits.
    #[expect(
        clippy::panic_in_result_fn,
        reason = "the panic policy asks for a panic instead of an error"
    )]
    pub fn parse<I, T>(&mut self, args: I) -> Result<(), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self.injected.clear();
        match self.reparse() {
            Ok(matches) => {
                self.explicit = self
                    .flags()
                    .filter(|arg| {
                        matches.value_source(arg.get_id().as_str()) == Some(ValueSource::CommandLine)
                    })
                    .filter_map(Arg::get_long)
                    .map(str::to_owned)
                    .collect();
                self.matches = matches;
                Ok(())
            }
            Err(err) => match self.error_handling {
                ErrorHandling::ContinueOnError => Err(err),
                ErrorHandling::ExitOnError => err.exit(),
                ErrorHandling::PanicOnError => panic!("{err}"),
            },
        }
    }

    /// Matches of the latest successful parse, environment values included.
    #[must_use]
    pub const fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Consumes the set, returning the final matches.
    #[must_use]
    pub fn into_matches(self) -> ArgMatches {
        self.matches
    }

    /// The wrapped command.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    fn flags(&self) -> impl Iterator<Item = &Arg> + '_ {
        self.command.get_arguments().filter(|arg| is_settable(arg))
    }

    fn flag(&self, name: &str) -> Option<&Arg> {
        self.flags().find(|arg| arg.get_long() == Some(name))
    }

    fn reparse(&mut self) -> Result<ArgMatches, clap::Error> {
        let injected = self
            .injected
            .iter()
            .flat_map(|(_, tokens)| tokens.iter().cloned());
        let mut argv = Vec::with_capacity(self.args.len() + self.injected.len() + 1);
        let mut rest = self.args.iter().cloned();
        if !self.command.is_no_binary_name_set() {
            argv.push(
                rest.next()
                    .unwrap_or_else(|| OsString::from(self.command.get_name())),
            );
        }
        argv.extend(injected);
        argv.extend(rest);
        self.command.try_get_matches_from_mut(argv)
    }

    /// Records `tokens` for `flag`, returning the tokens they replace.
    fn inject(&mut self, flag: &str, tokens: Vec<OsString>) -> Option<Vec<OsString>> {
        if let Some((_, existing)) = self.injected.iter_mut().find(|(name, _)| name == flag) {
            return Some(std::mem::replace(existing, tokens));
        }
        self.injected.push((flag.to_owned(), tokens));
        None
    }

    fn restore(&mut self, flag: &str, previous: Option<Vec<OsString>>) {
        match previous {
            Some(tokens) => {
                if let Some((_, existing)) =
                    self.injected.iter_mut().find(|(name, _)| name == flag)
                {
                    *existing = tokens;
                }
            }
            None => self.injected.retain(|(name, _)| name != flag),
        }
    }
}

impl FlagSet for ClapFlagSet {
    type Error = ClapFlagError;

    fn visit_all(&self, visit: &mut dyn FnMut(&str)) {
        for name in self.flags().filter_map(Arg::get_long) {
            visit(name);
        }
    }

    fn visit(&self, visit: &mut dyn FnMut(&str)) {
        for name in &self.explicit {
            visit(name.as_str());
        }
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ClapFlagError> {
        let arg = self
            .flag(name)
            .ok_or_else(|| ClapFlagError::UnknownFlag(name.to_owned()))?;
        let tokens = tokens_for(arg, name, value)?;
        let previous = self.inject(name, tokens);
        match self.reparse() {
            Ok(matches) => {
                self.matches = matches;
                Ok(())
            }
            Err(err) => {
                self.restore(name, previous);
                Err(ClapFlagError::Rejected(err))
            }
        }
    }

    fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    fn output(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    fn usage(&mut self) {
        let usage = self.command.render_usage();
        if let Err(err) = writeln!(self.output, "{usage}") {
            warn!(error = %err, "failed to write usage");
        }
    }
}

impl fmt::Debug for ClapFlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClapFlagSet")
            .field("command", &self.command.get_name())
            .field("args", &self.args)
            .field("injected", &self.injected)
            .field("explicit", &self.explicit)
            .field("error_handling", &self.error_handling)
            .finish_non_exhaustive()
    }
}
