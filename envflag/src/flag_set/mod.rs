//! The contract a flag registry fulfils so a [`VarSet`](crate::VarSet) can
//! wrap it.
//!
//! The registry owns flag declaration, typed parsing and usage text. A
//! `VarSet` only needs to enumerate flags, learn which ones were given on the
//! command line, and hand strings to the registry's own setter.

use std::io;

/// How a registry reacts when a value fails validation.
///
/// The policy belongs to the registry; a [`VarSet`](crate::VarSet) reads it at
/// error time rather than keeping its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Terminate the process with exit status 2.
    ExitOnError,
    /// Panic with the error message.
    PanicOnError,
}

/// A registry of named, typed flags parsed from the command line.
pub trait FlagSet {
    /// Error reported when a value cannot be parsed or validated.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls `visit` with the name of every registered flag.
    fn visit_all(&self, visit: &mut dyn FnMut(&str));

    /// Calls `visit` with the name of every flag set on the command line.
    fn visit(&self, visit: &mut dyn FnMut(&str));

    /// Sets the flag called `name` from its string form.
    ///
    /// # Errors
    ///
    /// Returns the registry's error when `value` is rejected by the flag's
    /// parser or when no flag called `name` exists.
    fn set(&mut self, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Policy applied when a value is rejected.
    fn error_handling(&self) -> ErrorHandling;

    /// Stream receiving diagnostics.
    fn output(&mut self) -> &mut dyn io::Write;

    /// Writes usage text to [`FlagSet::output`].
    fn usage(&mut self);
}

impl<F: FlagSet + ?Sized> FlagSet for &mut F {
    type Error = F::Error;

    fn visit_all(&self, visit: &mut dyn FnMut(&str)) {
        (**self).visit_all(visit);
    }

    fn visit(&self, visit: &mut dyn FnMut(&str)) {
        (**self).visit(visit);
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(name, value)
    }

    fn error_handling(&self) -> ErrorHandling {
        (**self).error_handling()
    }

    fn output(&mut self) -> &mut dyn io::Write {
        (**self).output()
    }

    fn usage(&mut self) {
        (**self).usage();
    }
}
