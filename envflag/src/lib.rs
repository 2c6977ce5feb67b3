//! Fill command-line flags from environment variables.
//!
//! A value given on the command line always wins. A flag left at its default
//! takes the value of its environment variable when that variable is set,
//! even to the empty string. Otherwise the default stands.
//!
//! ```no_run
//! use clap::{Arg, Command};
//!
//! let command = Command::new("myapp")
//!     .arg(Arg::new("listen-addr").long("listen-addr").default_value(":8080"));
//! envflag::set_prefix("myapp");
//! let matches = envflag::parse(command);
//! println!("{:?}", matches.get_one::<String>("listen-addr"));
//! ```
//!
//! ```text
//! $ myapp
//! Some(":8080")
//! $ MYAPP_LISTEN_ADDR=:7070 myapp
//! Some(":7070")
//! $ MYAPP_LISTEN_ADDR=:7070 myapp --listen-addr=:9090
//! Some(":9090")
//! ```
//!
//! Flag names become environment keys as follows:
//!
//! - Non-ASCII characters are dropped.
//! - Uppercase letters, digits and underscores are preserved.
//! - Lowercase letters are changed to uppercase.
//! - Hyphens are changed to underscores.
//! - All other characters are dropped.
//! - An underscore is prepended when a key would otherwise begin with a
//!   digit.
//!
//! A prefix set with [`set_prefix`] or [`VarSet::set_prefix`] is rewritten by
//! the same rules and joined to the flag's key with an underscore.
//!
//! Any flag library can take part by implementing [`FlagSet`];
//! [`ClapFlagSet`] does so for `clap`.

mod clap_flags;
mod command_line;
mod env;
mod error;
mod flag_set;
mod rewrite;
mod var_set;

pub use clap_flags::{ClapFlagError, ClapFlagSet};
pub use command_line::{apply, env_key, parse, parse_into, rename_flag, set_prefix};
pub use env::{EnvSource, LookupFn, ProcessEnv};
pub use error::EnvFlagError;
pub use flag_set::{ErrorHandling, FlagSet};
pub use rewrite::rewrite;
pub use var_set::{EXIT_USAGE, VarSet};
