//! Demo server front end: reads its settings from flags or `MYAPP_*`
//! environment variables and reports what it would listen on.

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;

/// Settings accepted by the demo.
#[derive(Debug, Parser)]
#[command(name = "listen_addr", about = "Reports the address it would listen on")]
struct Settings {
    /// Address to listen on.
    #[arg(long, default_value = ":8080")]
    listen_addr: String,
    /// Idle connection timeout in seconds. Read from `MYAPP_TIMEOUT`.
    #[arg(long, default_value_t = 30)]
    idle_timeout: u64,
    /// Log every request.
    #[arg(long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    envflag::set_prefix("myapp");
    envflag::rename_flag("idle-timeout", "timeout");
    let settings: Settings = envflag::parse_into();
    tracing::debug!(?settings, "settings resolved");
    report(&mut io::stdout().lock(), &settings)?;
    Ok(())
}

fn report(out: &mut impl Write, settings: &Settings) -> io::Result<()> {
    let timeout = Duration::from_secs(settings.idle_timeout);
    writeln!(out, "listening on {}", settings.listen_addr)?;
    writeln!(out, "idle timeout {timeout:?}")?;
    if settings.verbose {
        writeln!(out, "request logging enabled")?;
    }
    Ok(())
}
