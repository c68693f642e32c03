//! Command line front-end of statefill.

pub mod cmd;

use tracing::Level;
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. Logs go to stderr so fixtures can be piped from
/// stdout. `RUST_LOG` overrides `level`.
pub fn init_tracing(level: Level) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::builder()
        .with_default_directive(Directive::from(level))
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .try_init()
}
