//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at process start
//! - Render the startup banner shown to operators
//!
//! # Design Decisions
//! - `RUST_LOG` always wins; `--debug` only changes the fallback directives
//! - Logs go to stderr, the banner to stdout

use std::fmt::Write as _;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "libre_webui=debug,tower_http=debug,info"
    } else {
        "libre_webui=info,tower_http=info,warn"
    }
}

/// Install the global subscriber.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Startup banner with the effective settings.
pub fn banner(config: &ServerConfig) -> String {
    let mut out = String::new();
    out.push_str(
        "
      +-+-+-+-+-+-+-+-+ +-+-+-+-+-+
      |L|I|B|R|E|S|B|C| |W|E|B|U|I|
      +-+-+-+-+-+-+-+-+ +-+-+-+-+-+
",
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "      LibreSBC WebUI - v{}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out);
    let _ = writeln!(out, "      Listen    {}", config.listen_address());
    let _ = writeln!(out, "      LibreSBC  {}", config.upstream);
    let _ = writeln!(out, "      Debug     {}", config.debug);
    let _ = writeln!(out);
    let _ = writeln!(out, "      Access via browser at: {}", config.access_url());
    let _ = writeln!(out, "    --------------------------------------------------");
    out
}
