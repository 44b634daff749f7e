//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "libre-webui")]
#[command(version, about = "LibreSBC web UI server and API proxy", long_about = None)]
pub struct Cli {
    /// HTTP API binding IP address
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP API binding port
    #[arg(short = 'P', long, default_value_t = 8088)]
    pub port: u16,

    /// LibreSBC web API interface
    #[arg(short = 'L', long, default_value = "http://127.0.0.1:8088")]
    pub libresbc: String,

    /// Sets log level to debug
    #[arg(short, long)]
    pub debug: bool,

    /// FQDN - fully qualified domain name
    #[arg(short = 'D', long, default_value = "")]
    pub domain: String,

    /// Enable https server instead of default: http
    #[arg(short, long)]
    pub tls: bool,

    /// SSL/TLS certificate/key files, syntax <crt:key>
    #[arg(short, long, default_value = "")]
    pub certs: String,

    /// Directory holding the web UI bundle
    #[arg(short, long, default_value = "webui")]
    pub webroot: PathBuf,

    /// Additional path prefix forwarded to LibreSBC (repeatable)
    #[arg(long = "proxy-prefix", value_name = "PREFIX")]
    pub proxy_prefixes: Vec<String>,

    /// CA bundle for the LibreSBC certificate; enables strict verification
    #[arg(long, value_name = "FILE")]
    pub upstream_ca: Option<PathBuf>,
}
