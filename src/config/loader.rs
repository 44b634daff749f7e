//! Configuration loading from command-line flags.

use crate::cli::Cli;
use crate::config::schema::{ProxyTransportPolicy, ServerConfig};
use crate::config::validation::{parse_upstream, validate_tls, ConfigError};
use crate::routing::RouteTable;

/// Validate flags and freeze them into a [`ServerConfig`].
pub fn load_config(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let tls = if cli.tls {
        Some(validate_tls(&cli.domain, &cli.certs)?)
    } else {
        None
    };

    let upstream = parse_upstream(&cli.libresbc)?;
    let routes = RouteTable::new(&cli.proxy_prefixes)?;

    let transport = match &cli.upstream_ca {
        Some(ca) => ProxyTransportPolicy::strict(Some(ca.clone())),
        None => ProxyTransportPolicy::default(),
    };

    Ok(ServerConfig {
        host: cli.host.clone(),
        port: cli.port,
        upstream,
        tls,
        debug: cli.debug,
        routes,
        asset_root: cli.webroot.clone(),
        transport,
    })
}
