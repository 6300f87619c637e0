//! Command-line surface.
//!
//! `dns [-r] [-x] [-6] -s server [-p port] address`

use std::net::{IpAddr, ToSocketAddrs};
use std::time::Duration;

use clap::Parser;

use crate::dns::RecordType;
use crate::error::ConfigError;

#[derive(Parser, Debug, Clone)]
#[command(name = "dns")]
#[command(about = "Send a single DNS query over UDP and print the response", long_about = None)]
pub struct Args {
    /// Recursion desired
    #[arg(short = 'r')]
    pub recursion: bool,

    /// Make a reverse (PTR) query for the address instead of a direct one
    #[arg(short = 'x')]
    pub reverse: bool,

    /// Ask for AAAA records instead of A
    #[arg(short = '6')]
    pub ipv6: bool,

    /// IP address or hostname of the server to query
    #[arg(short = 's', value_name = "SERVER")]
    pub server: String,

    /// Server port
    #[arg(short = 'p', value_name = "PORT", default_value_t = 53)]
    pub port: u16,

    /// Seconds to wait for the response
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Hostname or address the query is about
    pub address: String,
}

/// Validated parameters of one query. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub recursion_desired: bool,
    pub reverse: bool,
    /// A, AAAA or PTR.
    pub query_type: RecordType,
    pub server: String,
    pub port: u16,
    pub address: String,
    pub timeout: Duration,
}

impl Args {
    /// Checks the arguments against each other and builds the query configuration.
    pub fn into_config(self) -> Result<QueryConfig, ConfigError> {
        if !is_ip_address(&self.server) && !is_hostname(&self.server) {
            return Err(ConfigError::InvalidServer(self.server));
        }
        if !is_ip_address(&self.address) && !is_hostname(&self.address) {
            return Err(ConfigError::InvalidAddress(self.address));
        }
        if self.reverse && self.ipv6 {
            return Err(ConfigError::ReverseWithIpv6);
        }
        if self.reverse && !is_ip_address(&self.address) {
            return Err(ConfigError::ReverseOfHostname(self.address));
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let query_type = if self.reverse {
            RecordType::PTR
        } else if self.ipv6 {
            RecordType::AAAA
        } else {
            RecordType::A
        };

        Ok(QueryConfig {
            recursion_desired: self.recursion,
            reverse: self.reverse,
            query_type,
            server: self.server,
            port: self.port,
            address: self.address,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

/// Returns `true` if `text` is an IPv4 or IPv6 address literal.
///
/// # Examples
///
/// ```rust
/// use dns_query::cli::is_ip_address;
///
/// assert!(is_ip_address("147.229.9.26"));
/// assert!(is_ip_address("2001:67c:1220:809::93e5:917"));
/// assert!(!is_ip_address("www.fit.vut.cz"));
/// ```
pub fn is_ip_address(text: &str) -> bool {
    text.parse::<IpAddr>().is_ok()
}

/// Letters, digits and hyphens in dot-separated labels; no label may be
/// empty or start or end with a hyphen.
pub fn is_hostname(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

/// Checks that the system resolver knows `hostname`.
///
/// Only existence is checked; the query itself still goes to the configured
/// server.
///
/// # Errors
///
/// Returns [`ConfigError::UnresolvableAddress`] if the lookup fails or yields
/// no address.
pub fn ensure_resolvable(hostname: &str) -> Result<(), ConfigError> {
    match (hostname, 0).to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(_) => Ok(()),
            None => Err(ConfigError::UnresolvableAddress(hostname.to_string())),
        },
        Err(_) => Err(ConfigError::UnresolvableAddress(hostname.to_string())),
    }
}
