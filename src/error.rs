//! Error types shared by the codec, the query driver and the command line.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while building, sending or decoding a DNS message.
///
/// Every variant is terminal for the current query: nothing inside the crate
/// retries, and a parse either yields a complete [`DnsMessage`] or one of these.
///
/// [`DnsMessage`]: crate::dns::DnsMessage
#[derive(Debug, Error)]
pub enum DnsError {
    /// The caller supplied data the encoder cannot represent on the wire,
    /// such as a label longer than 63 octets.
    #[error("format error: {0}")]
    Format(String),

    /// The received buffer is malformed: a length runs past the end of the
    /// message, a compression pointer is out of range or does not terminate.
    #[error("corrupt message: {0}")]
    CorruptMessage(String),

    /// No response arrived within the configured window.
    #[error("no response received within {0:?}")]
    Timeout(Duration),

    /// Socket-level failure other than a timeout.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The query target could not be settled before the query was sent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DnsError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        DnsError::Format(msg.into())
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        DnsError::CorruptMessage(msg.into())
    }
}

/// Command-line input that passed argument parsing but cannot form a query.
///
/// Most variants come from [`Args::into_config`]; `UnresolvableAddress` is
/// raised once the query target is looked up.
///
/// [`Args::into_config`]: crate::cli::Args::into_config
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid server '{0}': expected an IPv4/IPv6 address or a hostname")]
    InvalidServer(String),

    #[error("invalid address '{0}': expected an IPv4/IPv6 address or a hostname")]
    InvalidAddress(String),

    #[error(
        "'-x' and '-6' are incompatible: the former requires query type PTR, the latter AAAA"
    )]
    ReverseWithIpv6,

    #[error("reverse lookup requires an IP address, got hostname '{0}'")]
    ReverseOfHostname(String),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("couldn't resolve address '{0}', make sure it exists and is reachable")]
    UnresolvableAddress(String),
}
