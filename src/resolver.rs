//! DNS query driver.
//!
//! Runs one query from start to finish: derives the query name from the
//! configuration, builds the message, sends it once over a [`Transport`],
//! waits once for the reply and parses it. A forward lookup of an IP literal
//! is preceded by one PTR exchange that maps the address to its host name.
//! There is no retry and no TCP fallback; a timeout ends the query.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use dns_query::cli::QueryConfig;
//! use dns_query::dns::RecordType;
//! use dns_query::resolver::{resolve, UdpTransport};
//!
//! let config = QueryConfig {
//!     recursion_desired: true,
//!     reverse: false,
//!     query_type: RecordType::A,
//!     server: "8.8.8.8".to_string(),
//!     port: 53,
//!     address: "example.com".to_string(),
//!     timeout: Duration::from_secs(10),
//! };
//!
//! let mut transport = UdpTransport::connect(&config.server, config.port)?;
//! let response = resolve(&config, &mut transport)?;
//! println!("{} answers", response.answers.len());
//! # Ok::<(), dns_query::error::DnsError>(())
//! ```

use std::net::{IpAddr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cli::{ensure_resolvable, QueryConfig};
use crate::dns::{build_query, DnsMessage, RecordClass, RecordType, ResponseCode};
use crate::error::{ConfigError, DnsError};
use crate::reverse::reverse_name;

/// Largest datagram a UDP response can fill.
pub const MAX_UDP_MESSAGE: usize = 65535;

/// The datagram exchange the driver needs from the network.
pub trait Transport {
    /// Sends one datagram.
    fn send(&mut self, message: &[u8]) -> Result<(), DnsError>;

    /// Waits up to `timeout` for one datagram of at most `max_len` octets.
    ///
    /// Expiry surfaces as [`DnsError::Timeout`].
    fn receive(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>, DnsError>;
}

/// A [`Transport`] over a connected UDP socket.
pub struct UdpTransport {
    socket: UdpSocket,
    server_addr: SocketAddr,
}

impl UdpTransport {
    /// Resolves `server` (literal address or hostname) and connects a socket
    /// of the matching family to it.
    pub fn connect(server: &str, port: u16) -> Result<Self, DnsError> {
        let server_addr = match server.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, port),
            Err(_) => (server, port).to_socket_addrs()?.next().ok_or_else(|| {
                DnsError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("could not resolve server '{}'", server),
                ))
            })?,
        };

        // Bind an ephemeral port of the server's address family.
        let bind_addr: SocketAddr = if server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(server_addr)?;

        debug!(server = %server_addr, local = ?socket.local_addr().ok(), "UDP socket ready");
        Ok(UdpTransport {
            socket,
            server_addr,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, message: &[u8]) -> Result<(), DnsError> {
        let bytes_sent = self.socket.send(message)?;
        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");
        Ok(())
    }

    fn receive(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>, DnsError> {
        self.socket.set_read_timeout(Some(timeout))?;

        let mut buffer = vec![0u8; max_len];
        let size = self.socket.recv(&mut buffer).map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut
            {
                DnsError::Timeout(timeout)
            } else {
                DnsError::Io(e)
            }
        })?;
        buffer.truncate(size);

        debug!(server = %self.server_addr, bytes_received = size, "UDP response received");
        Ok(buffer)
    }
}

/// The name and type actually put in the question for `config`.
///
/// A reverse lookup asks for the PTR record of the address's `in-addr.arpa`
/// or `ip6.arpa` name. A forward lookup of an IP literal first maps the
/// address to its host name with a PTR exchange over `transport`. A hostname
/// is queried as given once the system resolver has confirmed it exists.
///
/// # Errors
///
/// - [`DnsError::Format`] if a reverse lookup is asked for a hostname
/// - [`DnsError::Config`] carrying [`ConfigError::UnresolvableAddress`] if the
///   target has no host name or does not resolve
/// - any transport or parse error of the PTR exchange
pub fn query_target<T: Transport>(
    config: &QueryConfig,
    transport: &mut T,
) -> Result<(String, RecordType), DnsError> {
    if config.reverse {
        let addr = config.address.parse::<IpAddr>().map_err(|_| {
            DnsError::format(format!(
                "reverse lookup needs an IP address, got '{}'",
                config.address
            ))
        })?;
        return Ok((reverse_name(addr), RecordType::PTR));
    }

    match config.address.parse::<IpAddr>() {
        Ok(addr) => {
            let host = lookup_host_name(addr, config, transport)?;
            Ok((host, config.query_type))
        }
        Err(_) => {
            ensure_resolvable(&config.address)?;
            Ok((config.address.clone(), config.query_type))
        }
    }
}

/// Maps `addr` to its host name by asking the configured server for its PTR record.
fn lookup_host_name<T: Transport>(
    addr: IpAddr,
    config: &QueryConfig,
    transport: &mut T,
) -> Result<String, DnsError> {
    let reverse_domain = reverse_name(addr);
    debug!(ip = %addr, reverse_domain = %reverse_domain, "performing PTR lookup");

    let response = exchange(&reverse_domain, RecordType::PTR, config, transport)?;
    let host = response
        .answers
        .iter()
        .filter(|record| record.rtype == RecordType::PTR)
        .find_map(|record| record.get_name_data())
        .filter(|name| !name.is_empty());

    match host {
        Some(host) => {
            debug!(ip = %addr, hostname = %host, "PTR lookup successful");
            Ok(host.to_string())
        }
        None => {
            debug!(ip = %addr, "PTR lookup returned no records");
            Err(ConfigError::UnresolvableAddress(addr.to_string()).into())
        }
    }
}

/// Performs one query as described by `config` over `transport`.
///
/// # Errors
///
/// - [`DnsError::Format`] if the query name cannot be encoded
/// - [`DnsError::Config`] if the forward target cannot be resolved
/// - [`DnsError::Timeout`] if no response arrives within `config.timeout`
/// - [`DnsError::Io`] for other transport failures
/// - [`DnsError::CorruptMessage`] if the response cannot be parsed
///
/// A response carrying an error code is still returned; the code is logged.
pub fn resolve<T: Transport>(
    config: &QueryConfig,
    transport: &mut T,
) -> Result<DnsMessage, DnsError> {
    let (name, qtype) = query_target(config, transport)?;
    exchange(&name, qtype, config, transport)
}

/// Sends one query for `name` and parses the single reply.
fn exchange<T: Transport>(
    name: &str,
    qtype: RecordType,
    config: &QueryConfig,
    transport: &mut T,
) -> Result<DnsMessage, DnsError> {
    let query = build_query(name, qtype, RecordClass::IN, config.recursion_desired)?;
    let query_id = u16::from_be_bytes([query[0], query[1]]);

    info!(name = %name, qtype = %qtype, id = query_id, "sending query");
    transport.send(&query)?;

    let response_buffer = transport.receive(MAX_UDP_MESSAGE, config.timeout)?;
    let response = DnsMessage::from_bytes(&response_buffer)?;

    if response.header.id != query_id {
        warn!(expected = query_id, got = response.header.id, "response id does not match query");
    }
    if !response.header.is_response() {
        warn!("received message is not flagged as a response");
    }
    let rcode = response.header.get_response_code();
    if rcode != ResponseCode::NoError {
        warn!(rcode = ?rcode, "server returned an error code");
    }

    Ok(response)
}
