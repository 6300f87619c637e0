//! DNS protocol types and the message codec.
//!
//! This module holds everything that touches the DNS wire format apart from
//! name encoding (see [`crate::name`]): the record type and class tables, the
//! 12-byte header with its bitfield, the question entry, resource records and
//! the message that ties them together.
//!
//! The implementation follows RFC 1035 section 4 (Messages). All multi-byte
//! fields are in network byte order (big-endian).
//!
//! # Core Types
//!
//! - [`RecordType`] / [`RecordClass`] - numeric codes and their text forms
//! - [`DnsHeader`] - the 12-byte message header
//! - [`DnsQuestion`] - one entry of the question section
//! - [`ResourceRecord`] / [`RData`] - one decoded answer, authority or additional record
//! - [`DnsMessage`] - a full parsed response
//!
//! # Examples
//!
//! Building a query and reading it back:
//!
//! ```rust
//! use dns_query::dns::{build_query_with_id, DnsMessage, RecordClass, RecordType};
//!
//! let query = build_query_with_id(0x1234, "example.com", RecordType::A, RecordClass::IN, true).unwrap();
//! let message = DnsMessage::from_bytes(&query).unwrap();
//!
//! assert_eq!(message.header.id, 0x1234);
//! assert!(message.header.recursion_desired());
//! assert_eq!(message.questions[0].name, "example.com");
//! ```

use core::fmt;
use std::{
    io::{Cursor, Read},
    net::{Ipv4Addr, Ipv6Addr},
};

use tracing::debug;

use crate::error::DnsError;
use crate::ipv6::render_ipv6;
use crate::name::{pack_domain_name, unpack_domain_name};

/// Size of the fixed message header.
pub const HEADER_LEN: usize = 12;

/// Size of the type, class, TTL and data length fields that follow a record name.
pub const RECORD_DESCRIPTOR_LEN: usize = 10;

const FLAG_QR: u16 = 1 << 15;
const OPCODE_MASK: u16 = 0x7800;
const OPCODE_SHIFT: u16 = 11;
const FLAG_AA: u16 = 1 << 10;
const FLAG_TC: u16 = 1 << 9;
const FLAG_RD: u16 = 1 << 8;
const FLAG_RA: u16 = 1 << 7;
const Z_MASK: u16 = 0x0070;
const Z_SHIFT: u16 = 4;
const RCODE_MASK: u16 = 0x000F;

/// The type of a DNS record or query (RFC 1035 section 3.2.2, RFC 3596).
///
/// Codes outside the table survive a round trip through [`RecordType::Unknown`]
/// and display as `UNKNOWN`.
///
/// # Examples
///
/// ```rust
/// use dns_query::dns::RecordType;
///
/// assert_eq!(RecordType::from(28), RecordType::AAAA);
/// assert_eq!(RecordType::PTR.code(), 12);
/// assert_eq!(RecordType::from(99).to_string(), "UNKNOWN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 host address.
    A,
    /// Authoritative name server.
    NS,
    /// Canonical name for an alias.
    CNAME,
    /// Start of a zone of authority.
    SOA,
    /// Domain name pointer, used by reverse lookups.
    PTR,
    /// Mail exchange.
    MX,
    /// IPv6 host address.
    AAAA,
    /// Any code not listed above.
    Unknown(u16),
}

impl RecordType {
    /// Returns the 16-bit code written in the TYPE field on the wire.
    pub fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::AAAA => 28,
            RecordType::Unknown(code) => code,
        }
    }

    /// Whether the record data of this type is read as a domain name.
    ///
    /// SOA and MX payloads are not a bare name; only their leading octets are
    /// read as one.
    pub fn carries_name(self) -> bool {
        matches!(
            self,
            RecordType::NS | RecordType::CNAME | RecordType::SOA | RecordType::PTR | RecordType::MX
        )
    }
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            12 => RecordType::PTR,
            15 => RecordType::MX,
            28 => RecordType::AAAA,
            other => RecordType::Unknown(other),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::MX => "MX",
            RecordType::AAAA => "AAAA",
            RecordType::Unknown(_) => "UNKNOWN",
        };
        f.write_str(text)
    }
}

/// The class of a DNS record or query (RFC 1035 section 3.2.4, RFC 2136).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordClass {
    Reserved,
    /// The Internet.
    IN,
    /// Chaos.
    CH,
    /// Hesiod.
    HS,
    None,
    Any,
    Unknown(u16),
}

impl RecordClass {
    /// Returns the 16-bit code written in the CLASS field on the wire.
    pub fn code(self) -> u16 {
        match self {
            RecordClass::Reserved => 0,
            RecordClass::IN => 1,
            RecordClass::CH => 3,
            RecordClass::HS => 4,
            RecordClass::None => 254,
            RecordClass::Any => 255,
            RecordClass::Unknown(code) => code,
        }
    }
}

impl From<u16> for RecordClass {
    fn from(code: u16) -> Self {
        match code {
            0 => RecordClass::Reserved,
            1 => RecordClass::IN,
            3 => RecordClass::CH,
            4 => RecordClass::HS,
            254 => RecordClass::None,
            255 => RecordClass::Any,
            other => RecordClass::Unknown(other),
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RecordClass::Reserved => "RESERVED",
            RecordClass::IN => "IN",
            RecordClass::CH => "CH",
            RecordClass::HS => "HS",
            RecordClass::None => "NONE",
            RecordClass::Any => "ANY",
            RecordClass::Unknown(_) => "UNKNOWN",
        };
        f.write_str(text)
    }
}

/// The 4-bit response code (RCODE) carried in the low bits of the header flags.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResponseCode {
    /// No error condition.
    NoError,
    /// The server could not interpret the query.
    FormatError,
    /// The server failed to process the query.
    ServerFailure,
    /// The queried name does not exist (NXDOMAIN).
    NameError,
    /// The server does not support this kind of query.
    NotImplemented,
    /// The server refuses to answer for policy reasons.
    Refused,
    /// Codes 6 to 15.
    Other(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

/// The 12-byte header of a DNS message (RFC 1035 section 4.1.1).
///
/// The second 16-bit word packs the QR, Opcode, AA, TC, RD, RA, Z and RCODE
/// fields; the accessor methods pull them apart.
///
/// ```text
///   0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15
/// |QR|  Opcode   |AA|TC|RD|RA|   Z    |   RCODE   |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DnsHeader {
    /// Identifier copied by the server into its response.
    pub id: u16,
    /// Raw flag word; see the accessors.
    pub flags: u16,
    /// Number of entries in the question section.
    pub question_count: u16,
    /// Number of resource records in the answer section.
    pub answer_count: u16,
    /// Number of name server records in the authority section.
    pub authority_count: u16,
    /// Number of resource records in the additional section.
    pub additional_count: u16,
}

impl DnsHeader {
    /// Creates a header with every field set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the header of a standard query carrying a single question.
    ///
    /// QR, Opcode and all response-only bits are zero; only RD is set on
    /// request.
    pub fn query(id: u16, recursion_desired: bool) -> Self {
        DnsHeader {
            id,
            flags: if recursion_desired { FLAG_RD } else { 0 },
            question_count: 1,
            ..Self::default()
        }
    }

    /// Serializes the header and appends its 12 bytes to `buffer`.
    pub fn pack(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.id.to_be_bytes());
        buffer.extend_from_slice(&self.flags.to_be_bytes());
        buffer.extend_from_slice(&self.question_count.to_be_bytes());
        buffer.extend_from_slice(&self.answer_count.to_be_bytes());
        buffer.extend_from_slice(&self.authority_count.to_be_bytes());
        buffer.extend_from_slice(&self.additional_count.to_be_bytes());
    }

    /// Deserializes a header from the cursor, advancing it by 12 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::CorruptMessage`] if fewer than 12 bytes remain.
    pub fn from_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let id = read_u16(cursor, "header id")?;
        let flags = read_u16(cursor, "header flags")?;
        let question_count = read_u16(cursor, "question count")?;
        let answer_count = read_u16(cursor, "answer count")?;
        let authority_count = read_u16(cursor, "authority count")?;
        let additional_count = read_u16(cursor, "additional count")?;

        Ok(DnsHeader {
            id,
            flags,
            question_count,
            answer_count,
            authority_count,
            additional_count,
        })
    }

    /// Returns `true` when the QR bit marks the message as a response.
    pub fn is_response(&self) -> bool {
        self.flags & FLAG_QR != 0
    }

    /// Returns the 4-bit Opcode; 0 is a standard query.
    pub fn opcode(&self) -> u8 {
        ((self.flags & OPCODE_MASK) >> OPCODE_SHIFT) as u8
    }

    /// Returns `true` when the responding server is an authority for the
    /// queried name (AA bit).
    pub fn authoritative(&self) -> bool {
        self.flags & FLAG_AA != 0
    }

    /// Returns `true` when the message was cut to fit the transport (TC bit).
    pub fn truncated(&self) -> bool {
        self.flags & FLAG_TC != 0
    }

    /// Returns `true` when the RD bit asks the server to recurse.
    pub fn recursion_desired(&self) -> bool {
        self.flags & FLAG_RD != 0
    }

    /// Returns `true` when the server reports that it supports recursion (RA bit).
    pub fn recursion_available(&self) -> bool {
        self.flags & FLAG_RA != 0
    }

    /// The three reserved/extension bits (Z, and AD/CD in later RFCs).
    pub fn z(&self) -> u8 {
        ((self.flags & Z_MASK) >> Z_SHIFT) as u8
    }

    /// Extracts the response code from the low four bits of the flags.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dns_query::dns::{DnsHeader, ResponseCode};
    ///
    /// let header = DnsHeader { flags: 0x8183, ..DnsHeader::new() };
    /// assert_eq!(header.get_response_code(), ResponseCode::NameError);
    /// ```
    pub fn get_response_code(&self) -> ResponseCode {
        ResponseCode::from((self.flags & RCODE_MASK) as u8)
    }
}

/// One entry of the question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: String,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl DnsQuestion {
    /// Serializes the question (name, type, class) and appends it to `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Format`] if the name cannot be encoded.
    pub fn pack(&self, buffer: &mut Vec<u8>) -> Result<(), DnsError> {
        pack_domain_name(buffer, &self.name)?;
        buffer.extend_from_slice(&self.qtype.code().to_be_bytes());
        buffer.extend_from_slice(&self.qclass.code().to_be_bytes());
        Ok(())
    }

    pub fn from_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let name = unpack_domain_name(cursor)?;
        let qtype = RecordType::from(read_u16(cursor, "question type")?);
        let qclass = RecordClass::from(read_u16(cursor, "question class")?);

        Ok(DnsQuestion {
            name,
            qtype,
            qclass,
        })
    }
}

/// Decoded record data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    /// Four octets of an A record.
    A(Ipv4Addr),
    /// Sixteen octets of an AAAA record.
    AAAA(Ipv6Addr),
    /// A domain name resolved from the payload of a name-carrying type.
    Name(String),
    /// Payload kept as received: unrecognized types, or A/AAAA data of the
    /// wrong length.
    Opaque(Vec<u8>),
}

impl fmt::Display for RData {
    /// Formats the data the way the report prints it: dotted-decimal for A,
    /// shortened colon-hex for AAAA, the bare name, or the RFC 3597 generic
    /// form `\# <length> <hex>` for opaque data.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::AAAA(addr) => f.write_str(&render_ipv6(&addr.octets())),
            RData::Name(name) if name.is_empty() => f.write_str("."),
            RData::Name(name) => f.write_str(name),
            RData::Opaque(data) => {
                write!(f, "\\# {}", data.len())?;
                if !data.is_empty() {
                    f.write_str(" ")?;
                    for octet in data {
                        write!(f, "{:02x}", octet)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// A resource record from the answer, authority or additional section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: RecordType,
    pub rclass: RecordClass,
    pub ttl: u32,
    pub data: RData,
}

/// Octet-level view of a record before its payload is interpreted.
struct RawRecord<'a> {
    name: String,
    rtype: RecordType,
    rclass: RecordClass,
    ttl: u32,
    payload_start: usize,
    payload: &'a [u8],
}

impl<'a> RawRecord<'a> {
    fn from_bytes(cursor: &mut Cursor<&'a [u8]>) -> Result<Self, DnsError> {
        let name = unpack_domain_name(cursor)?;
        let rtype = RecordType::from(read_u16(cursor, "record type")?);
        let rclass = RecordClass::from(read_u16(cursor, "record class")?);
        let ttl = read_u32(cursor, "record TTL")?;
        let data_len = read_u16(cursor, "record data length")? as usize;

        let message: &'a [u8] = *cursor.get_ref();
        let payload_start = cursor.position() as usize;
        let payload = message
            .get(payload_start..payload_start + data_len)
            .ok_or_else(|| {
                DnsError::corrupt(format!(
                    "{} record data of {} octets at offset {} runs past the end of the message",
                    rtype, data_len, payload_start
                ))
            })?;

        Ok(RawRecord {
            name,
            rtype,
            rclass,
            ttl,
            payload_start,
            payload,
        })
    }
}

impl ResourceRecord {
    /// Parses one record at the cursor and leaves the cursor on the next one.
    ///
    /// A and AAAA data is copied verbatim. For name-carrying types the payload
    /// is resolved as a (possibly compressed) name and the cursor resumes after
    /// whichever is longer: the name's own octets or the declared data length.
    /// Any other type keeps its payload opaque.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::CorruptMessage`] if the descriptor or payload runs
    /// past the end of the message, or a name inside it is malformed.
    pub fn from_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let raw = RawRecord::from_bytes(cursor)?;
        let data_len = raw.payload.len();
        let mut resume_at = raw.payload_start + data_len;

        let data = match raw.rtype {
            RecordType::A => match <[u8; 4]>::try_from(raw.payload) {
                Ok(octets) => RData::A(Ipv4Addr::from(octets)),
                Err(_) => RData::Opaque(raw.payload.to_vec()),
            },
            RecordType::AAAA => match <[u8; 16]>::try_from(raw.payload) {
                Ok(octets) => RData::AAAA(Ipv6Addr::from(octets)),
                Err(_) => RData::Opaque(raw.payload.to_vec()),
            },
            rtype if rtype.carries_name() => {
                cursor.set_position(raw.payload_start as u64);
                let name = unpack_domain_name(cursor)?;
                resume_at = resume_at.max(cursor.position() as usize);
                RData::Name(name)
            }
            _ => RData::Opaque(raw.payload.to_vec()),
        };

        cursor.set_position(resume_at as u64);

        Ok(ResourceRecord {
            name: raw.name,
            rtype: raw.rtype,
            rclass: raw.rclass,
            ttl: raw.ttl,
            data,
        })
    }

    pub fn get_ipv4_address(&self) -> Option<Ipv4Addr> {
        match &self.data {
            RData::A(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn get_ipv6_address(&self) -> Option<Ipv6Addr> {
        match &self.data {
            RData::AAAA(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn get_name_data(&self) -> Option<&str> {
        match &self.data {
            RData::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}., {}, {}, {}, {}",
            self.name, self.rtype, self.rclass, self.ttl, self.data
        )
    }
}

/// A DNS message: the header followed by its four sections.
///
/// Records are owned by the message; nothing borrows from the buffer it was
/// parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// Serializes the header and question section into `buffer`.
    ///
    /// Resource records are never packed since only queries are sent.
    pub fn pack(&self, buffer: &mut Vec<u8>) -> Result<(), DnsError> {
        self.header.pack(buffer);
        for question in &self.questions {
            question.pack(buffer)?;
        }
        Ok(())
    }

    /// Parses a complete message.
    ///
    /// The header counts say exactly how many entries each section holds. A
    /// message that ends before they are all read is corrupt, and so is one
    /// with octets left over after the last counted record.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::CorruptMessage`] for any truncated field, out of
    /// range length, offending compression pointer, or a disagreement between
    /// the header counts and the records present.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DnsError> {
        let mut cursor = Cursor::new(bytes);
        let header = DnsHeader::from_bytes(&mut cursor)?;

        debug!(
            id = header.id,
            questions = header.question_count,
            answers = header.answer_count,
            authorities = header.authority_count,
            additionals = header.additional_count,
            "parsing DNS message"
        );

        let mut questions = Vec::with_capacity(capacity_for(header.question_count, bytes));
        for _ in 0..header.question_count {
            questions.push(DnsQuestion::from_bytes(&mut cursor)?);
        }

        let answers = read_section(&mut cursor, header.answer_count, bytes)?;
        let authorities = read_section(&mut cursor, header.authority_count, bytes)?;
        let additionals = read_section(&mut cursor, header.additional_count, bytes)?;

        let consumed = cursor.position() as usize;
        if consumed < bytes.len() {
            return Err(DnsError::corrupt(format!(
                "{} octets follow the last record the header counts",
                bytes.len() - consumed
            )));
        }

        Ok(DnsMessage {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

/// Builds a standard query with a process-derived transaction id.
///
/// The id only has to tell this process's query apart from stray datagrams,
/// so the low 16 bits of the process id are enough.
pub fn build_query(
    name: &str,
    qtype: RecordType,
    qclass: RecordClass,
    recursion_desired: bool,
) -> Result<Vec<u8>, DnsError> {
    build_query_with_id(transaction_id(), name, qtype, qclass, recursion_desired)
}

/// Builds a standard query carrying one question.
///
/// The result is exactly the 12-byte header, the encoded name with its
/// terminator, and four bytes of type and class.
///
/// # Errors
///
/// Returns [`DnsError::Format`] if `name` cannot be encoded.
pub fn build_query_with_id(
    id: u16,
    name: &str,
    qtype: RecordType,
    qclass: RecordClass,
    recursion_desired: bool,
) -> Result<Vec<u8>, DnsError> {
    let message = DnsMessage {
        header: DnsHeader::query(id, recursion_desired),
        questions: vec![DnsQuestion {
            name: name.to_string(),
            qtype,
            qclass,
        }],
        ..DnsMessage::default()
    };

    let mut buffer = Vec::with_capacity(HEADER_LEN + name.len() + 2 + 4);
    message.pack(&mut buffer)?;
    Ok(buffer)
}

/// Chooses the transaction id for a new query.
///
/// # Returns
///
/// The low 16 bits of the current process id. Repeated calls within one
/// process return the same value.
pub fn transaction_id() -> u16 {
    std::process::id() as u16
}

fn read_section(
    cursor: &mut Cursor<&[u8]>,
    count: u16,
    bytes: &[u8],
) -> Result<Vec<ResourceRecord>, DnsError> {
    let mut records = Vec::with_capacity(capacity_for(count, bytes));
    for _ in 0..count {
        records.push(ResourceRecord::from_bytes(cursor)?);
    }
    Ok(records)
}

/// Caps preallocation so a forged count cannot reserve more than the message could hold.
fn capacity_for(count: u16, bytes: &[u8]) -> usize {
    (count as usize).min(bytes.len() / (1 + RECORD_DESCRIPTOR_LEN))
}

fn read_u16(cursor: &mut Cursor<&[u8]>, field: &str) -> Result<u16, DnsError> {
    let mut buf = [0u8; 2];
    let at = cursor.position();
    cursor
        .read_exact(&mut buf)
        .map_err(|_| DnsError::corrupt(format!("{} at offset {} is cut short", field, at)))?;
    Ok(u16::from_be_bytes(buf))
}

fn read_u32(cursor: &mut Cursor<&[u8]>, field: &str) -> Result<u32, DnsError> {
    let mut buf = [0u8; 4];
    let at = cursor.position();
    cursor
        .read_exact(&mut buf)
        .map_err(|_| DnsError::corrupt(format!("{} at offset {} is cut short", field, at)))?;
    Ok(u32::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name;

    /// Response header: id 0xBEEF, QR + RD + RA set, one question.
    fn response_header(answers: u16, authorities: u16, additionals: u16) -> Vec<u8> {
        let header = DnsHeader {
            id: 0xBEEF,
            flags: 0x8180,
            question_count: 1,
            answer_count: answers,
            authority_count: authorities,
            additional_count: additionals,
        };
        let mut buffer = Vec::new();
        header.pack(&mut buffer);
        buffer
    }

    /// Question for "example.com" A IN; its name sits at offset 12.
    fn example_question() -> Vec<u8> {
        let mut buffer = name::encode("example.com").unwrap();
        buffer.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        buffer
    }

    fn record(name: &[u8], rtype: u16, ttl: u32, payload: &[u8]) -> Vec<u8> {
        let mut buffer = name.to_vec();
        buffer.extend_from_slice(&rtype.to_be_bytes());
        buffer.extend_from_slice(&1u16.to_be_bytes());
        buffer.extend_from_slice(&ttl.to_be_bytes());
        buffer.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        buffer.extend_from_slice(payload);
        buffer
    }

    #[test]
    fn test_build_query_layout() {
        let query =
            build_query_with_id(0x1234, "example.com", RecordType::A, RecordClass::IN, true)
                .unwrap();
        assert_eq!(query.len(), HEADER_LEN + 13 + 4);
        assert_eq!(
            &query[..HEADER_LEN],
            &[0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );

        let message = DnsMessage::from_bytes(&query).unwrap();
        assert_eq!(message.header.question_count, 1);
        assert_eq!(message.header.answer_count, 0);
        assert_eq!(message.header.authority_count, 0);
        assert_eq!(message.header.additional_count, 0);
        assert!(!message.header.is_response());
        assert_eq!(message.header.opcode(), 0);
        assert!(message.header.recursion_desired());
        assert_eq!(
            message.questions,
            vec![DnsQuestion {
                name: "example.com".to_string(),
                qtype: RecordType::A,
                qclass: RecordClass::IN,
            }]
        );
    }

    #[test]
    fn test_build_query_without_recursion() {
        let query =
            build_query_with_id(7, "www.fit.vut.cz", RecordType::AAAA, RecordClass::IN, false)
                .unwrap();
        assert_eq!(&query[2..4], &[0x00, 0x00]);
        assert_eq!(&query[query.len() - 4..], &[0x00, 0x1c, 0x00, 0x01]);
    }

    #[test]
    fn test_build_query_rejects_bad_name() {
        let name = format!("{}.example", "x".repeat(64));
        let err = build_query(&name, RecordType::A, RecordClass::IN, true).unwrap_err();
        assert!(matches!(err, DnsError::Format(_)));
    }

    #[test]
    fn test_header_bitfields() {
        let header = DnsHeader {
            flags: 0b1_0000_1_1_1_1_010_0011,
            ..DnsHeader::new()
        };
        assert!(header.is_response());
        assert_eq!(header.opcode(), 0);
        assert!(header.authoritative());
        assert!(header.truncated());
        assert!(header.recursion_desired());
        assert!(header.recursion_available());
        assert_eq!(header.z(), 0b010);
        assert_eq!(header.get_response_code(), ResponseCode::NameError);

        let status = DnsHeader {
            flags: 0x1000 | 0x000C,
            ..DnsHeader::new()
        };
        assert_eq!(status.opcode(), 2);
        assert_eq!(status.get_response_code(), ResponseCode::Other(12));
    }

    #[test]
    fn test_header_too_short() {
        let err = DnsMessage::from_bytes(&[0x12, 0x34, 0x81]).unwrap_err();
        assert!(matches!(err, DnsError::CorruptMessage(_)));
    }

    #[test]
    fn test_parse_a_record() {
        let packet = [
            response_header(1, 0, 0),
            example_question(),
            record(&[0xc0, 0x0c], 1, 3600, &[93, 184, 216, 34]),
        ]
        .concat();

        let message = DnsMessage::from_bytes(&packet).unwrap();
        assert_eq!(message.answers.len(), 1);
        let answer = &message.answers[0];
        assert_eq!(answer.name, "example.com");
        assert_eq!(answer.rtype, RecordType::A);
        assert_eq!(answer.rclass, RecordClass::IN);
        assert_eq!(answer.ttl, 3600);
        assert_eq!(answer.get_ipv4_address(), Some(Ipv4Addr::new(93, 184, 216, 34)));
        assert_eq!(answer.data.to_string(), "93.184.216.34");
    }

    #[test]
    fn test_parse_all_sections() {
        let mut packet = [response_header(2, 1, 1), example_question()].concat();
        // www.example.com CNAME example.com, via pointers into the question
        packet.extend(record(
            &[3, b'w', b'w', b'w', 0xc0, 0x0c],
            5,
            300,
            &[0xc0, 0x0c],
        ));
        let aaaa = "2001:db8::1".parse::<Ipv6Addr>().unwrap().octets();
        packet.extend(record(&[0xc0, 0x0c], 28, 60, &aaaa));
        packet.extend(record(
            &[0xc0, 0x0c],
            2,
            86400,
            &[1, b'a', 4, b'i', b'a', b'n', b'a', 0xc0, 0x14],
        ));
        packet.extend(record(&[0x00], 99, 0, &[0xde, 0xad]));

        let message = DnsMessage::from_bytes(&packet).unwrap();
        assert_eq!(message.answers.len(), 2);
        assert_eq!(message.authorities.len(), 1);
        assert_eq!(message.additionals.len(), 1);

        assert_eq!(message.answers[0].name, "www.example.com");
        assert_eq!(message.answers[0].get_name_data(), Some("example.com"));
        assert_eq!(message.answers[1].get_ipv6_address(), Some(Ipv6Addr::from(aaaa)));
        assert_eq!(message.answers[1].data.to_string(), "2001:db8::1");
        assert_eq!(message.authorities[0].get_name_data(), Some("a.iana.com"));
        assert_eq!(message.additionals[0].rtype, RecordType::Unknown(99));
        assert_eq!(message.additionals[0].data, RData::Opaque(vec![0xde, 0xad]));
        assert_eq!(message.additionals[0].data.to_string(), "\\# 2 dead");
    }

    #[test]
    fn test_parsing_twice_yields_same_names() {
        let packet = [
            response_header(1, 0, 0),
            example_question(),
            record(&[3, b'w', b'w', b'w', 0xc0, 0x0c], 5, 300, &[0xc0, 0x0c]),
        ]
        .concat();
        let first = DnsMessage::from_bytes(&packet).unwrap();
        let second = DnsMessage::from_bytes(&packet).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_name_payload_shorter_than_data_length() {
        // MX: preference 10 then "mail" -> example.com; the leading octets
        // read as a root name, and the cursor still lands on the next record.
        let mx_payload = [0x00, 0x0a, 4, b'm', b'a', b'i', b'l', 0xc0, 0x0c];
        let packet = [
            response_header(2, 0, 0),
            example_question(),
            record(&[0xc0, 0x0c], 15, 300, &mx_payload),
            record(&[0xc0, 0x0c], 1, 300, &[10, 0, 0, 1]),
        ]
        .concat();

        let message = DnsMessage::from_bytes(&packet).unwrap();
        assert_eq!(message.answers[0].rtype, RecordType::MX);
        assert_eq!(message.answers[1].get_ipv4_address(), Some(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_wrong_length_address_is_opaque() {
        let packet = [
            response_header(1, 0, 0),
            example_question(),
            record(&[0xc0, 0x0c], 1, 300, &[1, 2, 3]),
        ]
        .concat();
        let message = DnsMessage::from_bytes(&packet).unwrap();
        assert_eq!(message.answers[0].data, RData::Opaque(vec![1, 2, 3]));
    }

    #[test]
    fn test_truncated_descriptor() {
        let mut packet = [
            response_header(1, 0, 0),
            example_question(),
            record(&[0xc0, 0x0c], 1, 300, &[1, 2, 3, 4]),
        ]
        .concat();
        packet.truncate(HEADER_LEN + 17 + 2 + 6);
        let err = DnsMessage::from_bytes(&packet).unwrap_err();
        assert!(matches!(err, DnsError::CorruptMessage(_)));
    }

    #[test]
    fn test_truncated_payload() {
        let mut packet = [
            response_header(1, 0, 0),
            example_question(),
            record(&[0xc0, 0x0c], 28, 300, &[0u8; 16]),
        ]
        .concat();
        packet.truncate(packet.len() - 1);
        let err = DnsMessage::from_bytes(&packet).unwrap_err();
        assert!(matches!(err, DnsError::CorruptMessage(_)));
    }

    #[test]
    fn test_count_exceeds_records() {
        let packet = [
            response_header(3, 0, 0),
            example_question(),
            record(&[0xc0, 0x0c], 1, 300, &[1, 2, 3, 4]),
        ]
        .concat();
        let err = DnsMessage::from_bytes(&packet).unwrap_err();
        assert!(matches!(err, DnsError::CorruptMessage(_)));
    }

    #[test]
    fn test_records_beyond_counts() {
        let packet = [
            response_header(0, 0, 0),
            example_question(),
            record(&[0xc0, 0x0c], 1, 300, &[93, 184, 216, 34]),
        ]
        .concat();
        let err = DnsMessage::from_bytes(&packet).unwrap_err();
        assert!(matches!(err, DnsError::CorruptMessage(_)));

        let mut packet = [response_header(0, 0, 0), example_question()].concat();
        packet.push(0);
        assert!(matches!(
            DnsMessage::from_bytes(&packet),
            Err(DnsError::CorruptMessage(_))
        ));
    }

    #[test]
    fn test_forward_pointer_in_record_name() {
        let mut packet = [response_header(1, 0, 0), example_question()].concat();
        let at = packet.len() as u8;
        packet.extend(record(&[0xc0, at], 1, 300, &[1, 2, 3, 4]));
        let err = DnsMessage::from_bytes(&packet).unwrap_err();
        assert!(matches!(err, DnsError::CorruptMessage(_)));
    }

    #[test]
    fn test_type_and_class_tables() {
        for (code, text) in [
            (1, "A"),
            (2, "NS"),
            (5, "CNAME"),
            (6, "SOA"),
            (12, "PTR"),
            (15, "MX"),
            (28, "AAAA"),
            (16, "UNKNOWN"),
        ] {
            let rtype = RecordType::from(code);
            assert_eq!(rtype.to_string(), text);
            assert_eq!(rtype.code(), code);
        }
        for (code, text) in [
            (0, "RESERVED"),
            (1, "IN"),
            (3, "CH"),
            (4, "HS"),
            (254, "NONE"),
            (255, "ANY"),
            (2, "UNKNOWN"),
        ] {
            let class = RecordClass::from(code);
            assert_eq!(class.to_string(), text);
            assert_eq!(class.code(), code);
        }
    }
}
