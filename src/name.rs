//! Domain name encoding and decoding.
//!
//! A name travels on the wire as a sequence of length-prefixed labels closed by
//! a zero-length label (`www.google.com` -> `3www6google3com0`). Inside a
//! received message the tail of a name may be replaced by a two-octet
//! compression pointer (RFC 1035 section 4.1.4) whose top two bits are set and
//! whose remaining 14 bits give an offset from the start of the message.

use std::io::Cursor;

use crate::error::DnsError;

/// Longest label allowed by RFC 1035.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest encoded name, terminator included.
pub const MAX_NAME_LEN: usize = 255;

/// Any length octet at or above this value starts a compression pointer.
const POINTER_TAG: u8 = 0b1100_0000;

/// Encodes `domain` as wire-format labels and appends them to `buffer`.
///
/// A single trailing dot is accepted and ignored, and the empty name (or `.`)
/// encodes as the root, a lone zero octet. On error `buffer` is left as it was.
///
/// # Errors
///
/// Returns [`DnsError::Format`] if a label is empty or longer than
/// [`MAX_LABEL_LEN`] octets, or if the whole name exceeds [`MAX_NAME_LEN`].
pub fn pack_domain_name(buffer: &mut Vec<u8>, domain: &str) -> Result<(), DnsError> {
    let start = buffer.len();
    let trimmed = domain.strip_suffix('.').unwrap_or(domain);

    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            let len = label.len();
            if len == 0 || len > MAX_LABEL_LEN {
                buffer.truncate(start);
                return Err(DnsError::format(format!(
                    "label '{}' in '{}' must be 1 to {} octets long",
                    label, domain, MAX_LABEL_LEN
                )));
            }

            buffer.push(len as u8);
            buffer.extend_from_slice(label.as_bytes());
        }
    }
    buffer.push(0);

    if buffer.len() - start > MAX_NAME_LEN {
        buffer.truncate(start);
        return Err(DnsError::format(format!(
            "name '{}' exceeds {} octets once encoded",
            domain, MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Encodes `hostname` into a freshly allocated label sequence.
pub fn encode(hostname: &str) -> Result<Vec<u8>, DnsError> {
    let mut buffer = Vec::with_capacity(hostname.len() + 2);
    pack_domain_name(&mut buffer, hostname)?;
    Ok(buffer)
}

/// Decodes an uncompressed label sequence back into dotted form.
///
/// The result carries no trailing dot; the root name decodes to `""`.
/// Octets after the terminating zero label are ignored.
///
/// # Errors
///
/// Returns [`DnsError::Format`] if a length octet points past the end of
/// `labels` or exceeds [`MAX_LABEL_LEN`], if the terminator is missing, or if
/// a compression pointer shows up (it has nothing to point into here).
pub fn decode(labels: &[u8]) -> Result<String, DnsError> {
    let mut parts = Vec::new();
    let mut pos = 0;

    loop {
        let len = *labels
            .get(pos)
            .ok_or_else(|| DnsError::format("label sequence is not terminated"))?;
        pos += 1;

        if len == 0 {
            break;
        }
        if len >= POINTER_TAG {
            return Err(DnsError::format(format!(
                "compression pointer at offset {} in an uncompressed name",
                pos - 1
            )));
        }

        let len = len as usize;
        if len > MAX_LABEL_LEN {
            return Err(DnsError::format(format!(
                "label length {} at offset {} exceeds {} octets",
                len,
                pos - 1,
                MAX_LABEL_LEN
            )));
        }
        let label = labels.get(pos..pos + len).ok_or_else(|| {
            DnsError::format(format!(
                "label of {} octets at offset {} runs past the end of the name",
                len,
                pos - 1
            ))
        })?;
        parts.push(String::from_utf8_lossy(label).into_owned());
        pos += len;
    }

    Ok(parts.join("."))
}

/// Reads a possibly compressed name starting at the cursor position.
///
/// The cursor must wrap the *whole* message so pointer offsets resolve against
/// its first octet. On return the cursor sits just past the octets the name
/// occupies at its original position: after the terminator for an inline
/// name, or after the first compression pointer otherwise.
///
/// Every pointer must target an offset strictly below the lowest offset read
/// so far for this name. Offsets therefore shrink with each jump, which bounds
/// the walk and rules out self-references and cycles.
///
/// # Errors
///
/// Returns [`DnsError::CorruptMessage`] if the name runs past the end of the
/// message, a length octet between 64 and 191 appears, a pointer targets its
/// own position or anything after it, or the decoded name exceeds
/// [`MAX_NAME_LEN`] octets.
pub fn unpack_domain_name(cursor: &mut Cursor<&[u8]>) -> Result<String, DnsError> {
    let message: &[u8] = *cursor.get_ref();
    let mut pos = cursor.position() as usize;
    let mut floor = pos;
    let mut resume_at = None;
    let mut parts = Vec::new();
    let mut encoded_len = 1;

    loop {
        let len = *message.get(pos).ok_or_else(|| {
            DnsError::corrupt(format!("name runs past the end of the message at offset {}", pos))
        })?;

        if len >= POINTER_TAG {
            let low = *message.get(pos + 1).ok_or_else(|| {
                DnsError::corrupt(format!("compression pointer at offset {} is cut short", pos))
            })?;
            let target = (((len & !POINTER_TAG) as usize) << 8) | low as usize;
            if target >= floor {
                return Err(DnsError::corrupt(format!(
                    "compression pointer at offset {} targets offset {}, expected below {}",
                    pos, target, floor
                )));
            }

            // Only the octets before the first jump belong to the caller's position.
            if resume_at.is_none() {
                resume_at = Some(pos + 2);
            }
            floor = target;
            pos = target;
            continue;
        }

        pos += 1;
        if len == 0 {
            break;
        }

        let len = len as usize;
        if len > MAX_LABEL_LEN {
            return Err(DnsError::corrupt(format!(
                "label length {} at offset {} exceeds {} octets",
                len,
                pos - 1,
                MAX_LABEL_LEN
            )));
        }
        let label = message.get(pos..pos + len).ok_or_else(|| {
            DnsError::corrupt(format!(
                "label of {} octets at offset {} runs past the end of the message",
                len,
                pos - 1
            ))
        })?;
        encoded_len += len + 1;
        if encoded_len > MAX_NAME_LEN {
            return Err(DnsError::corrupt(format!(
                "name exceeds {} octets once decompressed",
                MAX_NAME_LEN
            )));
        }
        parts.push(String::from_utf8_lossy(label).into_owned());
        pos += len;
    }

    cursor.set_position(resume_at.unwrap_or(pos) as u64);
    Ok(parts.join("."))
}
