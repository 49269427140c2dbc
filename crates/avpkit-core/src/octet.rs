//! OctetString heuristic encoder
//!
//! Callers hand OctetString AVPs whatever they have: addresses, hex dumps,
//! plain text, integers or raw bytes. The first matching rule wins:
//!
//! 1. typed IP address -> packed octets
//! 2. text/bytes holding an IPv4 literal -> 4 octets
//! 3. text/bytes holding an IPv6 literal -> 16 octets
//! 4. `content_type = "binary"` and text -> hex decode (optional `0x`)
//! 5. text -> UTF-8 bytes
//! 6. integer -> minimal big-endian bytes
//! 7. raw bytes -> unchanged
//!
//! Anything else yields empty data and a diagnostic.

use std::net::{Ipv4Addr, Ipv6Addr};

use avpkit_dict::{AvpDataType, AvpMetadata};

use crate::avp::AvpData;
use crate::codec::{fallback_bytes, ip_octets, CodecOutput};
use crate::diagnostic::DiagnosticKind;

pub fn encode_octet_string(meta: &AvpMetadata, data: &AvpData) -> CodecOutput {
    if let AvpData::Address(ip) = data {
        return CodecOutput::ok(ip_octets(ip));
    }

    let literal = match data {
        AvpData::Text(s) => Some(s.as_str()),
        AvpData::Bytes(b) => std::str::from_utf8(b).ok(),
        _ => None,
    };
    if let Some(literal) = literal {
        if let Ok(v4) = literal.parse::<Ipv4Addr>() {
            return CodecOutput::ok(v4.octets().to_vec());
        }
        if let Ok(v6) = literal.parse::<Ipv6Addr>() {
            return CodecOutput::ok(v6.octets().to_vec());
        }
    }

    match data {
        AvpData::Text(s) if meta.is_binary() => decode_hex(s),
        AvpData::Text(s) => CodecOutput::ok(s.as_bytes().to_vec()),
        AvpData::Bytes(b) => CodecOutput::ok(b.to_vec()),
        other => match other.as_integer() {
            Some(v) if v >= 0 => CodecOutput::ok(minimal_be_bytes(v as u128)),
            Some(v) => CodecOutput::degraded(
                fallback_bytes(other),
                DiagnosticKind::MalformedValue(format!("negative integer {v} for OctetString")),
            ),
            None => CodecOutput::degraded(
                Vec::new(),
                DiagnosticKind::UnsupportedType {
                    declared: AvpDataType::OctetString,
                    value: other.kind(),
                },
            ),
        },
    }
}

/// Hex string to bytes; an undecodable string yields empty data
fn decode_hex(text: &str) -> CodecOutput {
    let digits = text.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);

    match hex::decode(digits) {
        Ok(bytes) => CodecOutput::ok(bytes),
        Err(e) => CodecOutput::degraded(
            Vec::new(),
            DiagnosticKind::MalformedValue(format!("invalid hex {text:?}: {e}")),
        ),
    }
}

/// Big-endian bytes with leading zero bytes stripped, at least one byte
pub fn minimal_be_bytes(value: u128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count().min(bytes.len() - 1);
    bytes[skip..].to_vec()
}
