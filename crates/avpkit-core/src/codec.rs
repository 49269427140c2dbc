//! Scalar type codecs
//!
//! Each codec turns one value into the data segment for its Diameter type.
//! Values that do not fit are encoded through the string fallback and the
//! output carries a diagnostic.

use std::net::IpAddr;

use avpkit_dict::AvpDataType;
use chrono::DateTime;

use crate::avp::AvpData;
use crate::diagnostic::DiagnosticKind;
use crate::uri::DiameterUri;

/// Seconds between the NTP epoch (1900-01-01) and the POSIX epoch
pub const NTP_EPOCH_OFFSET: i64 = (70 * 365 + 17) * 86_400;

/// Address family tags (IANA address family numbers)
pub const ADDRESS_FAMILY_IPV4: u16 = 1;
pub const ADDRESS_FAMILY_IPV6: u16 = 2;

/// Data bytes produced by a codec, with the diagnostic if it had to degrade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOutput {
    pub bytes: Vec<u8>,
    pub diagnostic: Option<DiagnosticKind>,
}

impl CodecOutput {
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            diagnostic: None,
        }
    }

    pub fn degraded(bytes: Vec<u8>, kind: DiagnosticKind) -> Self {
        Self {
            bytes,
            diagnostic: Some(kind),
        }
    }

    /// String fallback for a value that does not match the declared type
    pub fn fallback(declared: AvpDataType, data: &AvpData) -> Self {
        Self::degraded(
            fallback_bytes(data),
            DiagnosticKind::UnsupportedType {
                declared,
                value: data.kind(),
            },
        )
    }

    /// String fallback for a value of the right shape but out of range or unparsable
    fn malformed(data: &AvpData, reason: String) -> Self {
        Self::degraded(fallback_bytes(data), DiagnosticKind::MalformedValue(reason))
    }
}

/// UTF-8 bytes of the value's string form; raw bytes pass through untouched
pub fn fallback_bytes(data: &AvpData) -> Vec<u8> {
    match data {
        AvpData::Bytes(b) => b.to_vec(),
        AvpData::Grouped(_) | AvpData::Empty => Vec::new(),
        other => other.to_string().into_bytes(),
    }
}

/// Integer view of a value: integer variants directly, text parsed as decimal
fn integer_of(data: &AvpData) -> Option<Result<i128, String>> {
    if let Some(v) = data.as_integer() {
        return Some(Ok(v));
    }
    let text = data.as_text()?;
    Some(
        text.trim()
            .parse::<i128>()
            .map_err(|_| format!("{text:?} is not an integer")),
    )
}

macro_rules! integer_codec {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $declared:expr) => {
        $(#[$doc])*
        pub fn $name(data: &AvpData) -> CodecOutput {
            match integer_of(data) {
                Some(Ok(v)) => match <$ty>::try_from(v) {
                    Ok(v) => CodecOutput::ok(v.to_be_bytes().to_vec()),
                    Err(_) => CodecOutput::malformed(
                        data,
                        format!("{v} out of range for {}", $declared),
                    ),
                },
                Some(Err(reason)) => CodecOutput::malformed(data, reason),
                None => CodecOutput::fallback($declared, data),
            }
        }
    };
}

integer_codec!(
    /// Unsigned32: 4 bytes big-endian
    encode_unsigned32, u32, AvpDataType::Unsigned32
);
integer_codec!(
    /// Integer32: 4 bytes big-endian two's complement
    encode_integer32, i32, AvpDataType::Integer32
);
integer_codec!(
    /// Unsigned64: 8 bytes big-endian
    encode_unsigned64, u64, AvpDataType::Unsigned64
);
integer_codec!(
    /// Integer64: 8 bytes big-endian two's complement
    encode_integer64, i64, AvpDataType::Integer64
);

fn float_of(data: &AvpData) -> Option<Result<f64, String>> {
    match data {
        AvpData::Float32(v) => Some(Ok(f64::from(*v))),
        AvpData::Float64(v) => Some(Ok(*v)),
        AvpData::Text(s) => Some(
            s.trim()
                .parse::<f64>()
                .map_err(|_| format!("{s:?} is not a number")),
        ),
        other => other.as_integer().map(|v| Ok(v as f64)),
    }
}

/// Float32: IEEE-754 single precision, big-endian
pub fn encode_float32(data: &AvpData) -> CodecOutput {
    match float_of(data) {
        Some(Ok(v)) => {
            let narrowed = v as f32;
            // Infinity and NaN inputs are carried as-is; finite overflow is not
            if v.is_finite() && !narrowed.is_finite() {
                CodecOutput::malformed(data, format!("{v:e} out of range for Float32"))
            } else {
                CodecOutput::ok(narrowed.to_be_bytes().to_vec())
            }
        }
        Some(Err(reason)) => CodecOutput::malformed(data, reason),
        None => CodecOutput::fallback(AvpDataType::Float32, data),
    }
}

/// Float64: IEEE-754 double precision, big-endian
pub fn encode_float64(data: &AvpData) -> CodecOutput {
    match float_of(data) {
        Some(Ok(v)) => CodecOutput::ok(v.to_be_bytes().to_vec()),
        Some(Err(reason)) => CodecOutput::malformed(data, reason),
        None => CodecOutput::fallback(AvpDataType::Float64, data),
    }
}

/// UTF8String, DiameterIdentity and IPFilterRule: the UTF-8 bytes, no prefix
pub fn encode_utf8(declared: AvpDataType, data: &AvpData) -> CodecOutput {
    match data {
        AvpData::Text(s) => CodecOutput::ok(s.as_bytes().to_vec()),
        AvpData::Bytes(b) => match std::str::from_utf8(b) {
            Ok(_) => CodecOutput::ok(b.to_vec()),
            Err(e) => CodecOutput::degraded(
                b.to_vec(),
                DiagnosticKind::MalformedValue(format!("invalid UTF-8: {e}")),
            ),
        },
        AvpData::Grouped(_) => CodecOutput::fallback(declared, data),
        other => CodecOutput::ok(other.to_string().into_bytes()),
    }
}

/// Time: POSIX seconds shifted to the NTP epoch, 4 bytes big-endian
///
/// The 32-bit field rolls over in 2036; later instants wrap modulo 2^32 as
/// RFC 6733 prescribes. No leap-second correction is applied.
pub fn encode_time(data: &AvpData) -> CodecOutput {
    let posix = match data {
        AvpData::Time(t) => t.timestamp(),
        AvpData::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(v) => v,
                Err(_) => match DateTime::parse_from_rfc3339(s) {
                    Ok(t) => t.timestamp(),
                    Err(_) => {
                        return CodecOutput::malformed(data, format!("{s:?} is not a timestamp"))
                    }
                },
            }
        }
        other => match other.as_integer().map(i64::try_from) {
            Some(Ok(v)) => v,
            Some(Err(_)) => {
                return CodecOutput::malformed(data, "timestamp out of range".to_string())
            }
            None => return CodecOutput::fallback(AvpDataType::Time, data),
        },
    };

    match posix_to_ntp(posix) {
        Some(ntp) => CodecOutput::ok(ntp.to_be_bytes().to_vec()),
        None => CodecOutput::malformed(data, format!("{posix} predates the NTP epoch")),
    }
}

/// NTP seconds for a POSIX timestamp, `None` before 1900
pub fn posix_to_ntp(posix: i64) -> Option<u32> {
    let ntp = posix.checked_add(NTP_EPOCH_OFFSET)?;
    if ntp < 0 {
        return None;
    }
    // Era rollover: keep the low 32 bits
    Some(ntp as u32)
}

/// DiameterURI: the canonical URI string
pub fn encode_uri(data: &AvpData) -> CodecOutput {
    match data {
        AvpData::Uri(uri) => CodecOutput::ok(uri.to_string().into_bytes()),
        AvpData::Text(s) => match s.parse::<DiameterUri>() {
            Ok(uri) => CodecOutput::ok(uri.to_string().into_bytes()),
            Err(e) => CodecOutput::malformed(data, e.to_string()),
        },
        _ => CodecOutput::fallback(AvpDataType::DiameterUri, data),
    }
}

/// Raw address octets, 4 or 16 bytes
pub fn ip_octets(ip: &IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// Address: 2-byte family tag followed by the address octets
///
/// Unrecognized literals produce an empty data segment and a diagnostic.
pub fn encode_address(data: &AvpData) -> CodecOutput {
    let ip = match data {
        AvpData::Address(ip) => *ip,
        AvpData::Text(_) | AvpData::Bytes(_) => {
            let literal = match data {
                AvpData::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
                other => other.to_string(),
            };
            match literal.parse::<IpAddr>() {
                Ok(ip) => ip,
                Err(_) => {
                    return CodecOutput::degraded(
                        Vec::new(),
                        DiagnosticKind::UnrecognizedAddress(literal),
                    )
                }
            }
        }
        _ => {
            return CodecOutput::degraded(
                Vec::new(),
                DiagnosticKind::UnsupportedType {
                    declared: AvpDataType::Address,
                    value: data.kind(),
                },
            )
        }
    };

    let family = match ip {
        IpAddr::V4(_) => ADDRESS_FAMILY_IPV4,
        IpAddr::V6(_) => ADDRESS_FAMILY_IPV6,
    };
    let mut bytes = family.to_be_bytes().to_vec();
    bytes.extend_from_slice(&ip_octets(&ip));
    CodecOutput::ok(bytes)
}
