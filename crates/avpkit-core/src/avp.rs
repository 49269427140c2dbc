use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use avpkit_dict::AvpMetadata;
use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};

use crate::diagnostic::Diagnostic;
use crate::error::{EncodeError, Result};
use crate::uri::DiameterUri;

// AVP flags
pub const AVP_FLAG_VENDOR: u8 = 0x80;
pub const AVP_FLAG_MANDATORY: u8 = 0x40;

/// AVP header size without vendor ID
pub const AVP_HEADER_SIZE: usize = 8;
/// AVP header size with vendor ID
pub const AVP_HEADER_SIZE_VENDOR: usize = 12;
/// Largest value the 24-bit AVP Length field can carry
pub const MAX_AVP_LENGTH: usize = 0x00FF_FFFF;

/// An AVP to encode: a dictionary name and a value
#[derive(Debug, Clone, PartialEq)]
pub struct Avp {
    pub name: String,
    pub data: AvpData,
}

/// Loosely typed AVP value
///
/// The dictionary decides the wire type; the encoder coerces the value to
/// it where it can.
#[derive(Debug, Clone, PartialEq)]
pub enum AvpData {
    /// No value supplied
    Empty,
    Unsigned32(u32),
    Integer32(i32),
    Unsigned64(u64),
    Integer64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Bytes),
    Address(IpAddr),
    Uri(DiameterUri),
    Time(DateTime<Utc>),
    Grouped(Vec<Avp>),
}

impl Avp {
    pub fn new(name: impl Into<String>, data: impl Into<AvpData>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn grouped(name: impl Into<String>, children: Vec<Avp>) -> Self {
        Self::new(name, AvpData::Grouped(children))
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, AvpData::Empty)
    }
}

impl AvpData {
    /// Short name of the value's shape, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Unsigned32(_) | Self::Integer32(_) | Self::Unsigned64(_) | Self::Integer64(_) => {
                "integer"
            }
            Self::Float32(_) | Self::Float64(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Address(_) => "address",
            Self::Uri(_) => "uri",
            Self::Time(_) => "time",
            Self::Grouped(_) => "grouped",
        }
    }

    /// Integer value of any integer variant, widened losslessly
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Unsigned32(v) => Some(i128::from(*v)),
            Self::Integer32(v) => Some(i128::from(*v)),
            Self::Unsigned64(v) => Some(i128::from(*v)),
            Self::Integer64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// No value, or a text, byte or grouped value with nothing in it
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Grouped(children) => children.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for AvpData {
    /// String form used by the best-effort fallback path
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Unsigned32(v) => write!(f, "{v}"),
            Self::Integer32(v) => write!(f, "{v}"),
            Self::Unsigned64(v) => write!(f, "{v}"),
            Self::Integer64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Address(ip) => write!(f, "{ip}"),
            Self::Uri(uri) => write!(f, "{uri}"),
            Self::Time(t) => write!(f, "{}", t.timestamp()),
            Self::Grouped(children) => {
                let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AvpData {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    u32 => Unsigned32,
    i32 => Integer32,
    u64 => Unsigned64,
    i64 => Integer64,
    f32 => Float32,
    f64 => Float64,
    String => Text,
    Bytes => Bytes,
    IpAddr => Address,
    DiameterUri => Uri,
    DateTime<Utc> => Time,
    Vec<Avp> => Grouped,
}

impl From<&str> for AvpData {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<u8>> for AvpData {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for AvpData {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(v))
    }
}

impl From<Ipv4Addr> for AvpData {
    fn from(v: Ipv4Addr) -> Self {
        Self::Address(IpAddr::V4(v))
    }
}

impl From<Ipv6Addr> for AvpData {
    fn from(v: Ipv6Addr) -> Self {
        Self::Address(IpAddr::V6(v))
    }
}

/// AVP header (8 bytes, 12 with Vendor-Id)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvpHeader {
    pub code: u32,
    pub flags: u8,
    /// Header plus data, excluding padding
    pub length: u32,
    pub vendor_id: Option<u32>,
}

impl AvpHeader {
    /// Build the header for `data_len` bytes of data under `meta`
    pub fn for_metadata(meta: &AvpMetadata, data_len: usize) -> Result<Self> {
        let vendor_id = meta.is_vendor_specific().then_some(meta.vendor_id);
        let mut flags = 0;
        if vendor_id.is_some() {
            flags |= AVP_FLAG_VENDOR;
        }
        if meta.mandatory {
            flags |= AVP_FLAG_MANDATORY;
        }

        let header_len = if vendor_id.is_some() {
            AVP_HEADER_SIZE_VENDOR
        } else {
            AVP_HEADER_SIZE
        };
        let length = header_len + data_len;
        if length > MAX_AVP_LENGTH {
            return Err(EncodeError::LengthOverflow {
                avp: meta.name.clone(),
                length,
            });
        }

        Ok(Self {
            code: meta.code,
            flags,
            length: length as u32,
            vendor_id,
        })
    }

    pub fn header_len(&self) -> usize {
        if self.vendor_id.is_some() {
            AVP_HEADER_SIZE_VENDOR
        } else {
            AVP_HEADER_SIZE
        }
    }

    /// Zero bytes needed after the data to reach a 4-byte boundary
    pub fn padding(&self) -> usize {
        padding_for(self.length as usize)
    }

    /// Serialize header to bytes
    pub fn write(&self, buf: &mut BytesMut) {
        buf.put_u32(self.code);
        buf.put_u8(self.flags);

        let length_bytes = self.length.to_be_bytes();
        buf.put_slice(&length_bytes[1..4]);

        if let Some(vid) = self.vendor_id {
            buf.put_u32(vid);
        }
    }
}

/// Padding after an AVP of `length` bytes
pub fn padding_for(length: usize) -> usize {
    (4 - length % 4) % 4
}

/// Encoded AVP: header, data and padding, plus any diagnostics raised
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedAvp {
    header: AvpHeader,
    bytes: Bytes,
    diagnostics: Vec<Diagnostic>,
}

impl EncodedAvp {
    /// Assemble `Code | Flags | Length | [Vendor-Id] | Data | Padding`
    pub fn assemble(meta: &AvpMetadata, data: &[u8], diagnostics: Vec<Diagnostic>) -> Result<Self> {
        let header = AvpHeader::for_metadata(meta, data.len())?;
        let padding = header.padding();

        let mut buf = BytesMut::with_capacity(header.length as usize + padding);
        header.write(&mut buf);
        buf.put_slice(data);
        buf.put_bytes(0, padding);

        Ok(Self {
            header,
            bytes: buf.freeze(),
            diagnostics,
        })
    }

    pub fn header(&self) -> &AvpHeader {
        &self.header
    }

    pub fn code(&self) -> u32 {
        self.header.code
    }

    pub fn flags(&self) -> u8 {
        self.header.flags
    }

    /// AVP Length field value (padding excluded)
    pub fn length(&self) -> u32 {
        self.header.length
    }

    pub fn vendor_id(&self) -> Option<u32> {
        self.header.vendor_id
    }

    pub fn is_vendor_specific(&self) -> bool {
        self.header.flags & AVP_FLAG_VENDOR != 0
    }

    pub fn is_mandatory(&self) -> bool {
        self.header.flags & AVP_FLAG_MANDATORY != 0
    }

    /// Data segment, without header or padding
    pub fn data(&self) -> &[u8] {
        &self.bytes[self.header.header_len()..self.header.length as usize]
    }

    pub fn padding(&self) -> usize {
        self.header.padding()
    }

    /// Full wire form, padding included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Diagnostics raised by this AVP and its grouped children
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when any part was encoded via a fallback path
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// A run of encoded AVPs, e.g. a message body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedAvps {
    pub bytes: Bytes,
    pub diagnostics: Vec<Diagnostic>,
    /// Names of the AVPs dropped because the dictionary had no entry
    pub omitted: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use avpkit_dict::AvpDataType;

    #[test]
    fn test_padding_for() {
        assert_eq!(padding_for(8), 0);
        assert_eq!(padding_for(9), 3);
        assert_eq!(padding_for(10), 2);
        assert_eq!(padding_for(19), 1);
    }

    #[test]
    fn test_header_serialize() {
        let meta = AvpMetadata::new(264, "Origin-Host", AvpDataType::DiameterIdentity).mandatory();
        let header = AvpHeader::for_metadata(&meta, 4).unwrap();

        let mut buf = BytesMut::new();
        header.write(&mut buf);
        assert_eq!(&buf[..], &[0, 0, 1, 8, 0x40, 0, 0, 12]);
    }

    #[test]
    fn test_vendor_header_serialize() {
        let meta = AvpMetadata::new(1405, "ULR-Flags", AvpDataType::Unsigned32).with_vendor(10415);
        let header = AvpHeader::for_metadata(&meta, 4).unwrap();

        let mut buf = BytesMut::new();
        header.write(&mut buf);
        assert_eq!(
            &buf[..],
            &[0, 0, 0x05, 0x7D, 0x80, 0, 0, 16, 0, 0, 0x28, 0xAF]
        );
        assert_eq!(header.header_len(), 12);
    }

    #[test]
    fn test_length_overflow() {
        let meta = AvpMetadata::new(25, "Class", AvpDataType::OctetString);
        assert!(AvpHeader::for_metadata(&meta, MAX_AVP_LENGTH - 8).is_ok());

        let result = AvpHeader::for_metadata(&meta, MAX_AVP_LENGTH - 7);
        assert_eq!(
            result,
            Err(EncodeError::LengthOverflow {
                avp: "Class".to_string(),
                length: MAX_AVP_LENGTH + 1
            })
        );
    }

    #[test]
    fn test_assemble_pads_with_zeros() {
        let meta = AvpMetadata::new(1, "User-Name", AvpDataType::Utf8String);
        let encoded = EncodedAvp::assemble(&meta, b"alice", Vec::new()).unwrap();

        assert_eq!(encoded.length(), 13);
        assert_eq!(encoded.padding(), 3);
        assert_eq!(encoded.as_bytes().len(), 16);
        assert_eq!(encoded.data(), b"alice");
        assert_eq!(&encoded.as_bytes()[13..], &[0, 0, 0]);
        assert!(!encoded.is_degraded());
    }

    #[test]
    fn test_avp_data_from() {
        assert_eq!(AvpData::from(5u32), AvpData::Unsigned32(5));
        assert_eq!(AvpData::from("x"), AvpData::Text("x".to_string()));
        assert_eq!(
            AvpData::from(Ipv4Addr::new(10, 0, 0, 1)),
            AvpData::Address(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
        );
        assert_eq!(AvpData::from(vec![1u8, 2]).kind(), "bytes");
    }

    #[test]
    fn test_avp_data_display() {
        assert_eq!(AvpData::Integer32(-7).to_string(), "-7");
        assert_eq!(AvpData::Empty.to_string(), "");
        let grouped = AvpData::Grouped(vec![Avp::new("Vendor-Id", 10415u32)]);
        assert_eq!(grouped.to_string(), "[Vendor-Id]");
    }

    #[test]
    fn test_avp_data_is_empty() {
        assert!(AvpData::Empty.is_empty());
        assert!(AvpData::from("").is_empty());
        assert!(AvpData::from(Vec::<u8>::new()).is_empty());
        assert!(AvpData::Grouped(Vec::new()).is_empty());

        assert!(!AvpData::from(" ").is_empty());
        assert!(!AvpData::from(vec![0u8]).is_empty());
        assert!(!AvpData::Unsigned32(0).is_empty());
    }
}
