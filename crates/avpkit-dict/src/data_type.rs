use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// AVP data type enumeration
///
/// `Enumerated` is not a separate variant: RFC 6733 derives it from
/// Integer32, and the enumeration table lives on [`crate::AvpMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvpDataType {
    OctetString,
    Utf8String,
    DiameterIdentity,
    DiameterUri,
    Unsigned32,
    Unsigned64,
    Integer32,
    Integer64,
    Float32,
    Float64,
    Grouped,
    Time,
    Address,
    IpFilterRule,
}

/// Dictionary errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    #[error("Unknown AVP data type: {0}")]
    UnknownDataType(String),

    #[error("Duplicate AVP {name} in application {application_id}")]
    DuplicateAvp { application_id: u32, name: String },
}

impl AvpDataType {
    /// Canonical RFC 6733 name of the type
    pub fn name(&self) -> &'static str {
        match self {
            Self::OctetString => "OctetString",
            Self::Utf8String => "UTF8String",
            Self::DiameterIdentity => "DiameterIdentity",
            Self::DiameterUri => "DiameterURI",
            Self::Unsigned32 => "Unsigned32",
            Self::Unsigned64 => "Unsigned64",
            Self::Integer32 => "Integer32",
            Self::Integer64 => "Integer64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Grouped => "Grouped",
            Self::Time => "Time",
            Self::Address => "Address",
            Self::IpFilterRule => "IPFilterRule",
        }
    }
}

impl FromStr for AvpDataType {
    type Err = DictError;

    /// Resolve a dictionary type name. Matching is case-insensitive and
    /// accepts the aliases found in common dictionary files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "octetstring" => Self::OctetString,
            "utf8string" => Self::Utf8String,
            "diameteridentity" | "identity" => Self::DiameterIdentity,
            "diameteruri" => Self::DiameterUri,
            "unsigned32" => Self::Unsigned32,
            "unsigned64" => Self::Unsigned64,
            "integer32" | "enumerated" => Self::Integer32,
            "integer64" => Self::Integer64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "grouped" => Self::Grouped,
            "time" => Self::Time,
            "address" | "ipaddress" => Self::Address,
            "ipfilterrule" => Self::IpFilterRule,
            _ => return Err(DictError::UnknownDataType(s.to_string())),
        };
        Ok(ty)
    }
}

impl fmt::Display for AvpDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("UTF8String".parse(), Ok(AvpDataType::Utf8String));
        assert_eq!("utf8string".parse(), Ok(AvpDataType::Utf8String));
        assert_eq!("DiameterURI".parse(), Ok(AvpDataType::DiameterUri));
        assert_eq!(" Grouped ".parse(), Ok(AvpDataType::Grouped));
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("Enumerated".parse(), Ok(AvpDataType::Integer32));
        assert_eq!("Identity".parse(), Ok(AvpDataType::DiameterIdentity));
        assert_eq!("IPAddress".parse(), Ok(AvpDataType::Address));
    }

    #[test]
    fn test_from_str_unknown() {
        let result = "Unsigned128".parse::<AvpDataType>();
        assert_eq!(result, Err(DictError::UnknownDataType("Unsigned128".to_string())));
    }

    #[test]
    fn test_name_round_trips_through_from_str() {
        for ty in [
            AvpDataType::OctetString,
            AvpDataType::DiameterUri,
            AvpDataType::IpFilterRule,
            AvpDataType::Float64,
        ] {
            assert_eq!(ty.name().parse(), Ok(ty));
        }
    }
}
