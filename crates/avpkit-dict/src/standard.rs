use crate::data_type::AvpDataType;
use crate::enumeration::EnumTable;
use crate::metadata::AvpMetadata;

/// Diameter Common Messages / base protocol application
pub const BASE_APPLICATION_ID: u32 = 0;
/// NASREQ (RFC 7155)
pub const NASREQ_APPLICATION_ID: u32 = 1;
/// Diameter Credit-Control (RFC 4006)
pub const CREDIT_CONTROL_APPLICATION_ID: u32 = 4;
/// 3GPP Gx (TS 29.212)
pub const GX_APPLICATION_ID: u32 = 16777238;
/// 3GPP S6a/S6d (TS 29.272)
pub const S6A_APPLICATION_ID: u32 = 16777251;

/// 3GPP vendor id
pub const VENDOR_3GPP: u32 = 10415;

/// Standard AVP Code definitions from RFC 6733 and 3GPP specifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StandardAvpCode {
    // ========================================
    // RFC 6733 Base Protocol
    // ========================================
    UserName = 1,
    Class = 25,
    ProxyState = 33,
    EventTimestamp = 55,
    HostIpAddress = 257,
    AuthApplicationId = 258,
    AcctApplicationId = 259,
    VendorSpecificApplicationId = 260,
    RedirectHostUsage = 261,
    SessionId = 263,
    OriginHost = 264,
    SupportedVendorId = 265,
    VendorId = 266,
    FirmwareRevision = 267,
    ResultCode = 268,
    ProductName = 269,
    DisconnectCause = 273,
    AuthRequestType = 274,
    OriginStateId = 278,
    FailedAvp = 279,
    ProxyHost = 280,
    ErrorMessage = 281,
    RouteRecord = 282,
    DestinationRealm = 283,
    ProxyInfo = 284,
    RedirectHost = 292,
    DestinationHost = 293,
    OriginRealm = 296,

    // ========================================
    // RFC 7155 NASREQ
    // ========================================
    FramedIpAddress = 8,
    NasFilterRule = 400,

    // ========================================
    // RFC 4006 Credit-Control
    // ========================================
    CcInputOctets = 412,
    CcRequestNumber = 415,
    CcRequestType = 416,
    ValueDigits = 447,

    // ========================================
    // 3GPP S6a (TS 29.272)
    // ========================================
    SubscriptionData = 1400,
    UlrFlags = 1405,
    UlaFlags = 1406,
    VisitedPlmnId = 1407,
    RequestedEutranAuthInfo = 1408,

    // ========================================
    // 3GPP Gx (TS 29.212)
    // ========================================
    ChargingRuleInstall = 1001,
    ChargingRuleName = 1005,
    EventTrigger = 1006,
}

impl StandardAvpCode {
    pub const ALL: [Self; 42] = [
        Self::UserName,
        Self::Class,
        Self::ProxyState,
        Self::EventTimestamp,
        Self::HostIpAddress,
        Self::AuthApplicationId,
        Self::AcctApplicationId,
        Self::VendorSpecificApplicationId,
        Self::RedirectHostUsage,
        Self::SessionId,
        Self::OriginHost,
        Self::SupportedVendorId,
        Self::VendorId,
        Self::FirmwareRevision,
        Self::ResultCode,
        Self::ProductName,
        Self::DisconnectCause,
        Self::AuthRequestType,
        Self::OriginStateId,
        Self::FailedAvp,
        Self::ProxyHost,
        Self::ErrorMessage,
        Self::RouteRecord,
        Self::DestinationRealm,
        Self::ProxyInfo,
        Self::RedirectHost,
        Self::DestinationHost,
        Self::OriginRealm,
        Self::FramedIpAddress,
        Self::NasFilterRule,
        Self::CcInputOctets,
        Self::CcRequestNumber,
        Self::CcRequestType,
        Self::ValueDigits,
        Self::SubscriptionData,
        Self::UlrFlags,
        Self::UlaFlags,
        Self::VisitedPlmnId,
        Self::RequestedEutranAuthInfo,
        Self::ChargingRuleInstall,
        Self::ChargingRuleName,
        Self::EventTrigger,
    ];

    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get AVP name
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserName => "User-Name",
            Self::Class => "Class",
            Self::ProxyState => "Proxy-State",
            Self::EventTimestamp => "Event-Timestamp",
            Self::HostIpAddress => "Host-IP-Address",
            Self::AuthApplicationId => "Auth-Application-Id",
            Self::AcctApplicationId => "Acct-Application-Id",
            Self::VendorSpecificApplicationId => "Vendor-Specific-Application-Id",
            Self::RedirectHostUsage => "Redirect-Host-Usage",
            Self::SessionId => "Session-Id",
            Self::OriginHost => "Origin-Host",
            Self::SupportedVendorId => "Supported-Vendor-Id",
            Self::VendorId => "Vendor-Id",
            Self::FirmwareRevision => "Firmware-Revision",
            Self::ResultCode => "Result-Code",
            Self::ProductName => "Product-Name",
            Self::DisconnectCause => "Disconnect-Cause",
            Self::AuthRequestType => "Auth-Request-Type",
            Self::OriginStateId => "Origin-State-Id",
            Self::FailedAvp => "Failed-AVP",
            Self::ProxyHost => "Proxy-Host",
            Self::ErrorMessage => "Error-Message",
            Self::RouteRecord => "Route-Record",
            Self::DestinationRealm => "Destination-Realm",
            Self::ProxyInfo => "Proxy-Info",
            Self::RedirectHost => "Redirect-Host",
            Self::DestinationHost => "Destination-Host",
            Self::OriginRealm => "Origin-Realm",
            Self::FramedIpAddress => "Framed-IP-Address",
            Self::NasFilterRule => "NAS-Filter-Rule",
            Self::CcInputOctets => "CC-Input-Octets",
            Self::CcRequestNumber => "CC-Request-Number",
            Self::CcRequestType => "CC-Request-Type",
            Self::ValueDigits => "Value-Digits",
            Self::SubscriptionData => "Subscription-Data",
            Self::UlrFlags => "ULR-Flags",
            Self::UlaFlags => "ULA-Flags",
            Self::VisitedPlmnId => "Visited-PLMN-Id",
            Self::RequestedEutranAuthInfo => "Requested-EUTRAN-Authentication-Info",
            Self::ChargingRuleInstall => "Charging-Rule-Install",
            Self::ChargingRuleName => "Charging-Rule-Name",
            Self::EventTrigger => "Event-Trigger",
        }
    }

    /// Get AVP data type
    pub fn data_type(&self) -> AvpDataType {
        match self {
            Self::UserName | Self::SessionId | Self::ProductName | Self::ErrorMessage => {
                AvpDataType::Utf8String
            }
            Self::OriginHost
            | Self::ProxyHost
            | Self::RouteRecord
            | Self::DestinationRealm
            | Self::DestinationHost
            | Self::OriginRealm => AvpDataType::DiameterIdentity,
            Self::Class
            | Self::ProxyState
            | Self::FramedIpAddress
            | Self::VisitedPlmnId
            | Self::ChargingRuleName => AvpDataType::OctetString,
            Self::AuthApplicationId
            | Self::AcctApplicationId
            | Self::SupportedVendorId
            | Self::VendorId
            | Self::FirmwareRevision
            | Self::ResultCode
            | Self::OriginStateId
            | Self::CcRequestNumber
            | Self::UlrFlags
            | Self::UlaFlags => AvpDataType::Unsigned32,
            Self::RedirectHostUsage
            | Self::DisconnectCause
            | Self::AuthRequestType
            | Self::CcRequestType
            | Self::EventTrigger => AvpDataType::Integer32,
            Self::CcInputOctets => AvpDataType::Unsigned64,
            Self::ValueDigits => AvpDataType::Integer64,
            Self::VendorSpecificApplicationId
            | Self::FailedAvp
            | Self::ProxyInfo
            | Self::SubscriptionData
            | Self::RequestedEutranAuthInfo
            | Self::ChargingRuleInstall => AvpDataType::Grouped,
            Self::EventTimestamp => AvpDataType::Time,
            Self::HostIpAddress => AvpDataType::Address,
            Self::RedirectHost => AvpDataType::DiameterUri,
            Self::NasFilterRule => AvpDataType::IpFilterRule,
        }
    }

    /// Application the AVP is registered under
    pub fn application_id(&self) -> u32 {
        match self {
            Self::FramedIpAddress | Self::NasFilterRule => NASREQ_APPLICATION_ID,
            Self::CcInputOctets
            | Self::CcRequestNumber
            | Self::CcRequestType
            | Self::ValueDigits => CREDIT_CONTROL_APPLICATION_ID,
            Self::SubscriptionData
            | Self::UlrFlags
            | Self::UlaFlags
            | Self::VisitedPlmnId
            | Self::RequestedEutranAuthInfo => S6A_APPLICATION_ID,
            Self::ChargingRuleInstall | Self::ChargingRuleName | Self::EventTrigger => {
                GX_APPLICATION_ID
            }
            _ => BASE_APPLICATION_ID,
        }
    }

    pub fn vendor_id(&self) -> u32 {
        match self.application_id() {
            GX_APPLICATION_ID | S6A_APPLICATION_ID => VENDOR_3GPP,
            _ => 0,
        }
    }

    /// M-bit per the defining specification
    pub fn is_mandatory(&self) -> bool {
        !matches!(
            self,
            Self::FirmwareRevision | Self::ProductName | Self::ErrorMessage
        )
    }

    /// Enumerated values, for the Enumerated AVPs
    pub fn enumeration(&self) -> Option<EnumTable> {
        let pairs: &[(&str, i64)] = match self {
            Self::RedirectHostUsage => &[
                ("DONT_CACHE", 0),
                ("ALL_SESSION", 1),
                ("ALL_REALM", 2),
                ("REALM_AND_APPLICATION", 3),
                ("ALL_APPLICATION", 4),
                ("ALL_HOST", 5),
                ("ALL_USER", 6),
            ],
            Self::DisconnectCause => &[
                ("REBOOTING", 0),
                ("BUSY", 1),
                ("DO_NOT_WANT_TO_TALK_TO_YOU", 2),
            ],
            Self::AuthRequestType => &[
                ("AUTHENTICATE_ONLY", 1),
                ("AUTHORIZE_ONLY", 2),
                ("AUTHORIZE_AUTHENTICATE", 3),
            ],
            Self::CcRequestType => &[
                ("INITIAL_REQUEST", 1),
                ("UPDATE_REQUEST", 2),
                ("TERMINATION_REQUEST", 3),
                ("EVENT_REQUEST", 4),
            ],
            Self::EventTrigger => &[
                ("SGSN_CHANGE", 0),
                ("QOS_CHANGE", 1),
                ("RAT_CHANGE", 2),
                ("TFT_CHANGE", 3),
                ("PLMN_CHANGE", 4),
                ("LOSS_OF_BEARER", 5),
                ("RECOVERY_OF_BEARER", 6),
            ],
            _ => return None,
        };
        Some(EnumTable::from_pairs(pairs.iter().copied()))
    }

    /// Full dictionary record for this AVP
    pub fn metadata(&self) -> AvpMetadata {
        let mut meta = AvpMetadata::new(self.code(), self.name(), self.data_type())
            .with_vendor(self.vendor_id());
        meta.mandatory = self.is_mandatory();
        meta.enumeration = self.enumeration();
        match self {
            Self::VisitedPlmnId => meta.with_content_type("binary").with_data_length(3),
            _ => meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(StandardAvpCode::OriginHost.name(), "Origin-Host");
        assert_eq!(StandardAvpCode::ResultCode.name(), "Result-Code");
        assert_eq!(StandardAvpCode::OriginRealm.name(), "Origin-Realm");
    }

    #[test]
    fn test_data_type() {
        assert_eq!(StandardAvpCode::OriginHost.data_type(), AvpDataType::DiameterIdentity);
        assert_eq!(StandardAvpCode::ResultCode.data_type(), AvpDataType::Unsigned32);
        assert_eq!(StandardAvpCode::EventTimestamp.data_type(), AvpDataType::Time);
    }

    #[test]
    fn test_all_codes_unique() {
        for (i, a) in StandardAvpCode::ALL.iter().enumerate() {
            for b in &StandardAvpCode::ALL[i + 1..] {
                assert_ne!(a.code(), b.code(), "{} and {} share a code", a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_metadata_3gpp_vendor() {
        let meta = StandardAvpCode::UlrFlags.metadata();
        assert_eq!(meta.vendor_id, VENDOR_3GPP);
        assert!(meta.mandatory);
        assert_eq!(meta.code, 1405);
    }

    #[test]
    fn test_metadata_enumeration() {
        let meta = StandardAvpCode::DisconnectCause.metadata();
        let table = meta.enumeration.unwrap();
        assert_eq!(table.text_to_value("BUSY"), Some(1));
        assert!(StandardAvpCode::ResultCode.metadata().enumeration.is_none());
    }

    #[test]
    fn test_product_name_not_mandatory() {
        assert!(!StandardAvpCode::ProductName.metadata().mandatory);
        assert!(StandardAvpCode::OriginRealm.metadata().mandatory);
    }
}
