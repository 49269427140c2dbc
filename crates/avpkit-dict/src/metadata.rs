use crate::data_type::AvpDataType;
use crate::enumeration::EnumTable;

/// Wire metadata for a single AVP, as held by the dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct AvpMetadata {
    pub code: u32,
    pub name: String,
    pub data_type: AvpDataType,
    /// 0 means "no vendor"
    pub vendor_id: u32,
    pub mandatory: bool,
    /// Content hint for OctetString AVPs, e.g. "binary"
    pub content_type: Option<String>,
    pub enumeration: Option<EnumTable>,
    /// Maximum data length, enforced by validation only
    pub data_length: Option<usize>,
}

impl AvpMetadata {
    pub fn new(code: u32, name: impl Into<String>, data_type: AvpDataType) -> Self {
        Self {
            code,
            name: name.into(),
            data_type,
            vendor_id: 0,
            mandatory: false,
            content_type: None,
            enumeration: None,
            data_length: None,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_vendor(mut self, vendor_id: u32) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_enumeration(mut self, table: EnumTable) -> Self {
        self.enumeration = Some(table);
        self
    }

    pub fn with_data_length(mut self, max: usize) -> Self {
        self.data_length = Some(max);
        self
    }

    pub fn is_vendor_specific(&self) -> bool {
        self.vendor_id > 0
    }

    /// True when the content type hint says the value is hex-encoded binary
    pub fn is_binary(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case("binary"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let meta = AvpMetadata::new(263, "Session-Id", AvpDataType::Utf8String);
        assert_eq!(meta.vendor_id, 0);
        assert!(!meta.mandatory);
        assert!(!meta.is_vendor_specific());
        assert!(meta.enumeration.is_none());
        assert!(!meta.is_binary());
    }

    #[test]
    fn test_builder_vendor_and_flags() {
        let meta = AvpMetadata::new(1407, "Visited-PLMN-Id", AvpDataType::OctetString)
            .mandatory()
            .with_vendor(10415)
            .with_content_type("Binary")
            .with_data_length(3);

        assert!(meta.mandatory);
        assert!(meta.is_vendor_specific());
        assert!(meta.is_binary());
        assert_eq!(meta.data_length, Some(3));
    }
}
