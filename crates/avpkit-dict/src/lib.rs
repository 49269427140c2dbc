// Diameter dictionary module
pub mod data_type;
pub mod enumeration;
pub mod metadata;
pub mod manager;
pub mod standard;

// Re-export commonly used types
pub use data_type::{AvpDataType, DictError};
pub use enumeration::EnumTable;
pub use metadata::AvpMetadata;
pub use manager::{AvpDictionary, DictionaryManager};
pub use standard::{
    StandardAvpCode, BASE_APPLICATION_ID, CREDIT_CONTROL_APPLICATION_ID, GX_APPLICATION_ID,
    NASREQ_APPLICATION_ID, S6A_APPLICATION_ID, VENDOR_3GPP,
};

#[cfg(any(test, feature = "mock"))]
pub use manager::MockAvpDictionary;
