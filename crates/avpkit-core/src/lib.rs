//! Diameter AVP encoder
//!
//! Turns a named AVP with a loosely typed value into its RFC 6733 wire form,
//! using an [`AvpDictionary`] for code, type, vendor and flag metadata.

// Error types module
pub mod error;
pub mod diagnostic;

// Wire model and codecs
pub mod avp;
pub mod codec;
pub mod octet;
pub mod uri;

// Encoder
pub mod encoder;
mod validate;

// Re-export commonly used types
pub use avpkit_config::{ConfigError, EncoderConfig};
pub use avpkit_dict::{AvpDataType, AvpDictionary, AvpMetadata, DictionaryManager, EnumTable};
pub use avp::{Avp, AvpData, AvpHeader, EncodedAvp, EncodedAvps};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use encoder::{application_id, AvpEncoder};
pub use error::{EncodeError, ErrorSeverity, Result};
pub use uri::{DiameterUri, UriError};
