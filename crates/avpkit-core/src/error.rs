use thiserror::Error;

/// Errors that abort a single encode call
///
/// Dictionary misses are not errors: they surface as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown enumerated value {value:?} for AVP {avp}")]
    UnknownEnumValue { avp: String, value: String },

    #[error("Grouped AVP {avp} nested deeper than {max} levels")]
    NestingTooDeep { avp: String, max: usize },

    #[error("AVP {avp} length {length} exceeds the 24-bit length field")]
    LengthOverflow { avp: String, length: usize },
}

impl EncodeError {
    /// Convert error to the Diameter Result-Code a peer would report
    pub fn to_result_code(&self) -> u32 {
        match self {
            Self::UnknownEnumValue { .. } => 5004, // DIAMETER_INVALID_AVP_VALUE
            Self::LengthOverflow { .. } => 5014,   // DIAMETER_INVALID_AVP_LENGTH
            Self::InvalidArgument(_) | Self::NestingTooDeep { .. } => 5012, // DIAMETER_UNABLE_TO_COMPLY
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEnumValue { .. } => ErrorSeverity::Warning,
            Self::NestingTooDeep { .. } | Self::LengthOverflow { .. } => ErrorSeverity::Error,
            Self::InvalidArgument(_) => ErrorSeverity::Critical,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Result type alias for encoder operations
pub type Result<T> = std::result::Result<T, EncodeError>;
