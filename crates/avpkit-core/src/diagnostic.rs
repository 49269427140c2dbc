use std::fmt;

use avpkit_dict::AvpDataType;
use thiserror::Error;

/// Non-fatal anomaly raised while encoding
///
/// The AVP is still produced; the diagnostic says how it was degraded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("{value} value cannot be encoded as {declared}; used its string form")]
    UnsupportedType {
        declared: AvpDataType,
        value: &'static str,
    },

    #[error("malformed value: {0}")]
    MalformedValue(String),

    #[error("no value supplied; encoded empty data")]
    EmptyValue,

    #[error("unrecognized address literal {0:?}; encoded empty data")]
    UnrecognizedAddress(String),

    #[error("data length {actual} exceeds dictionary limit {max}")]
    LengthExceeded { max: usize, actual: usize },

    #[error("AVP not found in dictionary")]
    NotInDictionary,
}

/// A diagnostic tied to the AVP that raised it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub application_id: u32,
    pub avp: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(application_id: u32, avp: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            application_id,
            avp: avp.into(),
            kind,
        }
    }

    /// Emit the diagnostic as a structured warning
    pub(crate) fn emit(&self) {
        tracing::warn!(
            application_id = self.application_id,
            avp = %self.avp,
            "{}",
            self.kind
        );
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (application {}): {}", self.avp, self.application_id, self.kind)
    }
}
