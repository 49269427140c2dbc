use std::sync::Arc;

use avpkit_config::{ConfigError, EncoderConfig};
use avpkit_dict::{AvpDataType, AvpDictionary, AvpMetadata, EnumTable};
use avpkit_metrics::{
    AVPS_ENCODED_TOTAL, AVPS_OMITTED_TOTAL, DIAGNOSTICS_TOTAL, ENCODED_AVP_BYTES,
    ENCODE_ERRORS_TOTAL,
};
use bytes::BytesMut;
use tracing::{trace, warn};

use crate::avp::{Avp, AvpData, EncodedAvp, EncodedAvps};
use crate::codec::{self, CodecOutput};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::{EncodeError, Result};
use crate::octet;

/// Validate an application id coming from a signed source
pub fn application_id(raw: i64) -> Result<u32> {
    u32::try_from(raw)
        .map_err(|_| EncodeError::InvalidArgument(format!("application id {raw} out of range")))
}

/// AVP encoder bound to a read-only dictionary
///
/// Holds no mutable state, so one encoder can be shared across threads when
/// the dictionary is `Sync`.
pub struct AvpEncoder<D: ?Sized> {
    config: EncoderConfig,
    dictionary: Arc<D>,
}

impl<D: AvpDictionary + ?Sized> AvpEncoder<D> {
    pub fn new(dictionary: Arc<D>) -> Self {
        Self {
            config: EncoderConfig::default(),
            dictionary,
        }
    }

    /// Encoder with a custom config; limits outside their range are rejected
    pub fn with_config(
        dictionary: Arc<D>,
        config: EncoderConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.check()?;
        Ok(Self { config, dictionary })
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode one AVP into its wire form
    ///
    /// Returns `Ok(None)` when the dictionary has no entry for the name; the
    /// caller is expected to drop the AVP and carry on.
    pub fn encode_avp(&self, application_id: u32, avp: &Avp) -> Result<Option<EncodedAvp>> {
        let result = self.encode_at_depth(application_id, avp, 0);
        match &result {
            Ok(Some(encoded)) => {
                AVPS_ENCODED_TOTAL.inc();
                ENCODED_AVP_BYTES.observe(encoded.as_bytes().len() as f64);
                DIAGNOSTICS_TOTAL.inc_by(encoded.diagnostics().len() as u64);
            }
            Ok(None) => {}
            Err(e) => {
                ENCODE_ERRORS_TOTAL.inc();
                warn!(application_id, avp = %avp.name, error = %e, "Failed to encode AVP");
            }
        }
        result
    }

    /// Encode a list of AVPs back to back, dropping dictionary misses
    pub fn encode_avps(&self, application_id: u32, avps: &[Avp]) -> Result<EncodedAvps> {
        let mut buf = BytesMut::new();
        let mut out = EncodedAvps::default();

        for avp in avps {
            match self.encode_avp(application_id, avp)? {
                Some(encoded) => {
                    out.diagnostics.extend_from_slice(encoded.diagnostics());
                    buf.extend_from_slice(encoded.as_bytes());
                }
                None => out.omitted.push(avp.name.trim().to_string()),
            }
        }

        out.bytes = buf.freeze();
        Ok(out)
    }

    pub(crate) fn encode_at_depth(
        &self,
        application_id: u32,
        avp: &Avp,
        depth: usize,
    ) -> Result<Option<EncodedAvp>> {
        let name = avp.name.trim();
        if name.is_empty() {
            return Err(EncodeError::InvalidArgument("AVP name must not be empty".to_string()));
        }
        if depth > self.config.max_nesting_depth {
            return Err(EncodeError::NestingTooDeep {
                avp: name.to_string(),
                max: self.config.max_nesting_depth,
            });
        }

        let Some(meta) = self.dictionary.find_avp_by_name(application_id, name) else {
            AVPS_OMITTED_TOTAL.inc();
            warn!(application_id, avp = name, "AVP not found in dictionary, omitting");
            return Ok(None);
        };

        let mut diagnostics = Vec::new();
        let data = self.encode_data(application_id, &meta, &avp.data, depth, &mut diagnostics)?;
        let encoded = EncodedAvp::assemble(&meta, &data, diagnostics)?;

        trace!(
            application_id,
            avp = name,
            code = encoded.code(),
            length = encoded.length(),
            "Encoded AVP"
        );
        Ok(Some(encoded))
    }

    fn encode_data(
        &self,
        application_id: u32,
        meta: &AvpMetadata,
        data: &AvpData,
        depth: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<u8>> {
        if data.is_empty() {
            note(diagnostics, application_id, meta, DiagnosticKind::EmptyValue);
            return Ok(Vec::new());
        }

        if let Some(table) = &meta.enumeration {
            if let Some(bytes) = resolve_enum(meta, table, data)? {
                return Ok(bytes.to_vec());
            }
        }

        let output = match meta.data_type {
            AvpDataType::Unsigned32 => codec::encode_unsigned32(data),
            AvpDataType::Integer32 => codec::encode_integer32(data),
            AvpDataType::Unsigned64 => codec::encode_unsigned64(data),
            AvpDataType::Integer64 => codec::encode_integer64(data),
            AvpDataType::Float32 => codec::encode_float32(data),
            AvpDataType::Float64 => codec::encode_float64(data),
            ty @ (AvpDataType::Utf8String
            | AvpDataType::DiameterIdentity
            | AvpDataType::IpFilterRule) => codec::encode_utf8(ty, data),
            AvpDataType::OctetString => octet::encode_octet_string(meta, data),
            AvpDataType::Address => codec::encode_address(data),
            AvpDataType::Time => codec::encode_time(data),
            AvpDataType::DiameterUri => codec::encode_uri(data),
            AvpDataType::Grouped => match data {
                AvpData::Grouped(children) => {
                    return self.encode_children(application_id, children, depth, diagnostics)
                }
                other => CodecOutput::fallback(AvpDataType::Grouped, other),
            },
        };

        if let Some(kind) = output.diagnostic {
            note(diagnostics, application_id, meta, kind);
        }
        Ok(output.bytes)
    }

    /// Concatenate the encoded children, skipping dictionary misses
    fn encode_children(
        &self,
        application_id: u32,
        children: &[Avp],
        depth: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for child in children {
            if let Some(encoded) = self.encode_at_depth(application_id, child, depth + 1)? {
                diagnostics.extend_from_slice(encoded.diagnostics());
                buf.extend_from_slice(encoded.as_bytes());
            }
        }
        Ok(buf)
    }
}

fn note(
    diagnostics: &mut Vec<Diagnostic>,
    application_id: u32,
    meta: &AvpMetadata,
    kind: DiagnosticKind,
) {
    let diagnostic = Diagnostic::new(application_id, meta.name.as_str(), kind);
    diagnostic.emit();
    diagnostics.push(diagnostic);
}

/// Map text or integer input through the enumeration table
///
/// Returns `Ok(None)` for values of other shapes, which then take the
/// normal type path.
fn resolve_enum(meta: &AvpMetadata, table: &EnumTable, data: &AvpData) -> Result<Option<[u8; 4]>> {
    let unknown = |value: String| EncodeError::UnknownEnumValue {
        avp: meta.name.clone(),
        value,
    };

    let value = if let Some(text) = data.as_text() {
        match table.text_to_value(text) {
            Some(v) => v,
            // Numeric text naming a known value
            None => text
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| table.value_to_text(*v).is_some())
                .ok_or_else(|| unknown(text.to_string()))?,
        }
    } else if let Some(v) = data.as_integer() {
        i64::try_from(v)
            .ok()
            .filter(|v| table.value_to_text(*v).is_some())
            .ok_or_else(|| unknown(v.to_string()))?
    } else {
        return Ok(None);
    };

    let bytes = match i32::try_from(value) {
        Ok(v) => v.to_be_bytes(),
        Err(_) => u32::try_from(value)
            .map_err(|_| unknown(value.to_string()))?
            .to_be_bytes(),
    };
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use avpkit_dict::{DictionaryManager, MockAvpDictionary};
    use std::net::Ipv4Addr;

    fn encoder() -> AvpEncoder<DictionaryManager> {
        AvpEncoder::new(Arc::new(DictionaryManager::standard()))
    }

    fn meta(code: u32, name: &str, ty: AvpDataType) -> Arc<AvpMetadata> {
        Arc::new(AvpMetadata::new(code, name, ty))
    }

    #[test]
    fn test_application_id() {
        assert_eq!(application_id(0), Ok(0));
        assert_eq!(application_id(16777251), Ok(16777251));
        assert!(matches!(application_id(-1), Err(EncodeError::InvalidArgument(_))));
        assert!(matches!(application_id(1 << 33), Err(EncodeError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_name_is_invalid() {
        let result = encoder().encode_avp(0, &Avp::new("  ", "x"));
        assert!(matches!(result, Err(EncodeError::InvalidArgument(_))));
    }

    #[test]
    fn test_name_is_trimmed() {
        let encoded = encoder().encode_avp(0, &Avp::new(" Result-Code ", 2001u32)).unwrap().unwrap();
        assert_eq!(encoded.code(), 268);
    }

    #[test]
    fn test_dictionary_miss() {
        assert_eq!(encoder().encode_avp(0, &Avp::new("Does-Not-Exist", 1u32)), Ok(None));
    }

    #[test]
    fn test_empty_value_diagnostic() {
        let encoded = encoder().encode_avp(0, &Avp::empty("Session-Id")).unwrap().unwrap();
        assert_eq!(encoded.length(), 8);
        assert!(encoded.data().is_empty());
        assert_eq!(encoded.diagnostics()[0].kind, DiagnosticKind::EmptyValue);
    }

    #[test]
    fn test_enum_text_and_integer_match() {
        let enc = encoder();
        let by_text = enc.encode_avp(0, &Avp::new("Disconnect-Cause", "BUSY")).unwrap().unwrap();
        let by_int = enc.encode_avp(0, &Avp::new("Disconnect-Cause", 1u32)).unwrap().unwrap();
        let by_numeric_text = enc.encode_avp(0, &Avp::new("Disconnect-Cause", "1")).unwrap().unwrap();

        assert_eq!(by_text.data(), &[0, 0, 0, 1]);
        assert_eq!(by_text.as_bytes(), by_int.as_bytes());
        assert_eq!(by_text.as_bytes(), by_numeric_text.as_bytes());
    }

    #[test]
    fn test_unknown_enum_value() {
        let enc = encoder();
        let result = enc.encode_avp(0, &Avp::new("Disconnect-Cause", "SLEEPY"));
        assert_eq!(
            result,
            Err(EncodeError::UnknownEnumValue {
                avp: "Disconnect-Cause".to_string(),
                value: "SLEEPY".to_string()
            })
        );
        assert!(enc.encode_avp(0, &Avp::new("Disconnect-Cause", 9u32)).is_err());
    }

    #[test]
    fn test_grouped_declared_with_scalar_falls_back() {
        let encoded = encoder().encode_avp(0, &Avp::new("Proxy-Info", "oops")).unwrap().unwrap();
        assert_eq!(encoded.data(), b"oops");
        assert!(matches!(
            encoded.diagnostics()[0].kind,
            DiagnosticKind::UnsupportedType { declared: AvpDataType::Grouped, .. }
        ));
    }

    #[test]
    fn test_lookup_once_per_avp_and_child() {
        let mut dict = MockAvpDictionary::new();
        dict.expect_find_avp_by_name()
            .withf(|app, name| *app == 7 && name == "Parent")
            .times(1)
            .returning(|_, _| Some(meta(1, "Parent", AvpDataType::Grouped)));
        dict.expect_find_avp_by_name()
            .withf(|app, name| *app == 7 && name == "Child")
            .times(2)
            .returning(|_, _| Some(meta(2, "Child", AvpDataType::Unsigned32)));
        dict.expect_find_avp_by_name()
            .withf(|app, name| *app == 7 && name == "Ghost")
            .times(1)
            .returning(|_, _| None);

        let enc = AvpEncoder::new(Arc::new(dict));
        let avp = Avp::grouped(
            "Parent",
            vec![Avp::new("Child", 1u32), Avp::new("Ghost", 2u32), Avp::new("Child", 3u32)],
        );
        let encoded = enc.encode_avp(7, &avp).unwrap().unwrap();

        // Two 12-byte children, the miss dropped
        assert_eq!(encoded.length(), 8 + 24);
    }

    #[test]
    fn test_nesting_too_deep() {
        let config = EncoderConfig {
            max_nesting_depth: 2,
            ..EncoderConfig::default()
        };
        let enc = AvpEncoder::with_config(Arc::new(DictionaryManager::standard()), config).unwrap();

        let leaf = Avp::new("Proxy-Host", "relay.example.com");
        let two_deep = Avp::grouped("Proxy-Info", vec![Avp::grouped("Proxy-Info", vec![leaf])]);
        assert!(enc.encode_avp(0, &two_deep).unwrap().is_some());

        let three_deep = Avp::grouped("Proxy-Info", vec![two_deep]);
        assert_eq!(
            enc.encode_avp(0, &three_deep),
            Err(EncodeError::NestingTooDeep { avp: "Proxy-Host".to_string(), max: 2 })
        );
    }

    #[test]
    fn test_empty_values_are_signalled() {
        let enc = encoder();
        for avp in [
            Avp::new("Session-Id", ""),
            Avp::new("Class", Vec::<u8>::new()),
            Avp::grouped("Proxy-Info", Vec::new()),
        ] {
            let encoded = enc.encode_avp(0, &avp).unwrap().unwrap();
            assert_eq!(encoded.length(), 8, "{}", avp.name);
            assert!(encoded.data().is_empty());
            assert_eq!(encoded.diagnostics().len(), 1, "{}", avp.name);
            assert_eq!(encoded.diagnostics()[0].kind, DiagnosticKind::EmptyValue);
        }
    }

    #[test]
    fn test_with_config_rejects_unbounded_depth() {
        let dict = Arc::new(DictionaryManager::standard());
        for depth in [0, 257, 1_000_000] {
            let config = EncoderConfig {
                max_nesting_depth: depth,
                ..EncoderConfig::default()
            };
            assert!(matches!(
                AvpEncoder::with_config(Arc::clone(&dict), config),
                Err(ConfigError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_child_error_propagates() {
        let avp = Avp::grouped("Proxy-Info", vec![Avp::new("", 1u32)]);
        assert!(matches!(encoder().encode_avp(0, &avp), Err(EncodeError::InvalidArgument(_))));
    }

    #[test]
    fn test_encode_avps_body() {
        let enc = encoder();
        let body = enc
            .encode_avps(
                0,
                &[
                    Avp::new("Origin-Host", "a.example.com"),
                    Avp::new("Not-A-Real-Avp", 1u32),
                    Avp::new("Host-IP-Address", Ipv4Addr::new(10, 0, 0, 1)),
                ],
            )
            .unwrap();

        // 8 + 13 -> 21, padded to 24; 8 + 6 -> 14, padded to 16
        assert_eq!(body.bytes.len(), 24 + 16);
        assert_eq!(body.omitted, vec!["Not-A-Real-Avp".to_string()]);
        assert!(body.diagnostics.is_empty());
    }
}
