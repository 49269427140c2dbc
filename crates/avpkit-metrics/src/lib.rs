use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};
use lazy_static::lazy_static;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref AVPS_ENCODED_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("avpkit_avps_encoded_total", "Top-level AVPs encoded")
    ).expect("valid metric opts");

    pub static ref AVPS_OMITTED_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("avpkit_avps_omitted_total", "AVPs dropped because the dictionary had no entry")
    ).expect("valid metric opts");

    pub static ref DIAGNOSTICS_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("avpkit_diagnostics_total", "Diagnostics raised while encoding AVPs")
    ).expect("valid metric opts");

    pub static ref ENCODE_ERRORS_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("avpkit_encode_errors_total", "Encode calls that failed")
    ).expect("valid metric opts");

    pub static ref ENCODED_AVP_BYTES: Histogram = Histogram::with_opts(
        HistogramOpts::new("avpkit_encoded_avp_bytes", "Size of encoded AVPs including padding")
            .buckets(vec![8.0, 16.0, 32.0, 64.0, 128.0, 256.0, 1024.0, 4096.0, 65536.0])
    ).expect("valid metric opts");
}

/// Register all metrics with the global registry
///
/// Fails with `AlreadyReg` when called twice.
pub fn register_metrics() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(AVPS_ENCODED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(AVPS_OMITTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DIAGNOSTICS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ENCODE_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ENCODED_AVP_BYTES.clone()))?;
    Ok(())
}

/// Gather metrics in Prometheus text format
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
