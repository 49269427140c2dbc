use std::collections::HashMap;
use std::sync::Arc;

use crate::data_type::DictError;
use crate::metadata::AvpMetadata;
use crate::standard::{StandardAvpCode, BASE_APPLICATION_ID};

/// Name-based AVP lookup consumed by the encoder
///
/// Implementations must be deterministic for a fixed snapshot. The returned
/// metadata is shared and never mutated by callers.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait AvpDictionary {
    fn find_avp_by_name(&self, application_id: u32, name: &str) -> Option<Arc<AvpMetadata>>;
}

/// In-memory dictionary keyed by `(application_id, name)`
///
/// Populated through `register` and then shared read-only, typically behind
/// an `Arc`. Lookups for an application fall back to the base protocol
/// (application 0), since every Diameter application inherits the base AVPs.
#[derive(Debug, Default)]
pub struct DictionaryManager {
    by_name: HashMap<(u32, String), Arc<AvpMetadata>>,
    by_code: HashMap<(u32, u32, u32), Arc<AvpMetadata>>,
}

impl DictionaryManager {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary preloaded with the built-in standard AVPs
    pub fn standard() -> Self {
        let mut manager = Self::new();
        for avp in StandardAvpCode::ALL {
            let registered = manager.register(avp.application_id(), avp.metadata());
            debug_assert!(registered.is_ok(), "duplicate standard AVP {}", avp.name());
        }
        manager
    }

    /// Register an AVP under an application
    pub fn register(&mut self, application_id: u32, meta: AvpMetadata) -> Result<(), DictError> {
        let key = (application_id, meta.name.clone());
        if self.by_name.contains_key(&key) {
            return Err(DictError::DuplicateAvp {
                application_id,
                name: meta.name,
            });
        }
        let meta = Arc::new(meta);
        self.by_code
            .insert((application_id, meta.code, meta.vendor_id), Arc::clone(&meta));
        self.by_name.insert(key, meta);
        Ok(())
    }

    /// Lookup AVP information by code
    pub fn lookup_by_code(
        &self,
        application_id: u32,
        code: u32,
        vendor_id: u32,
    ) -> Option<Arc<AvpMetadata>> {
        self.by_code
            .get(&(application_id, code, vendor_id))
            .or_else(|| self.by_code.get(&(BASE_APPLICATION_ID, code, vendor_id)))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl AvpDictionary for DictionaryManager {
    fn find_avp_by_name(&self, application_id: u32, name: &str) -> Option<Arc<AvpMetadata>> {
        self.by_name
            .get(&(application_id, name.to_string()))
            .or_else(|| self.by_name.get(&(BASE_APPLICATION_ID, name.to_string())))
            .cloned()
    }
}
