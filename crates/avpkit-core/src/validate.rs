use avpkit_dict::AvpDictionary;

use crate::avp::{Avp, AvpData};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::encoder::AvpEncoder;
use crate::error::Result;

impl<D: AvpDictionary + ?Sized> AvpEncoder<D> {
    /// Check an AVP against the dictionary without producing wire bytes
    ///
    /// Reports the encoding diagnostics, dictionary misses and any data
    /// segment longer than the dictionary's `data_length`. Errors are the
    /// same as for `encode_avp`.
    pub fn validate_avp(&self, application_id: u32, avp: &Avp) -> Result<Vec<Diagnostic>> {
        let mut report = Vec::new();
        match self.encode_at_depth(application_id, avp, 0)? {
            None => report.push(Diagnostic::new(
                application_id,
                avp.name.trim(),
                DiagnosticKind::NotInDictionary,
            )),
            Some(encoded) => {
                report.extend_from_slice(encoded.diagnostics());
                self.check_lengths(application_id, avp, Some(encoded.data().len()), 0, &mut report)?;
            }
        }
        Ok(report)
    }

    fn check_lengths(
        &self,
        application_id: u32,
        avp: &Avp,
        data_len: Option<usize>,
        depth: usize,
        report: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let name = avp.name.trim();
        let Some(meta) = self.dictionary().find_avp_by_name(application_id, name) else {
            if depth > 0 {
                report.push(Diagnostic::new(application_id, name, DiagnosticKind::NotInDictionary));
            }
            return Ok(());
        };

        if let Some(max) = meta.data_length {
            // Children are only re-encoded when their entry carries a limit
            let actual = match data_len {
                Some(len) => len,
                None => self
                    .encode_at_depth(application_id, avp, depth)?
                    .map_or(0, |encoded| encoded.data().len()),
            };
            if actual > max {
                report.push(Diagnostic::new(
                    application_id,
                    name,
                    DiagnosticKind::LengthExceeded { max, actual },
                ));
            }
        }

        if let AvpData::Grouped(children) = &avp.data {
            for child in children {
                self.check_lengths(application_id, child, None, depth + 1, report)?;
            }
        }
        Ok(())
    }
}
