// ABOUTME: Per-dispatch scratch state threaded through one PDU's parsers
// ABOUTME: Carries the decoded header, the active RegionId and the active CauseCode

use crate::codec::ItsPduHeader;
use crate::datatypes::{GENERIC, SubCauseVocabulary};
use crate::dissector::Dissector;

/// Transient state of a single dispatch call.
///
/// Created when [`Dissector::dispatch`] starts and dropped when it returns;
/// never shared between packets or threads. Parsers use it to pass context
/// dependent facts to fields decoded later in the same message:
///
/// - the RegionId of the RegionalExtension being decoded, read when its
///   open type value is resolved
/// - the causeCode of a CauseCode just decoded, read by the paired
///   subCauseCode to pick its label table
pub struct DispatchContext<'a> {
    dissector: &'a Dissector,
    header: Option<ItsPduHeader>,
    grammar: Option<&'static str>,
    active_region: Option<u8>,
    active_cause: Option<u8>,
}

impl<'a> DispatchContext<'a> {
    pub(crate) fn new(dissector: &'a Dissector) -> Self {
        Self {
            dissector,
            header: None,
            grammar: None,
            active_region: None,
            active_cause: None,
        }
    }

    /// The dissector this dispatch runs against, for nested lookups
    pub fn dissector(&self) -> &'a Dissector {
        self.dissector
    }

    pub fn header(&self) -> Option<&ItsPduHeader> {
        self.header.as_ref()
    }

    pub fn set_header(&mut self, header: ItsPduHeader) {
        self.header = Some(header);
    }

    /// Short name of the grammar the message body was handed to
    pub fn grammar(&self) -> Option<&'static str> {
        self.grammar
    }

    /// Start of a new message body: forget region and cause of anything before it
    pub fn begin_message(&mut self, grammar: &'static str) {
        self.grammar = Some(grammar);
        self.active_region = None;
        self.active_cause = None;
    }

    pub fn active_region(&self) -> Option<u8> {
        self.active_region
    }

    /// Record the RegionId of the regional extension being decoded, returning the previous one
    pub fn set_active_region(&mut self, region: Option<u8>) -> Option<u8> {
        std::mem::replace(&mut self.active_region, region)
    }

    pub fn active_cause(&self) -> Option<u8> {
        self.active_cause
    }

    pub fn set_active_cause(&mut self, cause: u8) {
        self.active_cause = Some(cause);
    }

    /// Label table for a subCauseCode decoded now.
    ///
    /// With no active cause this is a caller ordering error; it resolves to
    /// the generic vocabulary rather than failing the packet.
    pub fn sub_cause_vocabulary(&self) -> &'static SubCauseVocabulary {
        match self.active_cause {
            Some(cause) => crate::cause::vocabulary_for(cause),
            None => {
                tracing::debug!("subCauseCode decoded without an active causeCode");
                &GENERIC
            }
        }
    }
}
