// ABOUTME: Top-level PDU dispatcher: version table, message table, Decode-As overrides, raw fallback
// ABOUTME: Tables are filled once through DissectorBuilder and read concurrently afterwards

use crate::codec::{DecodeError, ItsPduHeader};
use crate::context::DispatchContext;
use crate::datatypes::{MessageId, RegionKey};
use crate::decode_as::{DecodeAs, DecodeAsEntry};
use crate::macros::builder_setters;
use crate::regional::RegionalExtensions;
use crate::registry::{Binding, DissectorTable, RegistryError};
use crate::tree::{FieldNode, FieldValue, Severity};
use bytes::Bytes;
use std::io::Cursor;
use tracing::{debug, warn};

/// Name of the root node of every dissection
pub const PROTOCOL_NAME: &str = "Intelligent Transport Systems";

/// What to do with a regional extension whose RegionId is `noRegion` (0)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NoRegionPolicy {
    /// Do not consult the handler table; non-empty payloads are shown as data
    #[default]
    Skip,
    /// Look up (0, kind) like any other region
    Attempt,
}

/// Dissector configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DissectorConfig {
    /// Handling of the `noRegion` sentinel
    pub no_region_policy: NoRegionPolicy,
    /// Protocol versions bound to the standard ItsPduHeader layout
    pub standard_versions: Vec<u8>,
    /// Longest PDU handed to the grammars; longer input is truncated and flagged
    pub max_pdu_size: usize,
}

impl Default for DissectorConfig {
    fn default() -> Self {
        Self {
            no_region_policy: NoRegionPolicy::Skip,
            standard_versions: vec![1, 2],
            max_pdu_size: 65535,
        }
    }
}

impl DissectorConfig {
    builder_setters! {
        no_region_policy: NoRegionPolicy,
        standard_versions: Vec<u8>,
        max_pdu_size: usize,
    }
}

/// Startup-time registration of versions, message grammars and regional handlers
pub struct DissectorBuilder {
    config: DissectorConfig,
    versions: DissectorTable<u8>,
    messages: DissectorTable<u8>,
    regional: RegionalExtensions,
}

impl DissectorBuilder {
    pub fn new(config: DissectorConfig) -> Self {
        let regional = RegionalExtensions::new(config.no_region_policy);
        Self {
            config,
            versions: DissectorTable::new("its.version"),
            messages: DissectorTable::new("its.msg_id"),
            regional,
        }
    }

    pub fn config(&self) -> &DissectorConfig {
        &self.config
    }

    pub fn register_version(
        &mut self,
        version: u8,
        binding: Binding,
    ) -> Result<&mut Self, RegistryError> {
        self.versions.register(version, binding)?;
        Ok(self)
    }

    pub fn register_message(
        &mut self,
        message_id: u8,
        binding: Binding,
    ) -> Result<&mut Self, RegistryError> {
        self.messages.register(message_id, binding)?;
        Ok(self)
    }

    pub fn register_region(
        &mut self,
        key: RegionKey,
        binding: Binding,
    ) -> Result<&mut Self, RegistryError> {
        self.regional.register(key, binding)?;
        Ok(self)
    }

    /// Register the built-in versions, message grammars and AddGrpC handlers
    pub fn with_standard_grammars(&mut self) -> Result<&mut Self, RegistryError> {
        crate::grammar::register_standard(self)?;
        Ok(self)
    }

    pub fn build(self) -> Dissector {
        debug!(
            versions = self.versions.len(),
            messages = self.messages.len(),
            regional = self.regional.len(),
            "dissector tables sealed"
        );
        Dissector {
            config: self.config,
            versions: self.versions,
            messages: self.messages,
            regional: self.regional,
            decode_as: DecodeAs::new(),
        }
    }
}

/// Result of dispatching one PDU
#[derive(Debug, Clone, PartialEq)]
pub struct Dissection {
    pub tree: FieldNode,
    /// Bytes of the input accounted for
    pub consumed: usize,
    /// Common header, when one was decoded
    pub header: Option<ItsPduHeader>,
    /// Short name of the grammar the message body went to
    pub grammar: Option<&'static str>,
}

impl Dissection {
    /// Decode-As prompt for the message id of this PDU
    pub fn prompt(&self) -> Option<String> {
        self.header.map(|h| DecodeAs::prompt(h.message_id))
    }
}

/// ITS PDU dispatcher
///
/// Immutable after [`DissectorBuilder::build`] apart from the Decode-As
/// store, so one instance can be shared between threads behind an `Arc`.
pub struct Dissector {
    config: DissectorConfig,
    versions: DissectorTable<u8>,
    messages: DissectorTable<u8>,
    regional: RegionalExtensions,
    decode_as: DecodeAs,
}

impl Dissector {
    pub fn builder(config: DissectorConfig) -> DissectorBuilder {
        DissectorBuilder::new(config)
    }

    /// Dissector with the built-in grammars and default configuration
    pub fn standard() -> Result<Self, RegistryError> {
        Self::with_config(DissectorConfig::default())
    }

    /// Dissector with the built-in grammars
    pub fn with_config(config: DissectorConfig) -> Result<Self, RegistryError> {
        let mut builder = DissectorBuilder::new(config);
        builder.with_standard_grammars()?;
        Ok(builder.build())
    }

    pub fn config(&self) -> &DissectorConfig {
        &self.config
    }

    pub fn versions(&self) -> &DissectorTable<u8> {
        &self.versions
    }

    pub fn messages(&self) -> &DissectorTable<u8> {
        &self.messages
    }

    pub fn regional(&self) -> &RegionalExtensions {
        &self.regional
    }

    pub fn decode_as(&self) -> &DecodeAs {
        &self.decode_as
    }

    /// Override `message_id` with the registered grammar called `name`
    pub fn set_decode_as(&self, message_id: u8, name: &str) -> Result<(), RegistryError> {
        let binding = self
            .messages
            .find_by_name(name)
            .ok_or_else(|| RegistryError::UnknownGrammar(name.to_string()))?;
        self.decode_as.set(message_id, binding.clone());
        Ok(())
    }

    pub fn clear_decode_as(&self, message_id: u8) -> bool {
        self.decode_as.clear(message_id)
    }

    /// Grammar that would parse `message_id` right now: the override if any, else the static binding
    pub fn effective_binding(&self, message_id: u8) -> Option<Binding> {
        self.decode_as
            .get(message_id)
            .or_else(|| self.messages.get(&message_id).cloned())
    }

    /// Overridden message ids with their default and current grammar, by id
    pub fn decode_as_entries(&self) -> Vec<DecodeAsEntry> {
        let snapshot = self.decode_as.snapshot();
        let mut entries: Vec<DecodeAsEntry> = snapshot
            .iter()
            .map(|(&message_id, binding)| DecodeAsEntry {
                message_id,
                default: self.messages.get(&message_id).map(Binding::name),
                current: binding.name(),
            })
            .collect();
        entries.sort_by_key(|e| e.message_id);
        entries
    }

    /// Dissect one PDU.
    ///
    /// Never fails: unknown versions and message ids are shown as raw data
    /// and decode faults are attached to the tree as expert notes.
    pub fn dispatch(&self, pdu: &[u8]) -> Dissection {
        let mut root = FieldNode::new(PROTOCOL_NAME);
        let mut ctx = DispatchContext::new(self);

        let data = if pdu.len() > self.config.max_pdu_size {
            root.add_note(
                Severity::Warn,
                format!(
                    "PDU of {} bytes truncated to {}",
                    pdu.len(),
                    self.config.max_pdu_size
                ),
            );
            &pdu[..self.config.max_pdu_size]
        } else {
            pdu
        };

        let Some(&version) = data.first() else {
            let err = DecodeError::Incomplete {
                needed: 8,
                available: 0,
            };
            warn!(%err, "empty PDU");
            root.add_fault(&err);
            return Dissection {
                tree: root,
                consumed: 0,
                header: None,
                grammar: None,
            };
        };

        let consumed = match self.versions.get(&version) {
            Some(binding) => match binding.dissect(data, &mut ctx, &mut root) {
                Ok(consumed) => consumed,
                Err(err) => {
                    warn!(version, %err, "PDU decode fault");
                    root.push(FieldNode::raw(Bytes::copy_from_slice(data)))
                        .add_fault(&err);
                    data.len()
                }
            },
            None => {
                debug!(version, len = data.len(), "unknown protocol version, showing raw data");
                root.push(FieldNode::leaf(
                    "protocolVersion",
                    FieldValue::Unsigned(u64::from(version)),
                ));
                root.push(FieldNode::raw(Bytes::copy_from_slice(data)))
                    .add_note(
                        Severity::Note,
                        format!("Unsupported protocol version {version}"),
                    );
                data.len()
            }
        };

        Dissection {
            tree: root,
            consumed,
            header: ctx.header().copied(),
            grammar: ctx.grammar(),
        }
    }

    /// Hand a message body to the grammar effective for `message_id`.
    ///
    /// Returns the bytes of `body` accounted for.
    pub fn dispatch_message(
        &self,
        message_id: u8,
        body: &[u8],
        ctx: &mut DispatchContext<'_>,
        tree: &mut FieldNode,
    ) -> usize {
        let Some(binding) = self.effective_binding(message_id) else {
            debug!(message_id, len = body.len(), "no grammar for message id, showing raw data");
            tree.push(FieldNode::raw(Bytes::copy_from_slice(body)));
            return body.len();
        };

        ctx.begin_message(binding.name());
        let node = tree.push(FieldNode::new(binding.description()));
        match binding.dissect(body, ctx, node) {
            Ok(consumed) => consumed,
            Err(err) => {
                warn!(message_id, grammar = binding.name(), %err, "message decode fault");
                // whatever was decoded stays, the full body follows as raw data
                node.push(FieldNode::raw(Bytes::copy_from_slice(body)))
                    .add_fault(&err);
                body.len()
            }
        }
    }
}

/// Standard layout of protocol versions 1 and 2: ItsPduHeader followed by the message body
pub fn its_pdu_header(
    data: &[u8],
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut cursor = Cursor::new(data);
    let header = ItsPduHeader::decode(&mut cursor)?;

    let node = tree.push(FieldNode::new("ItsPduHeader"));
    node.push(FieldNode::leaf(
        "protocolVersion",
        FieldValue::Unsigned(u64::from(header.protocol_version)),
    ));
    node.push(FieldNode::leaf(
        "messageID",
        FieldValue::enumerated(
            u64::from(header.message_id),
            MessageId::label_of(header.message_id),
        ),
    ));
    node.push(FieldNode::leaf(
        "stationID",
        FieldValue::Unsigned(u64::from(header.station_id)),
    ));
    ctx.set_header(header);

    let body = &data[ItsPduHeader::SIZE..];
    let consumed = ctx
        .dissector()
        .dispatch_message(header.message_id, body, ctx, tree);
    Ok(ItsPduHeader::SIZE + consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_len(
        data: &[u8],
        _ctx: &mut DispatchContext<'_>,
        tree: &mut FieldNode,
    ) -> Result<usize, DecodeError> {
        tree.push(FieldNode::leaf("len", FieldValue::Unsigned(data.len() as u64)));
        Ok(data.len())
    }

    fn header_only() -> Dissector {
        let mut builder = Dissector::builder(DissectorConfig::default());
        builder
            .register_version(2, Binding::new("ItsPduHeader", "ITS PDU header", its_pdu_header))
            .unwrap()
            .register_message(1, Binding::new("P1", "Protocol one", body_len))
            .unwrap();
        builder.build()
    }

    #[test]
    fn config_defaults_and_setters() {
        let config = DissectorConfig::default();
        assert_eq!(config.no_region_policy, NoRegionPolicy::Skip);
        assert_eq!(config.standard_versions, vec![1, 2]);
        assert_eq!(config.max_pdu_size, 65535);

        let config = config
            .no_region_policy(NoRegionPolicy::Attempt)
            .max_pdu_size(16);
        assert_eq!(config.no_region_policy, NoRegionPolicy::Attempt);
        assert_eq!(config.max_pdu_size, 16);
    }

    #[test]
    fn header_is_rendered_and_recorded() {
        let dissector = header_only();
        let pdu = [0x02, 0x01, 0x00, 0x00, 0x00, 0x2A, 0xAA, 0xBB];
        let dissection = dissector.dispatch(&pdu);

        assert_eq!(dissection.consumed, 8);
        assert_eq!(dissection.header.unwrap().station_id, 42);
        assert_eq!(dissection.grammar, Some("P1"));
        assert_eq!(
            dissection.tree.find("messageID").unwrap().value.label(),
            Some("denm")
        );
        assert_eq!(
            dissection.tree.find("len").unwrap().value,
            FieldValue::Unsigned(2)
        );
        assert_eq!(dissection.prompt().as_deref(), Some("MsgId (\u{2192}1)"));
    }

    #[test]
    fn short_header_is_a_fault() {
        let dissector = header_only();
        let dissection = dissector.dispatch(&[0x02, 0x01]);

        assert_eq!(dissection.consumed, 2);
        assert!(dissection.header.is_none());
        assert_eq!(dissection.tree.worst_severity(), Some(Severity::Error));

        let data = dissection.tree.find("data").unwrap();
        assert_eq!(data.value, FieldValue::Bytes(Bytes::from_static(&[0x02, 0x01])));
        assert_eq!(data.notes[0].severity, Severity::Error);
    }

    #[test]
    fn empty_input() {
        let dissection = header_only().dispatch(&[]);
        assert_eq!(dissection.consumed, 0);
        assert_eq!(dissection.tree.worst_severity(), Some(Severity::Error));
    }

    #[test]
    fn oversized_pdu_is_truncated() {
        let mut builder = Dissector::builder(DissectorConfig::default().max_pdu_size(8));
        builder
            .register_version(2, Binding::new("ItsPduHeader", "ITS PDU header", its_pdu_header))
            .unwrap();
        let dissector = builder.build();

        let mut pdu = vec![0x02, 0x63, 0, 0, 0, 1];
        pdu.extend_from_slice(&[0xEE; 10]);
        let dissection = dissector.dispatch(&pdu);

        assert_eq!(dissection.consumed, 8);
        assert_eq!(dissection.tree.notes[0].severity, Severity::Warn);
        assert_eq!(
            dissection.tree.find("data").unwrap().value,
            FieldValue::Bytes(Bytes::from_static(&[0xEE, 0xEE]))
        );
    }

    #[test]
    fn set_decode_as_by_unknown_name_fails() {
        let dissector = header_only();
        assert_eq!(
            dissector.set_decode_as(1, "NOPE"),
            Err(RegistryError::UnknownGrammar("NOPE".to_string()))
        );
        assert!(dissector.decode_as().is_empty());
    }

    #[test]
    fn decode_as_entries_list_default_and_current() {
        let dissector = header_only();
        dissector.set_decode_as(7, "p1").unwrap();

        assert_eq!(
            dissector.decode_as_entries(),
            vec![DecodeAsEntry {
                message_id: 7,
                default: None,
                current: "P1",
            }]
        );
        assert_eq!(dissector.effective_binding(7).unwrap().name(), "P1");
        assert!(dissector.clear_decode_as(7));
        assert!(dissector.effective_binding(7).is_none());
    }
}
