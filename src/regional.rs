// ABOUTME: Resolves DSRC regional extension open types through the (RegionId, extension slot) table
// ABOUTME: Unknown regions or slots degrade to raw data; the no-region sentinel follows the configured policy

use crate::codec::{DecodeError, PerReader};
use crate::context::DispatchContext;
use crate::datatypes::{RegExtKind, RegionId, RegionKey};
use crate::dissector::NoRegionPolicy;
use crate::registry::{Binding, DissectorTable, RegistryError};
use crate::tree::{FieldNode, FieldValue, Severity};
use bytes::Bytes;
use tracing::{debug, warn};

/// Regional extension handlers, keyed by [`RegionKey`]
pub struct RegionalExtensions {
    table: DissectorTable<RegionKey>,
    no_region_policy: NoRegionPolicy,
}

impl RegionalExtensions {
    pub fn new(no_region_policy: NoRegionPolicy) -> Self {
        Self {
            table: DissectorTable::new("dsrc.regionid"),
            no_region_policy,
        }
    }

    pub fn register(&mut self, key: RegionKey, binding: Binding) -> Result<(), RegistryError> {
        self.table.register(key, binding)
    }

    pub fn handler(&self, key: &RegionKey) -> Option<&Binding> {
        self.table.get(key)
    }

    pub fn no_region_policy(&self) -> NoRegionPolicy {
        self.no_region_policy
    }

    pub fn keys(&self) -> Vec<RegionKey> {
        self.table.keys()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Decode the open type `payload` of extension slot `kind` under the
    /// region recorded in `ctx`, appending the result to `tree`.
    ///
    /// Never fails: the length of an open type is always known, so the whole
    /// payload is accounted as consumed whatever the handler does with it.
    pub fn resolve(
        &self,
        ctx: &mut DispatchContext<'_>,
        kind: RegExtKind,
        payload: &Bytes,
        tree: &mut FieldNode,
    ) -> usize {
        let region = ctx.active_region().unwrap_or(RegionId::NoRegion as u8);

        if region == RegionId::NoRegion as u8 && self.no_region_policy == NoRegionPolicy::Skip {
            if !payload.is_empty() {
                tree.push(FieldNode::raw(payload.clone())).add_note(
                    Severity::Note,
                    format!("{} value without a region is not decoded", kind.name()),
                );
            }
            return payload.len();
        }

        let key = RegionKey::new(region, kind);
        let Some(binding) = self.table.get(&key) else {
            debug!(%key, len = payload.len(), "no regional extension handler, showing raw data");
            tree.push(FieldNode::raw(payload.clone()));
            return payload.len();
        };

        let node = tree.push(FieldNode::new(binding.description()));
        if let Err(err) = binding.dissect(payload, ctx, node) {
            warn!(%key, %err, "regional extension decode fault");
            node.push(FieldNode::raw(payload.clone())).add_fault(&err);
        }
        payload.len()
    }
}

/// Decode one `RegionalExtension ::= SEQUENCE { regionId, regExtValue }`
/// whose value belongs to extension slot `kind`.
pub fn decode_regional_extension(
    kind: RegExtKind,
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new("RegionalExtension"));

    let region = r.read_bits(8)? as u8;
    node.push(FieldNode::leaf(
        "regionId",
        FieldValue::enumerated(u64::from(region), RegionId::label_of(region)),
    ));
    let payload = r.read_open_type("regExtValue")?;

    let outer = ctx.set_active_region(Some(region));
    let regional = ctx.dissector().regional();
    regional.resolve(ctx, kind, &payload, node);
    ctx.set_active_region(outer);
    Ok(())
}

/// Decode `regional SEQUENCE (SIZE(1..4)) OF RegionalExtension`
pub fn decode_regional_list(
    kind: RegExtKind,
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let count = r.read_size(1, 4)?;
    let node = tree.push(FieldNode::new("regional"));
    for _ in 0..count {
        decode_regional_extension(kind, r, ctx, node)?;
    }
    Ok(())
}
