// ABOUTME: Operator-controlled Decode-As overrides consulted before the static message table
// ABOUTME: Copy-on-write snapshot so concurrent dispatch reads never block each other

use crate::registry::Binding;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

const RIGHTWARDS_ARROW: char = '\u{2192}';

/// In-memory messageID → grammar overrides.
///
/// Reads load the current snapshot without locking. Updates clone the map,
/// modify the clone and publish it atomically (last write wins).
pub struct DecodeAs {
    overrides: ArcSwap<HashMap<u8, Binding>>,
}

impl DecodeAs {
    pub fn new() -> Self {
        Self {
            overrides: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Force `message_id` to be parsed by `binding`
    pub fn set(&self, message_id: u8, binding: Binding) {
        let name = binding.name();
        self.overrides.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(message_id, binding.clone());
            next
        });
        tracing::info!(message_id, grammar = name, "decode-as override set");
    }

    /// Drop the override for `message_id`; returns whether one existed
    pub fn clear(&self, message_id: u8) -> bool {
        if !self.overrides.load().contains_key(&message_id) {
            return false;
        }
        let previous = self.overrides.rcu(|current| {
            let mut next = (**current).clone();
            next.remove(&message_id);
            next
        });
        let existed = previous.contains_key(&message_id);
        if existed {
            tracing::info!(message_id, "decode-as override cleared");
        }
        existed
    }

    /// Drop every override
    pub fn reset(&self) {
        self.overrides.store(Arc::new(HashMap::new()));
        tracing::info!("decode-as overrides reset");
    }

    pub fn get(&self, message_id: u8) -> Option<Binding> {
        self.overrides.load().get(&message_id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.load().is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.load().len()
    }

    /// Current overrides as one consistent snapshot
    pub fn snapshot(&self) -> Arc<HashMap<u8, Binding>> {
        self.overrides.load_full()
    }

    /// Human readable prompt naming the messageID value, e.g. `MsgId (→1)`
    pub fn prompt(message_id: u8) -> String {
        format!("MsgId ({RIGHTWARDS_ARROW}{message_id})")
    }
}

impl Default for DecodeAs {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the Decode-As listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeAsEntry {
    pub message_id: u8,
    /// Grammar bound in the static table, if any
    pub default: Option<&'static str>,
    /// Grammar the override selects
    pub current: &'static str,
}
