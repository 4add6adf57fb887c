// ABOUTME: Parser abstraction and the write-once tables binding keys to parsers
// ABOUTME: Message ids, protocol versions and regional extension keys all use DissectorTable

use crate::codec::DecodeError;
use crate::context::DispatchContext;
use crate::tree::FieldNode;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;

/// One decoding capability: consume bytes plus per-packet context, render
/// fields into `tree` and report how many bytes were consumed.
pub trait Parser: Send + Sync {
    fn dissect(
        &self,
        data: &[u8],
        ctx: &mut DispatchContext<'_>,
        tree: &mut FieldNode,
    ) -> Result<usize, DecodeError>;
}

impl<F> Parser for F
where
    F: Fn(&[u8], &mut DispatchContext<'_>, &mut FieldNode) -> Result<usize, DecodeError>
        + Send
        + Sync,
{
    fn dissect(
        &self,
        data: &[u8],
        ctx: &mut DispatchContext<'_>,
        tree: &mut FieldNode,
    ) -> Result<usize, DecodeError> {
        self(data, ctx, tree)
    }
}

/// A named parser as held by the tables and the Decode-As store
#[derive(Clone)]
pub struct Binding {
    name: &'static str,
    description: &'static str,
    parser: Arc<dyn Parser>,
}

impl Binding {
    /// * `name` - short name used for Decode-As selection (e.g. "DENM")
    /// * `description` - protocol layer rendered in the tree (e.g. "ITS message - DENM")
    pub fn new<P>(name: &'static str, description: &'static str, parser: P) -> Self
    where
        P: Parser + 'static,
    {
        Self {
            name,
            description,
            parser: Arc::new(parser),
        }
    }

    /// Same as [`Binding::new`], with the closure signature spelled out for inference
    pub fn from_fn<F>(name: &'static str, description: &'static str, f: F) -> Self
    where
        F: Fn(&[u8], &mut DispatchContext<'_>, &mut FieldNode) -> Result<usize, DecodeError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, description, f)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn dissect(
        &self,
        data: &[u8],
        ctx: &mut DispatchContext<'_>,
        tree: &mut FieldNode,
    ) -> Result<usize, DecodeError> {
        self.parser.dissect(data, ctx, tree)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registration errors. These only occur while the tables are being built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate registration in '{table}' for key {key}")]
    Duplicate { table: &'static str, key: String },

    #[error("No grammar named '{0}' is registered")]
    UnknownGrammar(String),
}

/// Key → parser table, populated once at startup and read-only afterwards
pub struct DissectorTable<K> {
    name: &'static str,
    bindings: HashMap<K, Binding>,
}

impl<K> DissectorTable<K>
where
    K: Eq + Hash + Copy + fmt::Display,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            bindings: HashMap::new(),
        }
    }

    /// Table name, e.g. "its.msg_id"
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bind `key`; a key may only be bound once
    pub fn register(&mut self, key: K, binding: Binding) -> Result<(), RegistryError> {
        if self.bindings.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                table: self.name,
                key: key.to_string(),
            });
        }
        tracing::trace!(table = self.name, %key, grammar = binding.name(), "registered");
        self.bindings.insert(key, binding);
        Ok(())
    }

    pub fn get(&self, key: &K) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn keys(&self) -> Vec<K> {
        self.bindings.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// First binding whose short name matches, ignoring ASCII case
    pub fn find_by_name(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .values()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&K, &Binding)> {
        self.bindings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FieldValue;

    fn marker(
        data: &[u8],
        _ctx: &mut DispatchContext<'_>,
        tree: &mut FieldNode,
    ) -> Result<usize, DecodeError> {
        tree.push(FieldNode::leaf("marker", FieldValue::Unsigned(data.len() as u64)));
        Ok(data.len())
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut table = DissectorTable::<u8>::new("its.msg_id");
        table
            .register(1, Binding::new("P1", "first", marker))
            .unwrap();

        let err = table
            .register(1, Binding::new("P2", "second", marker))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                table: "its.msg_id",
                key: "1".to_string()
            }
        );
        assert_eq!(table.get(&1).unwrap().name(), "P1");
    }

    #[test]
    fn find_by_name_ignores_case() {
        let mut table = DissectorTable::<u8>::new("its.msg_id");
        table
            .register(1, Binding::new("DENM", "ITS message - DENM", marker))
            .unwrap();

        assert_eq!(table.find_by_name("denm").unwrap().description(), "ITS message - DENM");
        assert!(table.find_by_name("CAM").is_none());
    }

    #[test]
    fn keys_lists_registrations() {
        let mut table = DissectorTable::<u8>::new("its.version");
        table.register(1, Binding::new("v1", "v1", marker)).unwrap();
        table.register(2, Binding::new("v2", "v2", marker)).unwrap();

        let mut keys = table.keys();
        keys.sort();
        assert_eq!(keys, vec![1, 2]);
        assert_eq!(table.len(), 2);
        assert!(table.is_registered(&2));
        assert!(!table.is_registered(&3));
    }
}
