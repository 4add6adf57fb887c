// ABOUTME: Rendered field tree handed back to the display layer after a dispatch
// ABOUTME: Nodes carry a typed value, children and expert notes for decode faults

use crate::codec::DecodeError;
use bytes::Bytes;
use std::fmt;

/// Severity of an expert note attached to a node
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warn,
    Error,
}

/// Annotation attached to a node, e.g. a decode fault or a fallback notice
#[derive(Clone, Debug, PartialEq)]
pub struct ExpertNote {
    pub severity: Severity,
    pub message: String,
}

/// Typed value of a rendered field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Structural node (SEQUENCE, protocol layer)
    None,
    Unsigned(u64),
    Signed(i64),
    Bool(bool),
    Bytes(Bytes),
    /// Numeric value rendered through a label table
    Enumerated {
        value: u64,
        label: Option<&'static str>,
    },
    Text(String),
}

impl FieldValue {
    pub fn enumerated(value: u64, label: Option<&'static str>) -> Self {
        FieldValue::Enumerated { value, label }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            FieldValue::Enumerated { label, .. } => *label,
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Unsigned(v) => Some(*v),
            FieldValue::Enumerated { value, .. } => Some(*value),
            FieldValue::Signed(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::None => Ok(()),
            FieldValue::Unsigned(v) => write!(f, "{v}"),
            FieldValue::Signed(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Bytes(b) => {
                for byte in b.iter() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            FieldValue::Enumerated {
                value,
                label: Some(label),
            } => write!(f, "{label} ({value})"),
            FieldValue::Enumerated { value, label: None } => write!(f, "Unknown ({value})"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// One node of the rendered tree
#[derive(Clone, Debug, PartialEq)]
pub struct FieldNode {
    pub name: &'static str,
    pub value: FieldValue,
    pub children: Vec<FieldNode>,
    pub notes: Vec<ExpertNote>,
}

impl FieldNode {
    pub fn new(name: &'static str) -> Self {
        Self::leaf(name, FieldValue::None)
    }

    pub fn leaf(name: &'static str, value: FieldValue) -> Self {
        Self {
            name,
            value,
            children: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Opaque payload, the fallback for anything no grammar claimed
    pub fn raw(payload: Bytes) -> Self {
        Self::leaf("data", FieldValue::Bytes(payload))
    }

    /// Append a child and return it for further population
    pub fn push(&mut self, child: FieldNode) -> &mut FieldNode {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    pub fn add_note(&mut self, severity: Severity, message: impl Into<String>) -> &mut Self {
        self.notes.push(ExpertNote {
            severity,
            message: message.into(),
        });
        self
    }

    /// Attach a decode fault raised while populating this node
    pub fn add_fault(&mut self, err: &DecodeError) -> &mut Self {
        let severity = match err {
            DecodeError::Unsupported { .. } => Severity::Warn,
            _ => Severity::Error,
        };
        self.add_note(severity, err.to_string())
    }

    /// Depth-first search for the first node called `name`, including `self`
    pub fn find(&self, name: &str) -> Option<&FieldNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Every node called `name`, in depth-first order
    pub fn find_all<'t>(&'t self, name: &str) -> Vec<&'t FieldNode> {
        let mut found = Vec::new();
        self.collect(name, &mut found);
        found
    }

    fn collect<'t>(&'t self, name: &str, found: &mut Vec<&'t FieldNode>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect(name, found);
        }
    }

    /// Highest severity of any note in this subtree
    pub fn worst_severity(&self) -> Option<Severity> {
        let own = self.notes.iter().map(|n| n.severity).max();
        self.children
            .iter()
            .filter_map(FieldNode::worst_severity)
            .chain(own)
            .max()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = depth * 4;
        match self.value {
            FieldValue::None => writeln!(f, "{:indent$}{}", "", self.name)?,
            _ => writeln!(f, "{:indent$}{}: {}", "", self.name, self.value)?,
        }
        for note in &self.notes {
            writeln!(
                f,
                "{:width$}[Expert Info ({:?}): {}]",
                "",
                note.severity,
                note.message,
                width = indent + 4
            )?;
        }
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
