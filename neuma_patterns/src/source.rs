// Input boundary: uniform access to externally-shaped document nodes.
//
// Manuscript trees reach the engine in two shapes:
// - key-mapping: plain JSON objects (`serde_json::Value`), as written by the
//   corpus export (`{"kind": "Syllable", "text": "ky", "notes": {...}}`);
// - attribute-bearing: `AttrNode`, a kinded record with named attributes, as
//   produced by parsers that build an object model in memory.
//
// Both implement `SourceNode`, which exposes exactly the accessors lowering
// needs (kind, scalar field, nested node, node list). node.rs lowers any
// `SourceNode` into the internal `Node` tagged union, so nothing downstream
// branches on representation.

use serde_json::Value;
use std::collections::BTreeMap;

/// A scalar field value borrowed from a source node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar<'_> {
    /// Render as text, the way provenance fields are stored.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Str(s) => (*s).to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }

    /// Non-empty strings, non-zero numbers, and `true` count as present.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Str(s) => !s.is_empty(),
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Bool(b) => *b,
        }
    }

    /// Integer value of a number or a numeric string.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Str(s) => s.trim().parse().ok(),
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Scalar::Float(_) | Scalar::Bool(_) => None,
        }
    }
}

/// Read access to one node of an externally supplied document tree.
pub trait SourceNode {
    /// The node's `kind` discriminator, if it has one.
    fn kind(&self) -> Option<&str>;

    /// Whether the node carries a field with this name at all.
    fn has_field(&self, name: &str) -> bool;

    /// A scalar field. Lists, nested nodes and nulls are not scalars.
    fn scalar(&self, name: &str) -> Option<Scalar<'_>>;

    /// A nested node stored under `name`.
    fn node(&self, name: &str) -> Option<&Self>;

    /// A list of nodes stored under `name`.
    fn list(&self, name: &str) -> Option<Vec<&Self>>;

    /// A scalar field rendered as text, only when it is truthy.
    fn truthy_text(&self, name: &str) -> Option<String> {
        self.scalar(name)
            .filter(Scalar::is_truthy)
            .map(|s| s.to_text())
    }
}

impl SourceNode for Value {
    fn kind(&self) -> Option<&str> {
        self.get("kind").and_then(Value::as_str)
    }

    fn has_field(&self, name: &str) -> bool {
        self.as_object().is_some_and(|o| o.contains_key(name))
    }

    fn scalar(&self, name: &str) -> Option<Scalar<'_>> {
        match self.get(name)? {
            Value::String(s) => Some(Scalar::Str(s)),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float),
            },
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn node(&self, name: &str) -> Option<&Self> {
        self.get(name).filter(|v| v.is_object())
    }

    fn list(&self, name: &str) -> Option<Vec<&Self>> {
        self.get(name)
            .and_then(Value::as_array)
            .map(|items| items.iter().collect())
    }
}

/// Attribute value of an `AttrNode`.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    Str(String),
    Int(i64),
    Bool(bool),
    Node(AttrNode),
    Nodes(Vec<AttrNode>),
}

impl From<&str> for Attr {
    fn from(s: &str) -> Self {
        Attr::Str(s.to_string())
    }
}

impl From<String> for Attr {
    fn from(s: String) -> Self {
        Attr::Str(s)
    }
}

impl From<i64> for Attr {
    fn from(i: i64) -> Self {
        Attr::Int(i)
    }
}

impl From<i32> for Attr {
    fn from(i: i32) -> Self {
        Attr::Int(i64::from(i))
    }
}

impl From<bool> for Attr {
    fn from(b: bool) -> Self {
        Attr::Bool(b)
    }
}

impl From<AttrNode> for Attr {
    fn from(n: AttrNode) -> Self {
        Attr::Node(n)
    }
}

impl From<Vec<AttrNode>> for Attr {
    fn from(ns: Vec<AttrNode>) -> Self {
        Attr::Nodes(ns)
    }
}

/// Attribute-bearing node: an optional kind plus named attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrNode {
    kind: Option<String>,
    attrs: BTreeMap<String, Attr>,
}

impl AttrNode {
    /// A node with the given kind and no attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        AttrNode {
            kind: Some(kind.into()),
            attrs: BTreeMap::new(),
        }
    }

    /// A node without a kind (neume elements, note records, syllable notes).
    pub fn untyped() -> Self {
        AttrNode::default()
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Attr>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Attr>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.get(name)
    }
}

impl SourceNode for AttrNode {
    fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn has_field(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    fn scalar(&self, name: &str) -> Option<Scalar<'_>> {
        match self.attrs.get(name)? {
            Attr::Str(s) => Some(Scalar::Str(s)),
            Attr::Int(i) => Some(Scalar::Int(*i)),
            Attr::Bool(b) => Some(Scalar::Bool(*b)),
            Attr::Node(_) | Attr::Nodes(_) => None,
        }
    }

    fn node(&self, name: &str) -> Option<&Self> {
        match self.attrs.get(name)? {
            Attr::Node(n) => Some(n),
            _ => None,
        }
    }

    fn list(&self, name: &str) -> Option<Vec<&Self>> {
        match self.attrs.get(name)? {
            Attr::Nodes(ns) => Some(ns.iter().collect()),
            _ => None,
        }
    }
}
