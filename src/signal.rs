use std::collections::{BTreeMap, HashMap};

use generational_arena::Index;

pub mod fields {
    pub const ACTIVE: &str = "active";
    pub const SIN: &str = "sin";
    pub const SIN_FREQUENCY: &str = "sinFrequency";
    pub const SIN_OFFSET: &str = "sinOffset";
    pub const SIN_AMPLITUDE: &str = "sinAmplitude";
}

/// A single field of a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
}

impl Value {
    /// `false`, `0` and `NaN` are falsy, everything else is truthy.
    pub fn is_truthy(self) -> bool {
        match self {
            Value::Bool(b) => b,
            Value::Number(n) => n != 0.0 && !n.is_nan(),
        }
    }

    /// Numeric view of the value, booleans count as 0 or 1.
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Bool(b) => if b { 1.0 } else { 0.0 },
            Value::Number(n) => n,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// What a node currently emits: a small record of named fields.
///
/// Signals are owned values. Every hop clones, so a node that rewrites a
/// field in place never affects what another node already received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signal {
    fields: BTreeMap<String, Value>,
}

static EMPTY: Signal = Signal { fields: BTreeMap::new() };

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signal every power node generates: `{active: true}`.
    pub fn active() -> Self {
        Self::new().with(fields::ACTIVE, true)
    }

    pub fn empty() -> &'static Signal {
        &EMPTY
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        self.fields.get(field).copied()
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).map(Value::as_f64)
    }

    /// Absent fields are falsy.
    pub fn is_truthy(&self, field: &str) -> bool {
        self.get(field).map_or(false, Value::is_truthy)
    }

    pub fn is_active(&self) -> bool {
        self.is_truthy(fields::ACTIVE)
    }

    pub fn is_sin(&self) -> bool {
        self.is_truthy(fields::SIN)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Signals of one propagation pass, keyed by node.
///
/// Keys keep the position of their first insertion; overwriting a signal
/// does not move it.
#[derive(Debug, Clone, Default)]
pub struct SignalMap {
    signals: HashMap<Index, Signal>,
    order: Vec<Index>,
}

impl SignalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Index, signal: Signal) {
        if self.signals.insert(node, signal).is_none() {
            self.order.push(node);
        }
    }

    pub fn get(&self, node: Index) -> Option<&Signal> {
        self.signals.get(&node)
    }

    /// Like `get`, but absent nodes read as the empty signal.
    pub fn signal(&self, node: Index) -> &Signal {
        self.get(node).unwrap_or(Signal::empty())
    }

    pub fn contains(&self, node: Index) -> bool {
        self.signals.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Index, &Signal)> {
        self.order.iter().map(move |i| (*i, &self.signals[i]))
    }

    /// Owned copy of every entry, in insertion order.
    pub fn snapshot(&self) -> Vec<(Index, Signal)> {
        self.iter().map(|(i, s)| (i, s.clone())).collect()
    }
}
