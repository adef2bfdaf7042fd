use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for node IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for elements in a document.
/// Internally a 4-byte `Spur` index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The placeholder id carried by templates that have not been mounted yet.
    pub fn unassigned() -> Self {
        Self::intern("")
    }

    pub fn is_unassigned(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

/// Hands out `<prefix>_<n>` ids for one canvas.
///
/// The counter belongs to the canvas that owns the generator, so two
/// canvases never share state. `next_id` skips ids the caller reports as
/// taken, which keeps generated ids clear of ids that arrived via import.
#[derive(Debug, Clone)]
pub struct IdGen {
    prefix: String,
    next: u64,
}

impl IdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn next_id(&mut self, taken: impl Fn(NodeId) -> bool) -> NodeId {
        loop {
            let n = self.next;
            self.next += 1;
            let id = NodeId::intern(&format!("{}_{n}", self.prefix));
            if !taken(id) && !id.is_unassigned() {
                return id;
            }
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new("el")
    }
}
