use std::fmt::{Display, Formatter};

/// The opaque number of a node in a resolver's node pool.
///
/// Resolutions stream node ids instead of terms. Mapping between ids and terms is the job of the
/// resolver that produced them. [NodeId::NONE] marks an unbound column.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct NodeId(u64);

impl NodeId {
    /// The id of an unbound value.
    pub const NONE: NodeId = NodeId(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is [NodeId::NONE].
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<NodeId> for u64 {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            f.write_str("NONE")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}
