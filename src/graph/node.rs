use std::fmt;

use crate::graph::arc::ArcId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct Node<V> {
    id: NodeId,
    name: String,
    value: V,
    arcs_in: Vec<ArcId>,
    arcs_out: Vec<ArcId>,
}

impl<V> Node<V> {
    pub(crate) fn new(id: NodeId, name: impl Into<String>, value: V) -> Self {
        Self {
            id,
            name: name.into(),
            value,
            arcs_in: Vec::new(),
            arcs_out: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Arcs ending at this node, in insertion order.
    pub fn arcs_in(&self) -> &[ArcId] {
        &self.arcs_in
    }

    /// Arcs starting at this node, in insertion order.
    pub fn arcs_out(&self) -> &[ArcId] {
        &self.arcs_out
    }

    pub(crate) fn push_in(&mut self, arc: ArcId) {
        self.arcs_in.push(arc);
    }

    pub(crate) fn push_out(&mut self, arc: ArcId) {
        self.arcs_out.push(arc);
    }
}

impl<V> fmt::Display for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.name)
    }
}
