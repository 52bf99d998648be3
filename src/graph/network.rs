use std::fmt;

use crate::error::NetworkError;
use crate::graph::arc::{Arc, ArcId};
use crate::graph::node::{Node, NodeId};

/// Owns every node and arc of a directed, weighted network.
///
/// Nodes and arcs are only ever appended, so the ids handed out by
/// [`Network::add_node`] and [`Network::add_arc`] stay valid for the lifetime
/// of the network.
#[derive(Debug)]
pub struct Network<V> {
    nodes: Vec<Node<V>>,
    arcs: Vec<Arc>,
}

impl<V> Default for Network<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Network<V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            arcs: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node<V>] {
        &self.nodes
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.nodes.get(id.index())
    }

    pub fn arc(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.get(id.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Returns the first node called `name`, or `None` when there is none.
    pub fn get_node(&self, name: &str) -> Option<&Node<V>> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.get_node(name).map(Node::id)
    }

    /// Appends a node. Names are not checked for uniqueness here.
    pub fn add_node(&mut self, name: impl Into<String>, value: V) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, name, value));
        id
    }

    /// Appends an arc and records it on both endpoints. Ids past the end of
    /// the node list are rejected; ids are plain indices, so one minted by a
    /// different network of equal or larger size is not detected.
    pub fn add_arc(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<ArcId, NetworkError> {
        for id in [from, to] {
            if id.index() >= self.nodes.len() {
                return Err(NetworkError::UnknownNode(id));
            }
        }
        let id = ArcId(self.arcs.len());
        self.arcs.push(Arc::new(id, from, to, weight));
        self.nodes[from.index()].push_out(id);
        self.nodes[to.index()].push_in(id);
        Ok(id)
    }

    pub fn outgoing(&self, id: NodeId) -> &[ArcId] {
        self.node(id).map(Node::arcs_out).unwrap_or(&[])
    }

    pub fn incoming(&self, id: NodeId) -> &[ArcId] {
        self.node(id).map(Node::arcs_in).unwrap_or(&[])
    }

    pub fn node_value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.nodes.get_mut(id.index()).map(Node::value_mut)
    }

    /// Payloads can change in place; topology cannot.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.nodes.iter_mut().map(Node::value_mut)
    }

    /// Smallest and largest arc weight, `None` for a network without arcs.
    pub fn weight_range(&self) -> Option<(f64, f64)> {
        self.arcs.iter().map(Arc::weight).fold(None, |acc, w| match acc {
            None => Some((w, w)),
            Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
        })
    }

    /// Formats an arc as `arc:(<from>)--<weight>-->(<to>)`. Whole weights keep
    /// their decimal point, so `250` prints as `250.0`.
    pub fn display_arc(&self, id: ArcId) -> ArcDisplay<'_, V> {
        ArcDisplay { network: self, id }
    }
}

pub struct ArcDisplay<'a, V> {
    network: &'a Network<V>,
    id: ArcId,
}

impl<V> fmt::Display for ArcDisplay<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(arc) = self.network.arc(self.id) else {
            return write!(f, "arc:<missing {}>", self.id.index());
        };
        let name = |id: NodeId| self.network.node(id).map(Node::name).unwrap_or("?");
        write!(
            f,
            "arc:({})--{:?}-->({})",
            name(arc.from()),
            arc.weight(),
            name(arc.to())
        )
    }
}

impl<V> fmt::Display for Network<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        for arc in &self.arcs {
            writeln!(f, "{}", self.display_arc(arc.id()))?;
        }
        Ok(())
    }
}
