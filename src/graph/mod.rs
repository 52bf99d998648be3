pub mod arc;
pub mod network;
pub mod node;

pub use arc::{Arc, ArcId};
pub use network::Network;
pub use node::{Node, NodeId};
