use std::path::Path;

use crate::error::ReadError;
use crate::graph::Network;

/// A way of building a [`Network`] from data on disk.
///
/// Readers are additive: `read_into` keeps whatever the network already holds,
/// so reading twice merges both sources.
pub trait NetworkReader<V> {
    fn read_into(&self, network: &mut Network<V>, source: &Path) -> Result<(), ReadError>;

    fn read_network(&self, source: &Path) -> Result<Network<V>, ReadError> {
        let mut network = Network::new();
        self.read_into(&mut network, source)?;
        Ok(network)
    }
}
