pub mod electric;
pub mod reader;
pub mod text;

pub use electric::{Coordinates, ElectricNetwork, ElectricReader};
pub use reader::NetworkReader;
pub use text::TextReader;
